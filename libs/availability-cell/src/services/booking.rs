// libs/availability-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{Datelike, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_store::{RestStoreClient, SchedulerState};

use crate::models::{BookSlotRequest, BookingConfirmation, SchedulingError};
use crate::services::schedule::ScheduleService;

/// Books patients into generated slots and releases those bookings again.
///
/// A booking is a read-modify-write of the doctor's whole schedule unit, so
/// it runs under the doctor's lock: when one seat remains, two concurrent
/// attempts resolve to one confirmation and one capacity rejection.
pub struct BookingService {
    store: Arc<RestStoreClient>,
    state: Arc<SchedulerState>,
    schedule_service: ScheduleService,
}

impl BookingService {
    pub fn new(state: Arc<SchedulerState>) -> Self {
        Self {
            store: Arc::clone(&state.store),
            schedule_service: ScheduleService::new(Arc::clone(&state)),
            state,
        }
    }

    /// Book one seat on a slot for a patient and create the matching
    /// pending appointment in the appointment store.
    pub async fn book_slot(
        &self,
        doctor_id: &str,
        slot_id: &str,
        request: BookSlotRequest,
    ) -> Result<BookingConfirmation, SchedulingError> {
        info!(
            "Booking slot {} for patient {} with doctor {}",
            slot_id, request.patient_id, doctor_id
        );

        let _guard = self.state.doctor_locks.acquire(doctor_id).await;
        let mut schedule = self.schedule_service.load(doctor_id).await?;

        let slot = schedule
            .slots
            .iter_mut()
            .find(|s| s.slot_id == slot_id)
            .ok_or_else(|| SchedulingError::SlotNotFound {
                slot_id: slot_id.to_string(),
            })?;

        slot.record_booking(&request.patient_id)?;

        let booked_count = slot.booked_count;
        let capacity = slot.capacity;
        let start_time = slot.start_time.clone();
        let end_time = slot.end_time.clone();
        let duration_minutes = slot.duration_minutes;

        schedule.updated_at = Utc::now();
        self.schedule_service.save(&schedule).await?;

        let appointment_id = Uuid::new_v4();
        let booking_token = issue_booking_token();
        let day = shared_utils::weekday_name(request.date.weekday());

        let appointment = json!({
            "id": appointment_id,
            "doctor_id": doctor_id,
            "doctor_name": request.doctor_name,
            "patient_id": request.patient_id,
            "patient_name": request.patient_name,
            "date": request.date,
            "day": day,
            "start_time": start_time,
            "end_time": end_time,
            "duration_minutes": duration_minutes,
            "status": "pending",
            "appointment_type": request.appointment_type.unwrap_or_else(|| "consultation".to_string()),
            "phone": request.phone,
            "notes": request.notes,
            "slot_id": slot_id,
            "booking_token": booking_token,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339(),
        });

        let _: Value = self
            .store
            .request(Method::POST, "/appointments", Some(appointment))
            .await?;

        info!(
            "Slot {} booked ({}/{}) - appointment {}",
            slot_id, booked_count, capacity, appointment_id
        );

        Ok(BookingConfirmation {
            slot_id: slot_id.to_string(),
            appointment_id,
            booking_token,
            booked_count,
            capacity,
        })
    }

    /// Release a patient's seat on a slot. The count never goes negative;
    /// releasing a patient who holds no seat on the slot is a not-found
    /// error, not a silent no-op.
    pub async fn cancel_booking(
        &self,
        doctor_id: &str,
        slot_id: &str,
        patient_id: &str,
    ) -> Result<(), SchedulingError> {
        debug!(
            "Releasing booking on slot {} for patient {} with doctor {}",
            slot_id, patient_id, doctor_id
        );

        let _guard = self.state.doctor_locks.acquire(doctor_id).await;
        let mut schedule = self.schedule_service.load(doctor_id).await?;

        let slot = schedule
            .slots
            .iter_mut()
            .find(|s| s.slot_id == slot_id)
            .ok_or_else(|| SchedulingError::SlotNotFound {
                slot_id: slot_id.to_string(),
            })?;

        slot.release_booking(patient_id)?;
        let remaining = slot.booked_count;
        let capacity = slot.capacity;

        schedule.updated_at = Utc::now();
        self.schedule_service.save(&schedule).await?;

        info!("Slot {} released ({}/{})", slot_id, remaining, capacity);
        Ok(())
    }
}

/// Short human-facing booking reference, display-only.
fn issue_booking_token() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}
