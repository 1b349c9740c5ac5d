// libs/calendar-cell/src/services/appointments.rs
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use availability_cell::services::schedule::ScheduleService;
use shared_store::{RestStoreClient, SchedulerState, StoreError};
use shared_utils::{format_time_12h, minutes_to_time, time_to_minutes, weekday_name};

use crate::models::{
    Appointment, AppointmentStatus, CalendarError, NotificationRequest, RescheduleRequest,
    WeekGrid,
};
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::notify::NotificationService;
use crate::services::placement;

/// Reschedule duration fallback when an appointment carries no duration and
/// no originating slot can be found.
const DEFAULT_APPOINTMENT_MINUTES: u32 = 60;

/// Orchestrates appointment reads, reschedules, confirmations and
/// cancellations against the appointment store, with conflict detection on
/// the calendar grid and best-effort patient notifications.
pub struct AppointmentService {
    store: Arc<RestStoreClient>,
    state: Arc<SchedulerState>,
    lifecycle: AppointmentLifecycleService,
    notifications: NotificationService,
}

impl AppointmentService {
    pub fn new(state: Arc<SchedulerState>) -> Self {
        Self {
            store: Arc::clone(&state.store),
            notifications: NotificationService::new(Arc::clone(&state.store)),
            lifecycle: AppointmentLifecycleService::new(),
            state,
        }
    }

    pub async fn list(&self, doctor_id: Option<&str>) -> Result<Vec<Appointment>, CalendarError> {
        let path = match doctor_id {
            Some(id) => format!("/appointments?doctor_id={}", id),
            None => "/appointments".to_string(),
        };

        let appointments: Vec<Appointment> =
            self.store.request(Method::GET, &path, None).await?;
        Ok(appointments)
    }

    pub async fn get(&self, appointment_id: Uuid) -> Result<Appointment, CalendarError> {
        let path = format!("/appointments/{}", appointment_id);
        match self.store.request::<Appointment>(Method::GET, &path, None).await {
            Ok(appointment) => Ok(appointment),
            Err(StoreError::NotFound(_)) => Err(CalendarError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply a validated calendar move.
    ///
    /// Dropping an appointment onto its own current cell succeeds as a
    /// no-op: nothing is written and no notification goes out. Dropping onto
    /// a cell held by a different active appointment is refused. Otherwise
    /// the move is written through to the store, the end time is recomputed
    /// from the appointment's own slot duration, and the patient is told the
    /// old and new times, best effort.
    pub async fn reschedule(
        &self,
        appointment_id: Uuid,
        request: RescheduleRequest,
    ) -> Result<Appointment, CalendarError> {
        info!(
            "Rescheduling appointment {} to {} {}",
            appointment_id, request.new_date, request.new_time
        );

        let new_start = time_to_minutes(&request.new_time)
            .map_err(|e| CalendarError::InvalidTime(e.to_string()))?;

        let appointment = self.get(appointment_id).await?;

        if appointment.date == request.new_date && appointment.start_time == request.new_time {
            debug!("Appointment {} dropped on its own cell, no-op", appointment_id);
            return Ok(appointment);
        }

        let others = self.list(Some(&appointment.doctor_id)).await?;
        if placement::occupied_by_other(&others, request.new_date, &request.new_time, appointment_id)
        {
            warn!(
                "Reschedule refused: {} {} already occupied for doctor {}",
                request.new_date, request.new_time, appointment.doctor_id
            );
            return Err(CalendarError::Conflict {
                date: request.new_date,
                time: request.new_time,
            });
        }

        let duration = self.resolve_duration(&appointment, &request.new_time).await;
        let end_minutes = new_start + duration;
        // End times stay on the same day's clock; "23:59" is the latest
        // representable minute.
        if end_minutes >= 24 * 60 {
            return Err(CalendarError::InvalidTime(format!(
                "{} plus {} minutes runs past midnight",
                request.new_time, duration
            )));
        }
        let new_end = minutes_to_time(end_minutes);
        let new_day = weekday_name(request.new_date.weekday());

        let update = json!({
            "date": request.new_date,
            "day": new_day,
            "start_time": request.new_time,
            "end_time": new_end,
            "duration_minutes": duration,
            "updated_at": Utc::now().to_rfc3339(),
        });

        let path = format!("/appointments/{}", appointment_id);
        let updated: Appointment = self
            .store
            .request(Method::PATCH, &path, Some(update))
            .await?;

        self.notifications
            .dispatch_best_effort(NotificationRequest {
                patient_name: appointment.patient_name.clone(),
                notification_type: "reschedule".to_string(),
                title: "Appointment rescheduled".to_string(),
                message: format!(
                    "Your appointment with {} has been moved",
                    self.doctor_display_name(&appointment)
                ),
                doctor_name: self.doctor_display_name(&appointment),
                old_date_time: Some(Self::describe_cell(
                    &appointment.day,
                    appointment.date,
                    &appointment.start_time,
                )),
                new_date_time: Some(Self::describe_cell(
                    new_day,
                    request.new_date,
                    &request.new_time,
                )),
            })
            .await;

        info!("Appointment {} rescheduled", appointment_id);
        Ok(updated)
    }

    /// Confirm a pending appointment.
    pub async fn confirm(&self, appointment_id: Uuid) -> Result<Appointment, CalendarError> {
        debug!("Confirming appointment {}", appointment_id);

        let appointment = self.get(appointment_id).await?;
        self.lifecycle
            .validate_status_transition(appointment.status, AppointmentStatus::Confirmed)?;

        let update = json!({
            "status": "confirmed",
            "updated_at": Utc::now().to_rfc3339(),
        });

        let path = format!("/appointments/{}", appointment_id);
        let updated: Appointment = self
            .store
            .request(Method::PATCH, &path, Some(update))
            .await?;

        Ok(updated)
    }

    /// Cancel an appointment and remove it from the active set. Cancelling
    /// an unknown id is a not-found error; a terminal appointment cannot be
    /// cancelled again.
    pub async fn cancel(&self, appointment_id: Uuid) -> Result<(), CalendarError> {
        info!("Cancelling appointment {}", appointment_id);

        let appointment = self.get(appointment_id).await?;
        self.lifecycle
            .validate_status_transition(appointment.status, AppointmentStatus::Cancelled)?;

        let path = format!("/appointments/{}", appointment_id);
        let _: Value = self.store.request(Method::DELETE, &path, None).await?;

        self.notifications
            .dispatch_best_effort(NotificationRequest {
                patient_name: appointment.patient_name.clone(),
                notification_type: "cancellation".to_string(),
                title: "Appointment cancelled".to_string(),
                message: format!(
                    "Your appointment with {} has been cancelled",
                    self.doctor_display_name(&appointment)
                ),
                doctor_name: self.doctor_display_name(&appointment),
                old_date_time: Some(Self::describe_cell(
                    &appointment.day,
                    appointment.date,
                    &appointment.start_time,
                )),
                new_date_time: None,
            })
            .await;

        Ok(())
    }

    /// Build the week grid for a doctor. The requested week clamps silently
    /// to the navigable window; time rows come from the doctor's generated
    /// slots when any exist.
    pub async fn week_grid(
        &self,
        doctor_id: &str,
        requested_week: Option<NaiveDate>,
    ) -> Result<WeekGrid, CalendarError> {
        let today = Utc::now().date_naive();
        let week_start =
            placement::clamp_week_start(today, requested_week.unwrap_or(today));

        let schedule = ScheduleService::new(Arc::clone(&self.state))
            .load(doctor_id)
            .await?;
        let time_slots = placement::time_slots_from(&schedule.slots);

        let appointments = self.list(Some(doctor_id)).await?;

        Ok(placement::build_week_grid(week_start, time_slots, &appointments))
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    /// The duration for a rescheduled appointment comes from the appointment
    /// itself (set from its slot at booking), then from the originating slot
    /// in the doctor's schedule, and only then from the 1-hour fallback.
    async fn resolve_duration(&self, appointment: &Appointment, _new_time: &str) -> u32 {
        if appointment.duration_minutes > 0 {
            return appointment.duration_minutes;
        }

        if let Some(slot_id) = &appointment.slot_id {
            let schedule = ScheduleService::new(Arc::clone(&self.state))
                .load(&appointment.doctor_id)
                .await;
            if let Ok(schedule) = schedule {
                if let Some(slot) = schedule.slots.iter().find(|s| &s.slot_id == slot_id) {
                    return slot.duration_minutes;
                }
            }
        }

        DEFAULT_APPOINTMENT_MINUTES
    }

    fn doctor_display_name(&self, appointment: &Appointment) -> String {
        appointment
            .doctor_name
            .clone()
            .unwrap_or_else(|| appointment.doctor_id.clone())
    }

    fn describe_cell(day: &str, date: NaiveDate, time: &str) -> String {
        let display = format_time_12h(time).unwrap_or_else(|_| time.to_string());
        format!("{} {} at {}", day, date, display)
    }
}
