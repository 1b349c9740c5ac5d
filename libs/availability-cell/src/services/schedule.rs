// libs/availability-cell/src/services/schedule.rs
use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_store::{RestStoreClient, SchedulerState, StoreError};

use crate::models::{
    CreateSessionRequest, DoctorSchedule, GenerateSlotsResponse, SchedulingError, Session,
    SlotPolicy, UpdateSessionRequest,
};
use crate::services::slots;

/// Manages the per-doctor schedule unit: the availability sessions a doctor
/// defines and the bookable slots generated from them. Every mutation holds
/// the doctor's lock and writes the whole unit back in one call, so session
/// edits, regeneration and bookings never interleave.
pub struct ScheduleService {
    store: Arc<RestStoreClient>,
    state: Arc<SchedulerState>,
    policy: SlotPolicy,
}

impl ScheduleService {
    pub fn new(state: Arc<SchedulerState>) -> Self {
        Self {
            store: Arc::clone(&state.store),
            state,
            policy: SlotPolicy::default(),
        }
    }

    pub fn with_policy(state: Arc<SchedulerState>, policy: SlotPolicy) -> Self {
        Self {
            store: Arc::clone(&state.store),
            state,
            policy,
        }
    }

    pub fn policy(&self) -> &SlotPolicy {
        &self.policy
    }

    /// Read the schedule unit for a doctor. A doctor the store has never
    /// seen reads as an empty schedule rather than an error.
    pub async fn load(&self, doctor_id: &str) -> Result<DoctorSchedule, SchedulingError> {
        let path = format!("/doctor_schedules/{}", doctor_id);
        match self.store.request::<DoctorSchedule>(Method::GET, &path, None).await {
            Ok(schedule) => Ok(schedule),
            Err(StoreError::NotFound(_)) => {
                debug!("No stored schedule for doctor {}, starting empty", doctor_id);
                Ok(DoctorSchedule::empty(doctor_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write the whole schedule unit back.
    pub async fn save(&self, schedule: &DoctorSchedule) -> Result<(), SchedulingError> {
        let path = format!("/doctor_schedules/{}", schedule.doctor_id);
        let body = serde_json::to_value(schedule)
            .map_err(|e| SchedulingError::Store(e.to_string()))?;

        let _: Value = self.store.request(Method::PUT, &path, Some(body)).await?;
        Ok(())
    }

    pub async fn list_sessions(&self, doctor_id: &str) -> Result<Vec<Session>, SchedulingError> {
        Ok(self.load(doctor_id).await?.sessions)
    }

    /// Add an availability session. The duration must come from the policy's
    /// enumerated set; the times themselves are only checked at generation,
    /// since a doctor may save a half-filled session while editing.
    pub async fn create_session(
        &self,
        doctor_id: &str,
        request: CreateSessionRequest,
    ) -> Result<Session, SchedulingError> {
        debug!("Creating session for doctor {}", doctor_id);

        if !self.policy.allows_duration(request.duration_minutes) {
            return Err(SchedulingError::InvalidSession(format!(
                "duration {} minutes is not an allowed slot duration",
                request.duration_minutes
            )));
        }

        let session = Session {
            id: Uuid::new_v4(),
            start_time: request.start_time,
            end_time: request.end_time,
            duration_minutes: request.duration_minutes,
        };

        let _guard = self.state.doctor_locks.acquire(doctor_id).await;
        let mut schedule = self.load(doctor_id).await?;
        schedule.sessions.push(session.clone());
        schedule.updated_at = Utc::now();
        self.save(&schedule).await?;

        Ok(session)
    }

    /// Update a session in place. Any slots previously generated from it are
    /// stale the moment its range or duration changes, so they are dropped;
    /// the doctor regenerates when done editing.
    pub async fn update_session(
        &self,
        doctor_id: &str,
        session_id: Uuid,
        request: UpdateSessionRequest,
    ) -> Result<Session, SchedulingError> {
        debug!("Updating session {} for doctor {}", session_id, doctor_id);

        if let Some(duration) = request.duration_minutes {
            if !self.policy.allows_duration(duration) {
                return Err(SchedulingError::InvalidSession(format!(
                    "duration {} minutes is not an allowed slot duration",
                    duration
                )));
            }
        }

        let _guard = self.state.doctor_locks.acquire(doctor_id).await;
        let mut schedule = self.load(doctor_id).await?;

        let session = schedule
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or(SchedulingError::SessionNotFound)?;

        if let Some(start_time) = request.start_time {
            session.start_time = start_time;
        }
        if let Some(end_time) = request.end_time {
            session.end_time = end_time;
        }
        if let Some(duration) = request.duration_minutes {
            session.duration_minutes = duration;
        }
        let updated = session.clone();

        let before = schedule.slots.len();
        schedule.slots.retain(|slot| slot.session_id != session_id);
        if schedule.slots.len() < before {
            warn!(
                "Dropped {} stale slots derived from edited session {}",
                before - schedule.slots.len(),
                session_id
            );
        }

        schedule.updated_at = Utc::now();
        self.save(&schedule).await?;

        Ok(updated)
    }

    /// Remove a session and every slot derived from it.
    pub async fn delete_session(
        &self,
        doctor_id: &str,
        session_id: Uuid,
    ) -> Result<(), SchedulingError> {
        debug!("Deleting session {} for doctor {}", session_id, doctor_id);

        let _guard = self.state.doctor_locks.acquire(doctor_id).await;
        let mut schedule = self.load(doctor_id).await?;

        let before = schedule.sessions.len();
        schedule.sessions.retain(|s| s.id != session_id);
        if schedule.sessions.len() == before {
            return Err(SchedulingError::SessionNotFound);
        }

        schedule.slots.retain(|slot| slot.session_id != session_id);
        schedule.updated_at = Utc::now();
        self.save(&schedule).await?;

        Ok(())
    }

    /// Regenerate the doctor's slots from the current sessions.
    ///
    /// Holds the doctor's lock for the full cycle so no booking can land on
    /// a slot set that is about to be replaced. Booking data on slots whose
    /// deterministic id survives regeneration is carried over.
    pub async fn generate_slots(
        &self,
        doctor_id: &str,
    ) -> Result<GenerateSlotsResponse, SchedulingError> {
        debug!("Regenerating slots for doctor {}", doctor_id);

        let _guard = self.state.doctor_locks.acquire(doctor_id).await;
        let mut schedule = self.load(doctor_id).await?;

        let (regenerated, validations) = slots::generate_slots(&schedule.sessions, &self.policy);
        schedule.slots = slots::merge_bookings(&schedule.slots, regenerated);
        schedule.updated_at = Utc::now();
        self.save(&schedule).await?;

        Ok(GenerateSlotsResponse {
            slots: schedule.slots,
            validations,
        })
    }

    pub async fn list_slots(
        &self,
        doctor_id: &str,
    ) -> Result<Vec<crate::models::GeneratedSlot>, SchedulingError> {
        Ok(self.load(doctor_id).await?.slots)
    }
}
