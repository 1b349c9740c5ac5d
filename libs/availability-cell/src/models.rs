// libs/availability-cell/src/models.rs
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::AppError;
use shared_store::StoreError;

// ==============================================================================
// SESSION MODELS
// ==============================================================================

/// One contiguous block of doctor availability in a single day, to be tiled
/// into fixed-duration bookable slots. Times are zero-padded 24-hour "HH:MM"
/// strings; either may still be empty while the doctor is editing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: u32,
}

/// Validation outcome for a single session. Incomplete and Invalid sessions
/// both contribute zero slots at generation time; the distinction exists so
/// callers can report specifics instead of silently skipping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Valid,
    Incomplete,
    Invalid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionValidation {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub reason: Option<String>,
}

// ==============================================================================
// GENERATED SLOT MODELS
// ==============================================================================

/// One fixed-duration bookable interval produced by tiling a session.
///
/// The id is deterministic (`slot_<session_id>_<start_offset_minutes>`) so
/// regenerating from unchanged sessions reproduces the same ids, which lets
/// prior booking data reattach across regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedSlot {
    pub slot_id: String,
    pub session_id: Uuid,
    pub start_time: String,
    pub end_time: String,
    pub start_display: String,
    pub end_display: String,
    pub duration_minutes: u32,
    pub capacity: u32,
    pub booked_count: u32,
    #[serde(default)]
    pub patient_ids: Vec<String>,
}

impl GeneratedSlot {
    pub fn is_full(&self) -> bool {
        self.booked_count >= self.capacity
    }

    /// Record a booking for `patient_id`, rejecting a full slot and a repeat
    /// booking by the same patient. Keeps `patient_ids.len() == booked_count`.
    pub fn record_booking(&mut self, patient_id: &str) -> Result<(), SchedulingError> {
        if self.is_full() {
            return Err(SchedulingError::CapacityExceeded {
                slot_id: self.slot_id.clone(),
            });
        }
        if self.patient_ids.iter().any(|p| p == patient_id) {
            return Err(SchedulingError::AlreadyBooked {
                slot_id: self.slot_id.clone(),
            });
        }

        self.patient_ids.push(patient_id.to_string());
        self.booked_count += 1;
        Ok(())
    }

    /// Release the booking held by `patient_id`. The count never goes
    /// negative; releasing an unknown patient is a distinct error.
    pub fn release_booking(&mut self, patient_id: &str) -> Result<(), SchedulingError> {
        let position = self
            .patient_ids
            .iter()
            .position(|p| p == patient_id)
            .ok_or_else(|| SchedulingError::BookingNotFound {
                slot_id: self.slot_id.clone(),
            })?;

        self.patient_ids.remove(position);
        self.booked_count = self.booked_count.saturating_sub(1);
        Ok(())
    }
}

// ==============================================================================
// SLOT POLICY
// ==============================================================================

/// Single configurable slot policy: the enumerated durations doctors may
/// pick plus the duration-to-capacity lookup. Capacity is an explicit table;
/// any duration not listed falls back to the default rather than computing
/// 60/duration, which is the documented behavior of the capacity scheme.
#[derive(Debug, Clone)]
pub struct SlotPolicy {
    pub allowed_durations: Vec<u32>,
    pub capacity_table: HashMap<u32, u32>,
    pub default_capacity: u32,
}

impl SlotPolicy {
    pub fn capacity_for(&self, duration_minutes: u32) -> u32 {
        self.capacity_table
            .get(&duration_minutes)
            .copied()
            .unwrap_or(self.default_capacity)
    }

    pub fn allows_duration(&self, duration_minutes: u32) -> bool {
        self.allowed_durations.contains(&duration_minutes)
    }
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            allowed_durations: vec![5, 10, 15, 20, 30, 45, 60],
            capacity_table: HashMap::from([(10, 6), (15, 4), (30, 2), (60, 1)]),
            default_capacity: 4,
        }
    }
}

// ==============================================================================
// SCHEDULE UNIT
// ==============================================================================

/// The unit the doctor session store reads and writes atomically, keyed by
/// doctor id: the defined sessions plus the slots generated from them with
/// their full booking data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSchedule {
    pub doctor_id: String,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub slots: Vec<GeneratedSlot>,
    pub updated_at: DateTime<Utc>,
}

impl DoctorSchedule {
    pub fn empty(doctor_id: &str) -> Self {
        Self {
            doctor_id: doctor_id.to_string(),
            sessions: Vec::new(),
            slots: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSessionRequest {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotRequest {
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_name: Option<String>,
    pub date: chrono::NaiveDate,
    pub appointment_type: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    pub patient_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSlotsResponse {
    pub slots: Vec<GeneratedSlot>,
    pub validations: Vec<SessionValidation>,
}

/// What a patient gets back from a successful booking. The token is a short
/// human-facing reference, display-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub slot_id: String,
    pub appointment_id: Uuid,
    pub booking_token: String,
    pub booked_count: u32,
    pub capacity: u32,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("session not found")]
    SessionNotFound,

    #[error("slot not found: {slot_id}")]
    SlotNotFound { slot_id: String },

    #[error("slot {slot_id} is fully booked")]
    CapacityExceeded { slot_id: String },

    #[error("patient already holds a booking on slot {slot_id}")]
    AlreadyBooked { slot_id: String },

    #[error("no booking for that patient on slot {slot_id}")]
    BookingNotFound { slot_id: String },

    #[error("invalid session: {0}")]
    InvalidSession(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("store request timed out")]
    Timeout,
}

impl From<StoreError> for SchedulingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout => SchedulingError::Timeout,
            other => SchedulingError::Store(other.to_string()),
        }
    }
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::SessionNotFound => AppError::NotFound(err.to_string()),
            SchedulingError::SlotNotFound { .. } => AppError::NotFound(err.to_string()),
            SchedulingError::BookingNotFound { .. } => AppError::NotFound(err.to_string()),
            SchedulingError::CapacityExceeded { .. } => AppError::CapacityExceeded(err.to_string()),
            SchedulingError::AlreadyBooked { .. } => AppError::Conflict(err.to_string()),
            SchedulingError::InvalidSession(_) => AppError::ValidationError(err.to_string()),
            SchedulingError::Store(_) => AppError::Store(err.to_string()),
            SchedulingError::Timeout => AppError::Timeout(err.to_string()),
        }
    }
}
