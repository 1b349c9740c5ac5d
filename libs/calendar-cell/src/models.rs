// libs/calendar-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use availability_cell::SchedulingError;
use shared_models::AppError;
use shared_store::StoreError;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: String,
    pub doctor_name: Option<String>,
    pub patient_id: Option<String>,
    pub patient_name: String,
    pub date: NaiveDate,
    /// Weekday name for the calendar column header, kept in sync with `date`.
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    pub appointment_type: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    /// Slot the booking came from, when the appointment was created through
    /// the booking flow.
    pub slot_id: Option<String>,
    /// Short human-facing booking reference, display-only.
    pub booking_token: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Appointment {
    /// Whether this appointment occupies calendar cells and blocks drops.
    pub fn is_active(&self) -> bool {
        !matches!(self.status, AppointmentStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ==============================================================================
// CALENDAR GRID MODELS
// ==============================================================================

/// One grid cell: a `(date, time)` key plus the appointments stacked in it.
/// Stacking is legal for display; the single-occupancy rule only applies when
/// a reschedule drop targets the cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarCell {
    pub time: String,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: String,
    pub cells: Vec<CalendarCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekGrid {
    pub week_start: NaiveDate,
    pub time_slots: Vec<String>,
    pub days: Vec<CalendarDay>,
}

impl WeekGrid {
    pub fn cell(&self, date: NaiveDate, time: &str) -> Option<&CalendarCell> {
        self.days
            .iter()
            .find(|d| d.date == date)?
            .cells
            .iter()
            .find(|c| c.time == time)
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub new_date: NaiveDate,
    pub new_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentQuery {
    pub doctor_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarQuery {
    pub week_start: Option<NaiveDate>,
}

/// Payload pushed to the notification sink. Delivery is best effort; a
/// failed dispatch is logged and never fails the triggering operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub patient_name: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub doctor_name: String,
    pub old_date_time: Option<String>,
    pub new_date_time: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("appointment not found")]
    NotFound,

    #[error("target cell {date} {time} is already occupied")]
    Conflict { date: NaiveDate, time: String },

    #[error("invalid time: {0}")]
    InvalidTime(String),

    #[error("appointment cannot change status from {0}")]
    InvalidStatusTransition(AppointmentStatus),

    #[error("store error: {0}")]
    Store(String),

    #[error("store request timed out")]
    Timeout,
}

impl From<StoreError> for CalendarError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout => CalendarError::Timeout,
            StoreError::NotFound(_) => CalendarError::NotFound,
            other => CalendarError::Store(other.to_string()),
        }
    }
}

impl From<SchedulingError> for CalendarError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::Timeout => CalendarError::Timeout,
            other => CalendarError::Store(other.to_string()),
        }
    }
}

impl From<CalendarError> for AppError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::NotFound => AppError::NotFound(err.to_string()),
            CalendarError::Conflict { .. } => AppError::Conflict(err.to_string()),
            CalendarError::InvalidTime(_) => AppError::ValidationError(err.to_string()),
            CalendarError::InvalidStatusTransition(_) => AppError::Conflict(err.to_string()),
            CalendarError::Store(_) => AppError::Store(err.to_string()),
            CalendarError::Timeout => AppError::Timeout(err.to_string()),
        }
    }
}
