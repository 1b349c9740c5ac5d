pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    Appointment, AppointmentStatus, CalendarCell, CalendarDay, CalendarError, RescheduleRequest,
    WeekGrid,
};
