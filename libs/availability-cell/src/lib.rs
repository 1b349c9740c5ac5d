pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    BookingConfirmation, DoctorSchedule, GeneratedSlot, SchedulingError, Session, SessionStatus,
    SessionValidation, SlotPolicy,
};
