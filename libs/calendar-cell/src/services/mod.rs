pub mod appointments;
pub mod lifecycle;
pub mod notify;
pub mod placement;
