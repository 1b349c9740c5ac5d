pub mod locks;
pub mod rest;
pub mod state;

pub use locks::DoctorLockRegistry;
pub use rest::{RestStoreClient, StoreError};
pub use state::SchedulerState;
