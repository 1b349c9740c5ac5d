use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

/// Per-doctor async locks serializing every mutation of a doctor's schedule
/// unit. Two concurrent bookings against the last free seat of a slot must
/// not both succeed, and slot regeneration must not interleave with bookings
/// against the slots it is about to replace; both operations hold the owning
/// doctor's lock for their full read-modify-write cycle.
#[derive(Default)]
pub struct DoctorLockRegistry {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl DoctorLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, doctor_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().expect("lock registry poisoned");
            Arc::clone(
                map.entry(doctor_id.to_string())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };

        debug!("Acquiring schedule lock for doctor {}", doctor_id);
        lock.lock_owned().await
    }
}
