use std::sync::Arc;

use shared_config::AppConfig;

use crate::locks::DoctorLockRegistry;
use crate::rest::RestStoreClient;

/// Shared application state handed to every router: configuration, the REST
/// store client and the per-doctor lock registry.
pub struct SchedulerState {
    pub config: AppConfig,
    pub store: Arc<RestStoreClient>,
    pub doctor_locks: DoctorLockRegistry,
}

impl SchedulerState {
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(RestStoreClient::new(&config));
        Self {
            config,
            store,
            doctor_locks: DoctorLockRegistry::new(),
        }
    }
}
