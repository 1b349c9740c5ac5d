// libs/calendar-cell/src/services/notify.rs
use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use shared_store::{RestStoreClient, StoreError};

use crate::models::NotificationRequest;

/// Pushes patient notifications to the notification sink. Dispatch is fire
/// and forget: a failure is logged so it shows up in observability, but the
/// operation that triggered the notification has already succeeded and must
/// report success.
pub struct NotificationService {
    store: Arc<RestStoreClient>,
}

impl NotificationService {
    pub fn new(store: Arc<RestStoreClient>) -> Self {
        Self { store }
    }

    pub async fn dispatch(&self, request: NotificationRequest) -> Result<(), StoreError> {
        let body = serde_json::to_value(&request)
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let _: Value = self
            .store
            .request(Method::POST, "/notifications", Some(body))
            .await?;

        Ok(())
    }

    pub async fn dispatch_best_effort(&self, request: NotificationRequest) {
        let kind = request.notification_type.clone();
        let patient = request.patient_name.clone();

        match self.dispatch(request).await {
            Ok(()) => debug!("Dispatched {} notification to {}", kind, patient),
            Err(e) => warn!(
                "Failed to dispatch {} notification to {}: {}",
                kind, patient, e
            ),
        }
    }
}
