use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the REST store backing schedules, appointments and
    /// notifications (a json-server style mock backend in development).
    pub store_base_url: String,
    pub store_api_key: String,
    pub store_timeout_ms: u64,
    pub bind_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_base_url: env::var("STORE_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("STORE_BASE_URL not set, using empty value");
                    String::new()
                }),
            store_api_key: env::var("STORE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("STORE_API_KEY not set, using empty value");
                    String::new()
                }),
            store_timeout_ms: env::var("STORE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_000),
            bind_port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    /// Convenience constructor used by tests pointing at a mock store.
    pub fn with_store_url(store_base_url: impl Into<String>) -> Self {
        Self {
            store_base_url: store_base_url.into(),
            store_api_key: String::new(),
            store_timeout_ms: 5_000,
            bind_port: 3000,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.store_base_url.is_empty()
    }
}
