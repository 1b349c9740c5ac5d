use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Failure modes of the external store, kept distinct so callers can tell a
/// retryable outage or timeout apart from a plain missing resource.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store request timed out")]
    Timeout,

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("store API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("store transport error: {0}")]
    Transport(String),
}

/// Thin client for the REST store that holds schedules, appointments and
/// notifications. In development this is a json-server style mock backend;
/// the paths are plain resource routes.
pub struct RestStoreClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStoreClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.store_timeout_ms))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.store_base_url.clone(),
            api_key: config.store_api_key.clone(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if !self.api_key.is_empty() {
            if let Ok(value) = HeaderValue::from_str(&self.api_key) {
                headers.insert("apikey", value);
            }
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making store request to {}", url);

        let mut req = self.client.request(method, &url).headers(self.headers());

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                StoreError::Timeout
            } else {
                StoreError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Store API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                404 => StoreError::NotFound(path.to_string()),
                code => StoreError::Api {
                    status: code,
                    message: error_text,
                },
            });
        }

        response.json::<T>().await.map_err(|e| StoreError::Transport(e.to_string()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
