// libs/shared/store/tests/store_client_test.rs

use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::AppConfig;
use shared_store::{RestStoreClient, StoreError};

#[tokio::test]
async fn successful_responses_deserialize() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .mount(&server)
        .await;

    let client = RestStoreClient::new(&AppConfig::with_store_url(server.uri()));
    let body: Value = client.request(reqwest::Method::GET, "/things/1", None).await.unwrap();
    assert_eq!(body["id"], 1);
}

#[tokio::test]
async fn missing_resources_map_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = RestStoreClient::new(&AppConfig::with_store_url(server.uri()));
    let err = client
        .request::<Value>(reqwest::Method::GET, "/things/2", None)
        .await
        .unwrap_err();

    assert_matches!(err, StoreError::NotFound(path) if path == "/things/2");
}

#[tokio::test]
async fn server_failures_carry_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things/3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
        .mount(&server)
        .await;

    let client = RestStoreClient::new(&AppConfig::with_store_url(server.uri()));
    let err = client
        .request::<Value>(reqwest::Method::GET, "/things/3", None)
        .await
        .unwrap_err();

    assert_matches!(err, StoreError::Api { status: 500, message } if message == "backend down");
}

#[tokio::test]
async fn slow_responses_are_timeouts_not_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things/4"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = AppConfig {
        store_base_url: server.uri(),
        store_api_key: String::new(),
        store_timeout_ms: 50,
        bind_port: 3000,
    };

    let client = RestStoreClient::new(&config);
    let err = client
        .request::<Value>(reqwest::Method::GET, "/things/4", None)
        .await
        .unwrap_err();

    assert_matches!(err, StoreError::Timeout);
}
