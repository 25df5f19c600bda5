//! Vegetation index computation against a mock Earth Engine endpoint

mod common;

use std::time::Duration;

use agrinfo_backend::config::HttpConfig;
use agrinfo_backend::external::{http_client, EarthEngineClient, FailureKind};
use chrono::NaiveDate;
use shared::models::VegetationBand;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPUTE_PATH: &str = "/v1/projects/agrinfo-test/value:compute";

fn client(server: &MockServer) -> EarthEngineClient {
    let http = common::http();
    EarthEngineClient::new(
        http.clone(),
        server.uri(),
        common::EE_PROJECT,
        Some(common::token_provider(http, &server.uri())),
    )
}

async fn mount_compute(server: &MockServer, value: f64) {
    Mock::given(method("POST"))
        .and(path(COMPUTE_PATH))
        .and(header("authorization", "Bearer ya29.test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": value
        })))
        .mount(server)
        .await;
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

#[tokio::test]
async fn test_compute_index() {
    let server = MockServer::start().await;
    common::mount_token(&server, 3600).await;

    Mock::given(method("POST"))
        .and(path(COMPUTE_PATH))
        .and(header("authorization", "Bearer ya29.test-token"))
        .and(body_string_contains("COPERNICUS/S2"))
        .and(body_string_contains("CLOUDY_PIXEL_PERCENTAGE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": 0.62
        })))
        .expect(1)
        .mount(&server)
        .await;

    let index = client(&server)
        .compute_index(19.9975, 73.7898, as_of())
        .await
        .unwrap();

    assert_eq!(index.value, 0.62);
    assert_eq!(index.band(), VegetationBand::Moderate);
}

#[tokio::test]
async fn test_no_imagery_is_unavailable() {
    let server = MockServer::start().await;
    common::mount_token(&server, 3600).await;

    Mock::given(method("POST"))
        .and(path(COMPUTE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": null
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .compute_index(19.9975, 73.7898, as_of())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Unavailable);
}

#[tokio::test]
async fn test_out_of_range_value_is_unavailable() {
    let server = MockServer::start().await;
    common::mount_token(&server, 3600).await;

    Mock::given(method("POST"))
        .and(path(COMPUTE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": 3.5
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .compute_index(19.9975, 73.7898, as_of())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Unavailable);
}

#[tokio::test]
async fn test_rejected_credentials_are_unavailable() {
    let server = MockServer::start().await;
    common::mount_token(&server, 3600).await;

    Mock::given(method("POST"))
        .and(path(COMPUTE_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server)
        .compute_index(19.9975, 73.7898, as_of())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Unavailable);
}

#[tokio::test]
async fn test_unconfigured_client_skips_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let unconfigured = EarthEngineClient::new(common::http(), server.uri(), "", None);
    assert!(!unconfigured.is_configured());

    let err = unconfigured
        .compute_index(19.9975, 73.7898, as_of())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Unavailable);
}

#[tokio::test]
async fn test_project_without_credentials_is_unconfigured() {
    let server = MockServer::start().await;
    let client = EarthEngineClient::new(common::http(), server.uri(), common::EE_PROJECT, None);
    assert!(!client.is_configured());

    let err = client
        .compute_index(19.9975, 73.7898, as_of())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Unavailable);
}

#[tokio::test]
async fn test_access_token_is_reused_while_valid() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": common::EE_TOKEN,
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_compute(&server, 0.5).await;

    let client = client(&server);
    for _ in 0..3 {
        client.compute_index(19.9975, 73.7898, as_of()).await.unwrap();
    }
}

#[tokio::test]
async fn test_expiring_access_token_is_fetched_again() {
    let server = MockServer::start().await;

    // Inside the refresh margin, so every call needs a fresh token
    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": common::EE_TOKEN,
            "expires_in": 60
        })))
        .expect(2)
        .mount(&server)
        .await;
    mount_compute(&server, 0.5).await;

    let client = client(&server);
    client.compute_index(19.9975, 73.7898, as_of()).await.unwrap();
    client.compute_index(19.9975, 73.7898, as_of()).await.unwrap();
}

#[tokio::test]
async fn test_rejected_assertion_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPUTE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .compute_index(19.9975, 73.7898, as_of())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Unavailable);
}

#[tokio::test]
async fn test_slow_computation_times_out_as_unavailable() {
    let server = MockServer::start().await;
    common::mount_token(&server, 3600).await;

    Mock::given(method("POST"))
        .and(path(COMPUTE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "result": 0.5 }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let http = http_client(&HttpConfig {
        timeout_secs: 1,
        user_agent: "agrinfo-tests".to_string(),
    })
    .unwrap();
    let client = EarthEngineClient::new(
        http.clone(),
        server.uri(),
        common::EE_PROJECT,
        Some(common::token_provider(http, &server.uri())),
    );

    let err = client
        .compute_index(19.9975, 73.7898, as_of())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Unavailable);
}
