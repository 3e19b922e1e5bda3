//! Transport error classification and retry behavior tests

use assert_matches::assert_matches;
use kronicle::Error;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{responses::channel_list_response, retrying_client, test_client};

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/v1/channels"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "validation_error",
            "message": "bad filter"
        })))
        .expect(1) // fatal: exactly one attempt even with retries budgeted
        .mount(&mock_server)
        .await;

    let client = retrying_client(&mock_server, 3);
    let result = client.channels().list().await;

    match result {
        Err(Error::Api { status: 400, message }) => {
            assert!(message.contains("bad filter"));
        }
        other => panic!("expected 400 Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_errors_exhaust_retries_and_wrap_last_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/v1/channels"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "overloaded"})))
        .expect(2) // initial attempt + 1 retry
        .mount(&mock_server)
        .await;

    let client = retrying_client(&mock_server, 1);
    let result = client.channels().list().await;

    match result {
        Err(Error::RetryExhausted { attempts, source }) => {
            assert_eq!(attempts, 2);
            assert_matches!(*source, Error::Api { status: 503, .. });
        }
        other => panic!("expected RetryExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transient_failures_recover_within_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/v1/channels"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "hiccup"})))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/v1/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(channel_list_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Fails twice, succeeds on the third attempt: exactly 3 transport calls.
    let client = retrying_client(&mock_server, 3);
    let channels = client.channels().list().await.unwrap();
    assert_eq!(channels.len(), 2);
}

#[tokio::test]
async fn test_rate_limit_honors_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/v1/channels"))
        .respond_with(
            ResponseTemplate::new(429).insert_header("retry-after", "0"),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/v1/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(channel_list_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = retrying_client(&mock_server, 1);
    assert!(client.channels().list().await.is_ok());
}

#[tokio::test]
async fn test_zero_retries_surface_exhaustion_immediately() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/v1/channels"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = test_client(&mock_server).channels().list().await;
    assert_matches!(result, Err(Error::RetryExhausted { attempts: 1, .. }));
}

#[tokio::test]
async fn test_undecodable_success_body_is_serialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/v1/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let result = test_client(&mock_server).channels().list().await;
    assert_matches!(result, Err(Error::Serialization(_)));
}
