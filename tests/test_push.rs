//! Batched push tests

use assert_matches::assert_matches;
use kronicle::{Error, PushOptions, Record};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{numbered_record, responses::push_ack, test_client};

fn rows_path(id: Uuid) -> String {
    format!("/data/v1/channels/{id}/rows")
}

fn records(range: std::ops::RangeInclusive<i64>) -> Vec<Record> {
    range.map(numbered_record).collect()
}

fn numbers(rows: &[Record]) -> Vec<i64> {
    rows.iter().map(|r| r.get("n").unwrap().as_i64().unwrap()).collect()
}

#[tokio::test]
async fn test_push_partitions_into_ceil_n_over_b_batches() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path(rows_path(id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(push_ack(5)))
        .expect(3) // ceil(5 / 2)
        .mount(&mock_server)
        .await;

    let result = test_client(&mock_server)
        .channels()
        .push_with(id, records(1..=5), PushOptions::default().batch_size(2))
        .await
        .unwrap();

    assert!(result.is_complete());
    assert_eq!(result.total(), 5);
    assert_eq!(numbers(&result.successes), [1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_push_marks_only_fatal_batch_as_failed() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    // Second batch (records 3 and 4) is rejected outright; mounted first so
    // it wins over the catch-all success mock.
    Mock::given(method("POST"))
        .and(path(rows_path(id)))
        .and(body_partial_json(json!({"rows": [{"n": 3}, {"n": 4}]})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "bad rows"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(rows_path(id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(push_ack(2)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let result = test_client(&mock_server)
        .channels()
        .push_with(id, records(1..=5), PushOptions::default().batch_size(2))
        .await
        .unwrap();

    assert_eq!(numbers(&result.successes), [1, 2, 5]);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(numbers(&result.failures[0].records), [3, 4]);
    assert_matches!(result.failures[0].error, Error::Api { status: 400, .. });
    assert_eq!(result.total(), 5);
}

#[tokio::test]
async fn test_push_fails_when_every_batch_fails() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path(rows_path(id)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "nope"})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let result = test_client(&mock_server)
        .channels()
        .push_with(id, records(1..=4), PushOptions::default().batch_size(2))
        .await;

    assert_matches!(result, Err(Error::AllBatchesFailed { batches: 2, .. }));
}

#[tokio::test]
async fn test_push_empty_input_issues_no_requests() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(push_ack(0)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = test_client(&mock_server)
        .channels()
        .push(id, vec![])
        .await
        .unwrap();
    assert!(result.is_complete());
    assert_eq!(result.total(), 0);
}

#[tokio::test]
async fn test_push_zero_batch_size_is_configuration_error() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    let result = test_client(&mock_server)
        .channels()
        .push_with(id, records(1..=2), PushOptions::default().batch_size(0))
        .await;
    assert_matches!(result, Err(Error::Configuration(_)));
}

#[tokio::test]
async fn test_push_retries_batch_as_a_whole_then_succeeds() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    // Two retryable failures, then success: with max_retries=3 the batch
    // lands on the third transport attempt.
    Mock::given(method("POST"))
        .and(path(rows_path(id)))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "busy"})))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(rows_path(id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(push_ack(3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::retrying_client(&mock_server, 3);
    let result = client
        .channels()
        .push(id, records(1..=3))
        .await
        .unwrap();

    assert!(result.is_complete());
    assert_eq!(result.total(), 3);
}

#[tokio::test]
async fn test_push_reports_operation_failure_from_ack() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path(rows_path(id)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"op_status": "rejected"})),
        )
        .mount(&mock_server)
        .await;

    let result = test_client(&mock_server)
        .channels()
        .push_with(id, records(1..=2), PushOptions::default().batch_size(2))
        .await;

    // Single batch, so the operation failure sinks the whole push. The
    // rejecting acknowledgment rides along on the error.
    match result {
        Err(Error::AllBatchesFailed { batches: 1, source }) => match *source {
            Error::Operation { payload: Some(ack), .. } => {
                assert_eq!(ack.op_status.as_deref(), Some("rejected"));
            }
            other => panic!("expected Operation error with payload, got {other:?}"),
        },
        other => panic!("expected AllBatchesFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_push_sends_per_batch_idempotency_keys() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path(rows_path(id)))
        .and(header("idempotency-key", "job42-0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(push_ack(2)))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(rows_path(id)))
        .and(header("idempotency-key", "job42-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(push_ack(1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = PushOptions::default().batch_size(2).idempotency_key("job42");
    let result = test_client(&mock_server)
        .channels()
        .push_with(id, records(1..=3), options)
        .await
        .unwrap();
    assert!(result.is_complete());
}

#[tokio::test]
async fn test_push_echoed_rows_take_precedence_over_submitted_batch() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path(rows_path(id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "op_status": "success",
            "rows": [{"n": 1, "assigned_id": "r-1"}, {"n": 2, "assigned_id": "r-2"}]
        })))
        .mount(&mock_server)
        .await;

    let result = test_client(&mock_server)
        .channels()
        .push_with(id, records(1..=2), PushOptions::default().batch_size(2))
        .await
        .unwrap();

    assert_eq!(result.successes.len(), 2);
    assert_eq!(
        result.successes[0].get("assigned_id"),
        Some(&json!("r-1"))
    );
}

#[tokio::test]
async fn test_push_mismatched_echo_falls_back_to_submitted_batch() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    // Backend echoes a single row for a two-record batch; the submitted
    // records are reported so successes still account for every input.
    Mock::given(method("POST"))
        .and(path(rows_path(id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "op_status": "success",
            "rows": [{"n": 1, "assigned_id": "r-1"}]
        })))
        .mount(&mock_server)
        .await;

    let result = test_client(&mock_server)
        .channels()
        .push_with(id, records(1..=2), PushOptions::default().batch_size(2))
        .await
        .unwrap();

    assert!(result.is_complete());
    assert_eq!(result.total(), 2);
    assert_eq!(numbers(&result.successes), [1, 2]);
    assert_eq!(result.successes[0].get("assigned_id"), None);
}
