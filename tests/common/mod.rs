//! Common test utilities and fixtures
//!
//! - wiremock for HTTP mocking (isolated, parallel-safe)
//! - rstest for parameterized cases
//! - #[tokio::test] for async testing

#![allow(dead_code)]

pub mod responses;

use kronicle::{Client, Record};
use serde_json::json;
use wiremock::MockServer;

/// Build a client pointed at a mock server with retries disabled.
pub fn test_client(server: &MockServer) -> Client {
    Client::builder()
        .base_url(server.uri())
        .token("test-token")
        .max_retries(0)
        .build()
        .unwrap()
}

/// Build a client with a retry budget.
pub fn retrying_client(server: &MockServer, max_retries: u32) -> Client {
    Client::builder()
        .base_url(server.uri())
        .token("test-token")
        .max_retries(max_retries)
        .build()
        .unwrap()
}

/// A record with a single numbered field, handy for order assertions.
pub fn numbered_record(n: i64) -> Record {
    let mut record = Record::new();
    record.insert("n", json!(n));
    record
}
