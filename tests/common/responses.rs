//! Canned backend responses shared across integration tests

use serde_json::{json, Value};

/// One channel as the backend returns it from `data/v1/channels/{id}`.
pub fn channel_response(id: &str, name: &str, available_rows: u64) -> Value {
    json!({
        "sensor_id": id,
        "sensor_name": name,
        "sensor_schema": {"time": "datetime", "temperature": "float"},
        "metadata": {"unit": "C"},
        "tags": {"test": true},
        "received_at": "2024-01-01T00:00:00Z",
        "available_rows": available_rows
    })
}

/// Channel list response with two channels.
pub fn channel_list_response() -> Value {
    json!([
        channel_response("7c9e6679-7425-40de-944b-e07fc1f90ae7", "temperature_sensor", 12),
        channel_response("16fd2706-8baf-433b-82eb-8c7fada847da", "humidity_sensor", 0),
    ])
}

/// One page of rows, with an optional cursor for the next page.
pub fn rows_page(rows: Value, next_page_token: Option<&str>) -> Value {
    let mut page = json!({ "rows": rows });
    if let Some(token) = next_page_token {
        page["next_page_token"] = json!(token);
    }
    page
}

/// Successful push acknowledgment without echoed rows.
pub fn push_ack(inserted: u64) -> Value {
    json!({
        "op_status": "success",
        "op_details": {"available_rows": inserted}
    })
}

/// Backend error body for a missing resource.
pub fn error_not_found() -> Value {
    json!({"error": "not_found", "message": "no such channel"})
}

/// Backend error body for a rejected request.
pub fn error_validation() -> Value {
    json!({"error": "validation_error", "message": "rows must be a list"})
}
