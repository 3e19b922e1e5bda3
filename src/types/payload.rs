//! Wire payload for Kronicle channel requests and responses

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::Record;

/// Data transfer object for any request to or response from the Kronicle
/// backend.
///
/// This structure centralizes everything the API can return for a channel:
/// identity, schema, metadata, tags, row-oriented data, column-oriented data,
/// and operation status. All fields are optional on the wire; endpoints fill
/// in the subset they care about.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelPayload {
    /// Unique identifier of the channel's sensor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_id: Option<Uuid>,

    /// Human-friendly channel name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_name: Option<String>,

    /// Column name to column type mapping. Types are validated at the serde
    /// level against the fixed set of labels the backend recognizes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_schema: Option<BTreeMap<String, ColumnType>>,

    /// Arbitrary metadata attached to the channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, Value>>,

    /// Tag set used for filtering and grouping channels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<serde_json::Map<String, Value>>,

    /// Row-oriented data, usually raw samples as received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Record>>,

    /// Column-oriented data produced by the backend for efficient retrieval.
    /// Each key is a column name; each value is the array of values for that
    /// column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<serde_json::Map<String, Value>>,

    /// Server-side timestamp for when the payload was created or returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<chrono::DateTime<chrono::Utc>>,

    /// Count of available data points for this channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_data: Option<u64>,

    /// Operation status returned by write/update operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op_status: Option<String>,

    /// Optional details attached to the operation result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op_details: Option<serde_json::Map<String, Value>>,

    /// Number of rows stored for this channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_rows: Option<u64>,

    /// Opaque cursor for the next page of rows. Absent means no further pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl ChannelPayload {
    /// Build a payload carrying rows for an existing channel.
    pub fn with_rows(sensor_id: Uuid, rows: Vec<Record>) -> Self {
        Self {
            sensor_id: Some(sensor_id),
            rows: Some(rows),
            ..Default::default()
        }
    }

    /// Return the sensor id or fail when it is missing.
    ///
    /// Write operations that target a specific channel require an id up front,
    /// so this surfaces [`Error::Configuration`] before any request is made.
    pub fn ensure_has_id(&self) -> Result<Uuid> {
        self.sensor_id
            .ok_or_else(|| Error::Configuration("sensor_id missing from payload".to_string()))
    }

    /// Whether the backend reported this operation as successful.
    ///
    /// Payloads without an `op_status` (plain reads) count as successful.
    pub fn op_succeeded(&self) -> bool {
        self.op_status.as_deref().map_or(true, |s| s == "success")
    }

    /// Rows carried by this payload, or an empty slice.
    pub fn rows(&self) -> &[Record] {
        self.rows.as_deref().unwrap_or(&[])
    }
}

/// Column type labels the backend recognizes in channel schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// UTF-8 string
    Str,
    /// Signed integer
    Int,
    /// Double-precision float
    Float,
    /// Boolean
    Bool,
    /// ISO-8601 timestamp
    Datetime,
    /// Nested JSON object
    Dict,
    /// JSON array
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_rejects_unknown_type_labels() {
        let result: std::result::Result<ChannelPayload, _> = serde_json::from_value(json!({
            "sensor_schema": {"time": "datetime", "temp": "unknown_type"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_round_trip_skips_absent_fields() {
        let payload = ChannelPayload {
            sensor_id: Some(Uuid::new_v4()),
            sensor_name: Some("temperature_sensor".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&payload).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("sensor_id"));
        assert!(!object.contains_key("rows"));
        assert!(!object.contains_key("next_page_token"));
        assert!(!object.contains_key("available_rows"));

        let back: ChannelPayload = serde_json::from_value(value).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_ensure_has_id() {
        let payload = ChannelPayload::default();
        assert!(payload.ensure_has_id().is_err());

        let id = Uuid::new_v4();
        let payload = ChannelPayload::with_rows(id, vec![]);
        assert_eq!(payload.ensure_has_id().unwrap(), id);
    }

    #[test]
    fn test_op_succeeded() {
        let mut payload = ChannelPayload::default();
        assert!(payload.op_succeeded());

        payload.op_status = Some("success".to_string());
        assert!(payload.op_succeeded());

        payload.op_status = Some("rejected".to_string());
        assert!(!payload.op_succeeded());
    }
}
