//! Opaque backend records

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One backend entity, represented as an ordered field-to-value mapping.
///
/// Records have no client-side schema: fields pass through untouched except
/// the few the SDK itself reads (the pagination token lives on the response
/// envelope, not on records). Field order is preserved as the backend sent it.
///
/// # Example
///
/// ```rust
/// use kronicle::Record;
/// use serde_json::json;
///
/// let mut record = Record::new();
/// record.insert("temperature", json!(21.5));
/// record.insert("unit", json!("C"));
/// assert_eq!(record.get("unit"), Some(&json!("C")));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(serde_json::Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field value, returning the previous value if the field existed.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Field names in order.
    pub fn fields(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// View the record as a plain JSON object.
    pub fn as_map(&self) -> &serde_json::Map<String, Value> {
        &self.0
    }

    /// Consume the record into a plain JSON object.
    pub fn into_map(self) -> serde_json::Map<String, Value> {
        self.0
    }
}

impl From<serde_json::Map<String, Value>> for Record {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = <serde_json::Map<String, Value> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_order_preserved() {
        let record: Record = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let fields: Vec<&String> = record.fields().collect();
        assert_eq!(fields, ["z", "a", "m"]);
    }

    #[test]
    fn test_transparent_serialization() {
        let mut record = Record::new();
        record.insert("time", json!("2024-01-01T00:00:00Z"));
        record.insert("temperature", json!(21.5));

        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, r#"{"time":"2024-01-01T00:00:00Z","temperature":21.5}"#);

        let back: Record = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_nested_values_pass_through() {
        let record: Record =
            serde_json::from_str(r#"{"meta": {"unit": "C"}, "samples": [1, 2, 3]}"#).unwrap();
        assert_eq!(record.get("meta"), Some(&json!({"unit": "C"})));
        assert_eq!(record.get("samples"), Some(&json!([1, 2, 3])));
    }
}
