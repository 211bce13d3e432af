//! Validated notice record

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// A notice returned by the search API, after validation.
///
/// Holds the projected fields exactly as the server sent them. Records are
/// read-only: they are built by the [`RecordValidator`](super::RecordValidator)
/// and handed to the caller as-is.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use ted_search_lib::model::RecordValidator;
///
/// let validator = RecordValidator::default();
/// let record = validator
///     .validate(json!({"publication-number": "123456-2025", "title": {"eng": "PCR kits"}}))
///     .unwrap();
///
/// assert_eq!(record.publication_number(), Some("123456-2025"));
/// assert!(record.contains("title"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NoticeRecord {
    fields: Map<String, Value>,
}

impl NoticeRecord {
    pub(crate) fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Returns the raw value of a field, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns a field as a string slice if it holds a JSON string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Returns `true` if the field is present.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// The notice's publication number.
    pub fn publication_number(&self) -> Option<&str> {
        self.get_str("publication-number")
    }

    /// Iterates over field names.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consumes the record and returns its fields.
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    /// Consumes the record and returns it as a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
