//! Record schema validation

use serde_json::Value;

use super::NoticeRecord;
use crate::error::SchemaViolation;

/// Expected JSON shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Array,
    Object,
    /// Display text: a string, an array of strings, or a language map.
    Text,
    /// Any non-null value.
    Any,
}

impl FieldKind {
    fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Array => "array",
            Self::Object => "object",
            Self::Text => "text",
            Self::Any => "any",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Text => match value {
                Value::String(_) | Value::Object(_) => true,
                Value::Array(items) => items.iter().all(Value::is_string),
                _ => false,
            },
            Self::Any => true,
        }
    }
}

/// A single field expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

/// Set of field rules applied to every record.
///
/// # Example
///
/// ```
/// use ted_search_lib::model::{FieldKind, RecordSchema};
///
/// let schema = RecordSchema::default()
///     .require("buyer-name", FieldKind::Text)
///     .optional("deadline-date", FieldKind::String);
/// assert_eq!(schema.rules().len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    rules: Vec<FieldRule>,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self::empty()
            .require("publication-number", FieldKind::String)
            .optional("publication-date", FieldKind::String)
            .optional("title", FieldKind::Text)
    }
}

impl RecordSchema {
    /// A schema with no rules; any JSON object passes.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds a required field. Replaces any existing rule for the same name.
    pub fn require(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.rule(name.into(), kind, true)
    }

    /// Adds an optional field that is type-checked when present.
    pub fn optional(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.rule(name.into(), kind, false)
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Narrows the schema to the fields a query actually requests.
    ///
    /// Rules for fields outside `fields` are dropped, since the server never
    /// sends them. Requested fields without a rule become optional
    /// [`FieldKind::Any`].
    pub fn project<S: AsRef<str>>(&self, fields: &[S]) -> Self {
        let mut projected = Self::empty();
        for field in fields {
            let field = field.as_ref();
            projected = match self.rules.iter().find(|rule| rule.name == field) {
                Some(rule) => projected.rule(rule.name.clone(), rule.kind, rule.required),
                None => projected.optional(field, FieldKind::Any),
            };
        }
        projected
    }

    fn rule(mut self, name: String, kind: FieldKind, required: bool) -> Self {
        self.rules.retain(|rule| rule.name != name);
        self.rules.push(FieldRule { name, kind, required });
        self
    }
}

/// Records of one page that passed validation, plus the ones that did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedPage {
    pub records: Vec<NoticeRecord>,
    pub violations: Vec<SchemaViolation>,
}

/// Checks raw response items against a [`RecordSchema`].
#[derive(Debug, Clone, Default)]
pub struct RecordValidator {
    schema: RecordSchema,
}

impl RecordValidator {
    pub fn new(schema: RecordSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Validates one raw item.
    pub fn validate(&self, raw: Value) -> Result<NoticeRecord, SchemaViolation> {
        let fields = match raw {
            Value::Object(fields) => fields,
            other => return Err(SchemaViolation::not_an_object(json_type(&other))),
        };

        for rule in &self.schema.rules {
            match fields.get(&rule.name) {
                None | Some(Value::Null) if rule.required => {
                    return Err(SchemaViolation::missing(&rule.name));
                }
                None | Some(Value::Null) => {}
                Some(value) if !rule.kind.matches(value) => {
                    return Err(SchemaViolation::type_mismatch(
                        &rule.name,
                        rule.kind.name(),
                        json_type(value),
                    ));
                }
                Some(_) => {}
            }
        }

        Ok(NoticeRecord::new(fields))
    }

    /// Validates every item of a page, keeping page order.
    ///
    /// A bad item is reported in `violations` and does not affect the others.
    pub fn validate_page(&self, raw: Vec<Value>) -> ValidatedPage {
        let mut page = ValidatedPage::default();
        for (position, item) in raw.into_iter().enumerate() {
            match self.validate(item) {
                Ok(record) => page.records.push(record),
                Err(violation) => {
                    let violation = violation.at(position);
                    log::warn!("skipping notice: {}", violation);
                    page.violations.push(violation);
                }
            }
        }
        page
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ViolationKind;

    #[test]
    fn test_valid_record() {
        let validator = RecordValidator::default();
        let record = validator
            .validate(json!({
                "publication-number": "00012345-2025",
                "publication-date": "2025-06-18+02:00",
                "title": {"eng": "Diagnostic reagents"},
                "classification-cpv": ["33696500"]
            }))
            .unwrap();
        assert_eq!(record.publication_number(), Some("00012345-2025"));
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_missing_required_field() {
        let validator = RecordValidator::default();
        let err = validator.validate(json!({"title": "PCR"})).unwrap_err();
        assert_eq!(err.field, "publication-number");
        assert_eq!(err.kind, ViolationKind::Missing);
    }

    #[test]
    fn test_null_required_field_is_missing() {
        let validator = RecordValidator::default();
        let err = validator
            .validate(json!({"publication-number": null}))
            .unwrap_err();
        assert_eq!(err.kind, ViolationKind::Missing);
    }

    #[test]
    fn test_type_mismatch() {
        let validator = RecordValidator::default();
        let err = validator
            .validate(json!({"publication-number": 42}))
            .unwrap_err();
        assert_eq!(
            err.kind,
            ViolationKind::TypeMismatch {
                expected: "string",
                actual: "number"
            }
        );
        assert_eq!(
            err.to_string(),
            "field 'publication-number' type mismatch: expected string, got number"
        );
    }

    #[test]
    fn test_optional_field_type_checked_when_present() {
        let validator = RecordValidator::default();
        assert!(validator
            .validate(json!({"publication-number": "1-2025", "title": 7}))
            .is_err());
        assert!(validator
            .validate(json!({"publication-number": "1-2025", "title": null}))
            .is_ok());
        assert!(validator
            .validate(json!({"publication-number": "1-2025", "title": ["a", "b"]}))
            .is_ok());
    }

    #[test]
    fn test_not_an_object() {
        let validator = RecordValidator::default();
        let err = validator.validate(json!(["publication-number"])).unwrap_err();
        assert_eq!(err.field, "$");
        assert_eq!(err.kind, ViolationKind::NotAnObject { actual: "array" });
    }

    #[test]
    fn test_page_keeps_good_records() {
        let validator = RecordValidator::default();
        let page = validator.validate_page(vec![
            json!({"publication-number": "1-2025"}),
            json!({"publication-number": "2-2025"}),
            json!({"title": "no number"}),
            json!({"publication-number": "3-2025"}),
        ]);

        assert_eq!(page.records.len(), 3);
        assert_eq!(page.violations.len(), 1);
        assert_eq!(page.violations[0].position, Some(2));
        assert_eq!(page.violations[0].field, "publication-number");
        let numbers: Vec<_> = page
            .records
            .iter()
            .filter_map(|r| r.publication_number())
            .collect();
        assert_eq!(numbers, vec!["1-2025", "2-2025", "3-2025"]);
    }

    #[test]
    fn test_projection_follows_requested_fields() {
        let schema = RecordSchema::default().project(&["title", "buyer-name"]);
        assert_eq!(
            schema.rules(),
            [
                FieldRule {
                    name: "title".to_string(),
                    kind: FieldKind::Text,
                    required: false,
                },
                FieldRule {
                    name: "buyer-name".to_string(),
                    kind: FieldKind::Any,
                    required: false,
                },
            ]
        );

        let validator = RecordValidator::new(schema);
        assert!(validator
            .validate(json!({"title": {"eng": "PCR kits"}, "buyer-name": "Charité"}))
            .is_ok());
        assert!(validator.validate(json!({"title": 3})).is_err());
    }

    #[test]
    fn test_projection_keeps_required_when_requested() {
        let schema = RecordSchema::default().project(&["publication-number", "notice-type"]);
        let validator = RecordValidator::new(schema);
        let err = validator.validate(json!({"notice-type": "cn"})).unwrap_err();
        assert_eq!(err.field, "publication-number");
    }

    #[test]
    fn test_rule_replacement() {
        let schema = RecordSchema::default().optional("publication-number", FieldKind::Any);
        assert_eq!(schema.rules().len(), 3);
        let validator = RecordValidator::new(schema);
        assert!(validator.validate(json!({})).is_ok());
    }
}
