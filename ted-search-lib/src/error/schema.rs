//! Record schema violations

use std::fmt;

/// What is wrong with a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// A required field is absent (or `null`).
    Missing,
    /// The field is present with the wrong JSON type.
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    /// The record itself is not a JSON object.
    NotAnObject { actual: &'static str },
}

/// A single raw record rejected by the [`RecordValidator`](crate::model::RecordValidator).
///
/// Violations are per record: the remaining records of the page and the
/// surrounding fetch carry on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Position of the record within its page, when known.
    pub position: Option<usize>,
    /// Offending field name, or `$` for the record as a whole.
    pub field: String,
    /// Description of the problem.
    pub kind: ViolationKind,
}

impl SchemaViolation {
    /// Creates a missing field violation.
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            position: None,
            field: field.into(),
            kind: ViolationKind::Missing,
        }
    }

    /// Creates a type mismatch violation.
    pub fn type_mismatch(field: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self {
            position: None,
            field: field.into(),
            kind: ViolationKind::TypeMismatch { expected, actual },
        }
    }

    /// Creates a violation for a record that is not an object.
    pub fn not_an_object(actual: &'static str) -> Self {
        Self {
            position: None,
            field: "$".to_string(),
            kind: ViolationKind::NotAnObject { actual },
        }
    }

    /// Attaches the record's position within its page.
    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(position) = self.position {
            write!(f, "record #{}: ", position)?;
        }
        match &self.kind {
            ViolationKind::Missing => write!(f, "field '{}' is missing", self.field),
            ViolationKind::TypeMismatch { expected, actual } => write!(
                f,
                "field '{}' type mismatch: expected {}, got {}",
                self.field, expected, actual
            ),
            ViolationKind::NotAnObject { actual } => {
                write!(f, "record is not an object (got {})", actual)
            }
        }
    }
}

impl std::error::Error for SchemaViolation {}
