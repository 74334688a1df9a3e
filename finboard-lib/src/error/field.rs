//! FieldError for Row accessors

/// Error type for typed field access on a [`Row`](crate::model::Row).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// The requested column is not present in the row.
    #[error("Column '{field}' not found in row")]
    Missing { field: String },

    /// The column exists but holds a different type than requested.
    #[error("Column '{field}' type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FieldError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }
}
