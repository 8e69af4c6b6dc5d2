//! FieldError for Row accessors

/// Error type for cell access operations on a row.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FieldError {
    /// The requested column has no value in the row.
    #[error("Column '{column}' not found in row")]
    Missing { column: String },

    /// The cell exists but has a different type than requested.
    #[error("Column '{column}' type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FieldError {
    /// Creates a new missing column error.
    pub fn missing(column: impl Into<String>) -> Self {
        Self::Missing {
            column: column.into(),
        }
    }

    /// Creates a new type mismatch error.
    pub fn type_mismatch(column: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected,
            actual,
        }
    }
}
