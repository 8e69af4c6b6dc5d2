//! Schema error types

/// Errors raised while building a schema or resolving a column reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Two columns share the same id.
    #[error("Duplicate column id '{0}'")]
    DuplicateColumn(String),

    /// A mutation referenced a column the schema does not declare.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// The column exists but does not support the requested operation.
    #[error("Column '{column}' does not support {operation}")]
    Unsupported {
        column: String,
        operation: &'static str,
    },
}

impl SchemaError {
    /// Creates a new unsupported operation error.
    pub fn unsupported(column: impl Into<String>, operation: &'static str) -> Self {
        Self::Unsupported {
            column: column.into(),
            operation,
        }
    }
}
