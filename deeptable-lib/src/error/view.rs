//! View mutation and composition error types

use std::any::Any;

use super::PageError;
use super::SchemaError;

/// Errors from view mutations.
///
/// A rejected mutation leaves the view unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The mutation referenced a missing column or one lacking the capability.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The page or page size is invalid.
    #[error(transparent)]
    Page(#[from] PageError),

    /// Row selection is disabled by configuration.
    #[error("Row selection is disabled")]
    SelectionDisabled,
}

/// A composition step that panicked.
///
/// Recorded by the view composer and logged; the previous derived rows stay
/// in place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("View step '{step}' failed: {message}")]
pub struct ViewFault {
    /// Name of the failed step ("filter" or "sort").
    pub step: &'static str,
    /// Panic message extracted from the panic payload.
    pub message: String,
}

/// Extract a human-readable message from a panic payload.
///
/// Panics can contain either `&str` or `String` payloads. This function
/// attempts to extract either, falling back to a generic message.
pub fn extract_panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
