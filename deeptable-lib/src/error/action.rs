//! Delegated action error types

use crate::action::ActionKind;

/// Errors from delegated row actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The host handler reported a failure.
    #[error("{kind} failed: {message}")]
    Rejected { kind: ActionKind, message: String },

    /// The action is disabled by configuration or has no handler.
    #[error("{0} action is not available")]
    Unavailable(ActionKind),

    /// The action needs a row but none was given.
    #[error("{0} action requires a row")]
    MissingRow(ActionKind),
}

impl ActionError {
    /// Creates a new rejection error.
    pub fn rejected(kind: ActionKind, message: impl Into<String>) -> Self {
        Self::Rejected {
            kind,
            message: message.into(),
        }
    }

    /// Returns the action this error belongs to.
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Rejected { kind, .. } => *kind,
            Self::Unavailable(kind) | Self::MissingRow(kind) => *kind,
        }
    }
}
