//! Row actions delegated to the hosting application.
//!
//! Add, edit, delete and view are performed by the host through a
//! [`RowActions`] handler. The engine only issues the calls and tracks
//! whether any of them is still pending and whether the last one failed.

mod status;

pub use status::ActionFault;
pub use status::ActionStatus;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::config::ActionFlags;
use crate::error::ActionError;
use crate::model::Row;
use crate::model::Schema;

/// The delegated row actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Add,
    Edit,
    Delete,
    View,
}

impl ActionKind {
    /// Returns `true` if the action operates on an existing row.
    pub fn needs_row(self) -> bool {
        !matches!(self, ActionKind::Add)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Add => "Add",
            ActionKind::Edit => "Edit",
            ActionKind::Delete => "Delete",
            ActionKind::View => "View",
        };
        f.write_str(name)
    }
}

/// One invocation of a delegated action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub row: Option<Row>,
}

impl ActionRequest {
    pub fn add() -> Self {
        Self {
            kind: ActionKind::Add,
            row: None,
        }
    }

    pub fn edit(row: Row) -> Self {
        Self {
            kind: ActionKind::Edit,
            row: Some(row),
        }
    }

    pub fn delete(row: Row) -> Self {
        Self {
            kind: ActionKind::Delete,
            row: Some(row),
        }
    }

    pub fn view(row: Row) -> Self {
        Self {
            kind: ActionKind::View,
            row: Some(row),
        }
    }
}

/// Handler for delegated row actions, implemented by the host.
///
/// Every method defaults to [`ActionError::Unavailable`]; implement the ones
/// the host supports and report them from [`supports`](Self::supports).
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use deeptable_lib::action::{ActionKind, RowActions};
/// use deeptable_lib::error::ActionError;
/// use deeptable_lib::model::Row;
///
/// struct Deleter;
///
/// #[async_trait]
/// impl RowActions for Deleter {
///     fn supports(&self, kind: ActionKind) -> bool {
///         kind == ActionKind::Delete
///     }
///
///     async fn delete(&self, row: &Row) -> Result<(), ActionError> {
///         println!("deleting {:?}", row);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait RowActions: Send + Sync {
    /// Returns `true` if the handler implements the given action.
    fn supports(&self, kind: ActionKind) -> bool;

    /// Creates a new row for the given schema.
    async fn add(&self, schema: &Schema) -> Result<(), ActionError> {
        let _ = schema;
        Err(ActionError::Unavailable(ActionKind::Add))
    }

    /// Edits an existing row.
    async fn edit(&self, row: &Row, schema: &Schema) -> Result<(), ActionError> {
        let _ = (row, schema);
        Err(ActionError::Unavailable(ActionKind::Edit))
    }

    /// Deletes a row.
    async fn delete(&self, row: &Row) -> Result<(), ActionError> {
        let _ = row;
        Err(ActionError::Unavailable(ActionKind::Delete))
    }

    /// Shows the details of a row.
    async fn view(&self, row: &Row) -> Result<(), ActionError> {
        let _ = row;
        Err(ActionError::Unavailable(ActionKind::View))
    }
}

/// Runs delegated actions and records their outcome.
///
/// Clones share the same [`ActionStatus`], so a clone can be moved into a
/// task while the view keeps reporting busy and error state.
#[derive(Clone, Default)]
pub struct ActionDispatcher {
    handler: Option<Arc<dyn RowActions>>,
    flags: ActionFlags,
    status: Arc<ActionStatus>,
}

impl fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("has_handler", &self.handler.is_some())
            .field("flags", &self.flags)
            .field("status", &self.status)
            .finish()
    }
}

impl ActionDispatcher {
    /// Creates a dispatcher without a handler; every action is unavailable.
    pub fn new(flags: ActionFlags) -> Self {
        Self {
            handler: None,
            flags,
            status: Arc::new(ActionStatus::new()),
        }
    }

    /// Sets the handler (builder pattern).
    pub fn with_handler(mut self, handler: Arc<dyn RowActions>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Replaces the enabled actions.
    pub fn set_flags(&mut self, flags: ActionFlags) {
        self.flags = flags;
    }

    /// Returns the shared busy and failure state.
    pub fn status(&self) -> &Arc<ActionStatus> {
        &self.status
    }

    /// Returns `true` if the action is enabled and the handler supports it.
    pub fn is_available(&self, kind: ActionKind) -> bool {
        self.flags.is_enabled(kind) && self.handler.as_ref().is_some_and(|h| h.supports(kind))
    }

    /// Runs an action to completion.
    ///
    /// The view is busy until the handler settles. A failure reported by the
    /// handler is recorded in the status and returned. An unavailable action
    /// or a missing row is returned without touching the status.
    pub async fn run(&self, request: ActionRequest, schema: &Schema) -> Result<(), ActionError> {
        let kind = request.kind;
        let handler = match &self.handler {
            Some(handler) if self.is_available(kind) => handler,
            _ => {
                log::warn!("[action] {} is not available", kind);
                return Err(ActionError::Unavailable(kind));
            }
        };
        let row = match (&request.row, kind.needs_row()) {
            (Some(row), true) => Some(row),
            (None, true) => return Err(ActionError::MissingRow(kind)),
            (_, false) => None,
        };

        let _pending = self.status.begin();
        log::debug!("[action] {} started ({} pending)", kind, self.status.pending());

        let result = match (kind, row) {
            (ActionKind::Add, _) => handler.add(schema).await,
            (ActionKind::Edit, Some(row)) => handler.edit(row, schema).await,
            (ActionKind::Delete, Some(row)) => handler.delete(row).await,
            (ActionKind::View, Some(row)) => handler.view(row).await,
            (kind, None) => Err(ActionError::MissingRow(kind)),
        };

        match &result {
            Ok(()) => log::debug!("[action] {} settled", kind),
            Err(err) => {
                log::error!("[action] {}", err);
                self.status.record(ActionFault {
                    request: request.clone(),
                    message: err.to_string(),
                });
            }
        }
        result
    }

    /// Runs the last failed action again, if there is one.
    pub async fn retry(&self, schema: &Schema) -> Option<Result<(), ActionError>> {
        let request = self.status.take_retry()?;
        Some(self.run(request, schema).await)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use tokio::sync::oneshot;

    use super::*;
    use crate::model::Column;
    use crate::model::SemanticType;

    fn schema() -> Schema {
        Schema::new(vec![Column::new("name", "Name", SemanticType::String)]).unwrap()
    }

    /// Fails every first attempt, succeeds afterwards.
    #[derive(Default)]
    struct Flaky {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RowActions for Flaky {
        fn supports(&self, _kind: ActionKind) -> bool {
            true
        }

        async fn delete(&self, _row: &Row) -> Result<(), ActionError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ActionError::rejected(ActionKind::Delete, "row is locked"))
            } else {
                Ok(())
            }
        }
    }

    /// Blocks until released.
    struct Gate {
        release: tokio::sync::Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl RowActions for Gate {
        fn supports(&self, kind: ActionKind) -> bool {
            kind == ActionKind::Add
        }

        async fn add(&self, _schema: &Schema) -> Result<(), ActionError> {
            let rx = self.release.lock().await.take();
            if let Some(rx) = rx {
                let _ = rx.await;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_retried() {
        let dispatcher =
            ActionDispatcher::new(ActionFlags::all()).with_handler(Arc::new(Flaky::default()));
        let row = Row::new().set("name", "Beagle");

        let err = dispatcher
            .run(ActionRequest::delete(row.clone()), &schema())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ActionKind::Delete);
        assert_eq!(
            dispatcher.status().error_message().as_deref(),
            Some("Delete failed: row is locked")
        );
        assert!(!dispatcher.status().is_busy());

        let retried = dispatcher.retry(&schema()).await;
        assert_eq!(retried, Some(Ok(())));
        assert!(dispatcher.status().fault().is_none());
        assert_eq!(dispatcher.retry(&schema()).await, None);
    }

    #[tokio::test]
    async fn test_disabled_action_is_unavailable() {
        let flags = ActionFlags {
            delete: false,
            ..ActionFlags::all()
        };
        let dispatcher = ActionDispatcher::new(flags).with_handler(Arc::new(Flaky::default()));

        assert!(!dispatcher.is_available(ActionKind::Delete));
        let result = dispatcher
            .run(ActionRequest::delete(Row::new()), &schema())
            .await;
        assert_eq!(result, Err(ActionError::Unavailable(ActionKind::Delete)));
        assert!(dispatcher.status().fault().is_none());
    }

    #[tokio::test]
    async fn test_missing_handler_is_unavailable() {
        let dispatcher = ActionDispatcher::new(ActionFlags::all());
        assert!(!dispatcher.is_available(ActionKind::Add));
        assert_eq!(
            dispatcher.run(ActionRequest::add(), &schema()).await,
            Err(ActionError::Unavailable(ActionKind::Add))
        );
    }

    #[tokio::test]
    async fn test_missing_row() {
        let dispatcher =
            ActionDispatcher::new(ActionFlags::all()).with_handler(Arc::new(Flaky::default()));
        let request = ActionRequest {
            kind: ActionKind::Edit,
            row: None,
        };
        assert_eq!(
            dispatcher.run(request, &schema()).await,
            Err(ActionError::MissingRow(ActionKind::Edit))
        );
    }

    #[tokio::test]
    async fn test_busy_until_settled() {
        let (tx, rx) = oneshot::channel();
        let gate = Gate {
            release: tokio::sync::Mutex::new(Some(rx)),
        };
        let dispatcher = ActionDispatcher::new(ActionFlags::all()).with_handler(Arc::new(gate));
        let schema = schema();

        let running = dispatcher.run(ActionRequest::add(), &schema);
        let observe = async {
            tokio::task::yield_now().await;
            let busy = dispatcher.status().is_busy();
            let _ = tx.send(());
            busy
        };
        let (result, was_busy) = tokio::join!(running, observe);

        assert!(result.is_ok());
        assert!(was_busy);
        assert!(!dispatcher.status().is_busy());
    }
}
