//! Busy and failure state shared by in-flight actions.

use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use serde::Serialize;
use tokio::sync::Notify;

use super::ActionRequest;

/// A delegated action that failed, kept until dismissed or retried.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionFault {
    pub request: ActionRequest,
    pub message: String,
}

/// Tracks delegated actions that have not settled yet, and the last failure.
///
/// The view is busy while at least one action is pending. There is no
/// cancellation: an action whose handler never settles keeps the view busy.
#[derive(Debug, Default)]
pub struct ActionStatus {
    pending: AtomicUsize,
    fault: Mutex<Option<ActionFault>>,
    idle: Notify,
}

impl ActionStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of actions that have not settled.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Returns `true` while any action is pending.
    pub fn is_busy(&self) -> bool {
        self.pending() > 0
    }

    /// Returns the last failure, if not dismissed.
    pub fn fault(&self) -> Option<ActionFault> {
        self.lock_fault().clone()
    }

    /// Returns the message of the last failure, if not dismissed.
    pub fn error_message(&self) -> Option<String> {
        self.lock_fault().as_ref().map(|f| f.message.clone())
    }

    /// Clears the last failure.
    pub fn dismiss(&self) {
        self.lock_fault().take();
    }

    /// Clears the last failure and returns its request so it can be run again.
    pub fn take_retry(&self) -> Option<ActionRequest> {
        self.lock_fault().take().map(|f| f.request)
    }

    /// Waits until no action is pending.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if !self.is_busy() {
                return;
            }
            notified.await;
        }
    }

    pub(crate) fn record(&self, fault: ActionFault) {
        *self.lock_fault() = Some(fault);
    }

    pub(crate) fn begin(&self) -> PendingGuard<'_> {
        self.pending.fetch_add(1, Ordering::SeqCst);
        PendingGuard { status: self }
    }

    fn lock_fault(&self) -> std::sync::MutexGuard<'_, Option<ActionFault>> {
        self.fault.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks one action as pending until dropped.
pub(crate) struct PendingGuard<'a> {
    status: &'a ActionStatus,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.status.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.status.idle.notify_waiters();
        }
    }
}
