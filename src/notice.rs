//! The process-wide error banner.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Holds the message of the last failed operation, shared by every controller of the app.
///
/// Clones share the same banner. Subscribers are notified whenever the message changes.
#[derive(Debug, Clone)]
pub struct ErrorDisplay {
    tx: Arc<watch::Sender<Option<String>>>,
}

impl Default for ErrorDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorDisplay {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Shows `message`, replacing whatever was shown before.
    pub fn set(&self, message: impl Into<String>) {
        let message = message.into();
        debug!("Error display: {message}");
        self.tx.send_replace(Some(message));
    }

    /// Shows the message of `error`, including its context chain.
    pub fn set_error(&self, error: &anyhow::Error) {
        self.set(format!("{error:#}"));
    }

    pub fn clear(&self) {
        self.tx.send_if_modified(|current| current.take().is_some());
    }

    pub fn get(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    pub fn is_set(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}
