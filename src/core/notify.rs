//! User-facing notifications for completed and failed ledger mutations.

use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// A short message shown to the user after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Headline, e.g. "Transaction added"
    pub title: String,
    /// Detail line
    pub description: String,
    /// Whether this reports a failure
    pub is_error: bool,
}

impl Notification {
    /// A success notification.
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            is_error: false,
        }
    }

    /// A failure notification carrying the error message.
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            is_error: true,
        }
    }
}

/// Receives one notification per completed or failed mutation.
pub trait Notifier {
    /// Delivers a notification.
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        if notification.is_error {
            warn!("{}: {}", notification.title, notification.description);
        } else {
            info!("{}: {}", notification.title, notification.description);
        }
    }
}

/// Keeps notifications in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemoryNotifier {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first.
    #[must_use]
    pub fn received(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// The most recent notification.
    #[must_use]
    pub fn last(&self) -> Option<Notification> {
        self.received().pop()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: &Notification) {
        if let Ok(mut guard) = self.received.lock() {
            guard.push(notification.clone());
        }
    }
}
