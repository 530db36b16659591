//! Alert fan-out for background write failures.
//!
//! Optimistic updates succeed locally even when the server is unreachable,
//! so failures surface here instead of in the calling code path. UI layers
//! subscribe and show a toast; headless callers can just log.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

/// Broadcast channel capacity - enough to buffer a burst of failed saves
const ALERT_CAPACITY: usize = 32;

/// A user-facing failure notice raised by a background task.
#[derive(Debug, Clone)]
pub struct Alert {
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Fan-out point for [`Alert`]s.
///
/// Cloning shares the underlying channel. Dropping every receiver is fine;
/// alerts raised with no subscribers are still logged.
#[derive(Debug, Clone)]
pub struct AlertBus {
    tx: broadcast::Sender<Alert>,
}

impl AlertBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(ALERT_CAPACITY);
        Self { tx }
    }

    /// Subscribe to alerts raised after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Alert> {
        self.tx.subscribe()
    }

    /// Raise an alert: log it and notify every subscriber.
    pub fn notify(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{}", message);
        // send returns Err when no one is subscribed, safe to ignore
        let _ = self.tx.send(Alert {
            message,
            at: Utc::now(),
        });
    }
}

impl Default for AlertBus {
    fn default() -> Self {
        Self::new()
    }
}
