//! Debounced persistence of the table board.
//!
//! Rapid order edits would otherwise push the whole tables blob on every
//! click. Mutating paths call [`DebouncedWriter::touch`] instead; the worker
//! writes once after a quiescence window, restarting the window on each
//! touch. [`DebouncedWriter::flush`] forces the write and waits for it, for
//! callers that must not leave edits pending (checkout, shutdown).
//!
//! The worker snapshots the board at fire time, so a single write carries
//! every edit made during the window.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::alerts::AlertBus;
use crate::gateway::ClubGateway;
use crate::store::ClubStore;

/// Quiescence window after the last table edit
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(3);

enum WriterMessage {
    Touch,
    Flush(oneshot::Sender<()>),
}

/// Handle for scheduling table-board writes.
///
/// Cloning shares the worker.
#[derive(Clone)]
pub struct DebouncedWriter {
    tx: mpsc::UnboundedSender<WriterMessage>,
}

impl fmt::Debug for DebouncedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebouncedWriter").finish_non_exhaustive()
    }
}

impl DebouncedWriter {
    /// Build a writer handle and the worker that serves it.
    ///
    /// The worker must be spawned by the caller (see `BackgroundTasks`).
    pub fn channel(
        store: ClubStore,
        gateway: Arc<dyn ClubGateway>,
        alerts: AlertBus,
        delay: Duration,
    ) -> (Self, WriterWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = WriterWorker {
            rx,
            store,
            gateway,
            alerts,
            delay,
        };
        (Self { tx }, worker)
    }

    /// Schedule a write for `delay` after the most recent touch.
    pub fn touch(&self) {
        if self.tx.send(WriterMessage::Touch).is_err() {
            tracing::warn!("Table writer is gone, edits will not be persisted");
        }
    }

    /// Write the current board immediately and wait for the attempt.
    ///
    /// Also clears any pending debounce so the same state is not written
    /// twice.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(WriterMessage::Flush(ack_tx)).is_err() {
            tracing::warn!("Table writer is gone, flush skipped");
            return;
        }
        let _ = ack_rx.await;
    }
}

/// Consumes touch/flush messages and writes the table board.
pub struct WriterWorker {
    rx: mpsc::UnboundedReceiver<WriterMessage>,
    store: ClubStore,
    gateway: Arc<dyn ClubGateway>,
    alerts: AlertBus,
    delay: Duration,
}

impl fmt::Debug for WriterWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterWorker")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl WriterWorker {
    /// Run the worker until shutdown or until every handle is dropped.
    ///
    /// Pending edits are written before exiting either way.
    pub async fn run(mut self, shutdown: CancellationToken) {
        tracing::debug!("Table writer started (debounce {:?})", self.delay);
        let mut deadline: Option<Instant> = None;

        loop {
            let fire_at =
                deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

            tokio::select! {
                _ = shutdown.cancelled() => {
                    if deadline.is_some() {
                        self.write_now().await;
                    }
                    break;
                }

                _ = tokio::time::sleep_until(fire_at), if deadline.is_some() => {
                    self.write_now().await;
                    deadline = None;
                }

                msg = self.rx.recv() => match msg {
                    Some(WriterMessage::Touch) => {
                        deadline = Some(Instant::now() + self.delay);
                    }
                    Some(WriterMessage::Flush(ack)) => {
                        self.write_now().await;
                        deadline = None;
                        let _ = ack.send(());
                    }
                    None => {
                        if deadline.is_some() {
                            self.write_now().await;
                        }
                        break;
                    }
                },
            }
        }

        tracing::debug!("Table writer stopped");
    }

    async fn write_now(&self) {
        let tables = self.store.tables();
        match self.gateway.save_tables(&tables).await {
            Ok(()) => {
                tracing::debug!(count = tables.len(), "Saved table board");
            }
            Err(e) => {
                self.alerts.notify(format!("Failed to save tables: {}", e));
            }
        }
    }
}
