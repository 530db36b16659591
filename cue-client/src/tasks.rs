//! Background task management.
//!
//! Registers, tracks and shuts down the client's background tasks.
//!
//! # Task kinds
//!
//! - [`TaskKind::Warmup`] - startup task, runs once
//! - [`TaskKind::Worker`] - long-lived background worker
//! - [`TaskKind::Periodic`] - timer-driven task

use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Task kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Startup task, runs once
    Warmup,
    /// Long-lived background worker
    Worker,
    /// Timer-driven task
    Periodic,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Warmup => write!(f, "Warmup"),
            TaskKind::Worker => write!(f, "Worker"),
            TaskKind::Periodic => write!(f, "Periodic"),
        }
    }
}

/// A registered background task
struct RegisteredTask {
    name: &'static str,
    kind: TaskKind,
    handle: JoinHandle<()>,
}

/// Background task manager
///
/// # Example
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
///
/// tasks.spawn("debounced_writer", TaskKind::Worker, async move {
///     worker.run().await;
/// });
///
/// // Graceful shutdown
/// tasks.shutdown().await;
/// ```
pub struct BackgroundTasks {
    tasks: Vec<RegisteredTask>,
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token tasks should watch for the shutdown signal.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Register and start a background task.
    ///
    /// The future is wrapped to catch panics; an abnormal exit is logged
    /// instead of taking the whole client down.
    pub fn spawn<F>(&mut self, name: &'static str, kind: TaskKind, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let wrapped_future = async move {
            let result: Result<(), Box<dyn std::any::Any + Send>> =
                AssertUnwindSafe(future).catch_unwind().await;
            match result {
                Ok(()) => {
                    // Normal completion - only log for non-Warmup tasks
                    if kind != TaskKind::Warmup {
                        tracing::warn!(task = %name, kind = %kind, "Background task completed unexpectedly");
                    }
                }
                Err(panic_info) => {
                    let panic_msg: String = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        (*s).to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    tracing::error!(
                        task = %name,
                        kind = %kind,
                        panic = %panic_msg,
                        "Background task panicked! This is a bug that should be reported."
                    );
                }
            }
        };

        let handle = tokio::spawn(wrapped_future);
        tracing::debug!(task = %name, kind = %kind, "Registered background task");
        self.tasks.push(RegisteredTask { name, kind, handle });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task counts as (warmup, worker, periodic).
    pub fn count_by_kind(&self) -> (usize, usize, usize) {
        let mut warmup = 0;
        let mut worker = 0;
        let mut periodic = 0;

        for task in &self.tasks {
            match task.kind {
                TaskKind::Warmup => warmup += 1,
                TaskKind::Worker => worker += 1,
                TaskKind::Periodic => periodic += 1,
            }
        }

        (warmup, worker, periodic)
    }

    pub fn log_summary(&self) {
        let (warmup, worker, periodic) = self.count_by_kind();
        tracing::info!(
            "Background tasks registered: {} total (Worker: {}, Periodic: {}, Warmup: {})",
            self.tasks.len(),
            worker,
            periodic,
            warmup
        );
    }

    /// Check the health of all tasks.
    ///
    /// Returns the number of tasks that already finished. A finished
    /// long-lived task means a panic or an early exit.
    pub fn check_health(&self) -> usize {
        let mut failed_count = 0;
        for task in &self.tasks {
            if task.handle.is_finished() {
                tracing::error!(
                    task = %task.name,
                    kind = %task.kind,
                    "Background task unexpectedly finished! This may indicate a panic or error."
                );
                failed_count += 1;
            }
        }
        if failed_count > 0 {
            tracing::error!(
                failed = failed_count,
                total = self.tasks.len(),
                "Background task health check: {} task(s) failed",
                failed_count
            );
        }
        failed_count
    }

    /// Graceful shutdown - cancel every task and wait for completion.
    pub async fn shutdown(self) {
        tracing::info!("Shutting down {} background tasks...", self.tasks.len());

        self.shutdown.cancel();

        for task in self.tasks {
            match task.handle.await {
                Ok(()) => {
                    tracing::debug!(task = %task.name, "Task completed");
                }
                Err(e) if e.is_cancelled() => {
                    tracing::debug!(task = %task.name, "Task cancelled");
                }
                Err(e) => {
                    tracing::error!(task = %task.name, error = ?e, "Task panicked");
                }
            }
        }

        tracing::info!("All background tasks stopped");
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}
