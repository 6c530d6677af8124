//! Backend readiness polling.
//!
//! [`ReadinessWatch`] re-checks [`ChatBackend::is_ready`] on a fixed
//! interval until it succeeds once, then stops. Dropping the watch aborts
//! the polling task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::backend::ChatBackend;

/// Default interval between readiness checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Handle to a running readiness poll.
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct ReadinessWatch {
    rx: watch::Receiver<bool>,
    task: JoinHandle<()>,
}

impl ReadinessWatch {
    /// Start polling `backend` every `interval`.
    ///
    /// The first check runs one interval after the call.
    pub fn spawn(backend: Arc<dyn ChatBackend>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut checks: u64 = 0;

            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }
                checks += 1;
                if backend.is_ready() {
                    info!(backend = backend.name(), checks, "Backend ready");
                    let _ = tx.send(true);
                    break;
                }
                debug!(backend = backend.name(), checks, "Backend not ready yet");
            }
        });

        Self { rx, task }
    }

    /// Whether readiness has been observed.
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Whether the polling task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the backend is ready.
    ///
    /// Returns `false` if polling stopped without readiness.
    pub async fn wait_ready(&mut self) -> bool {
        self.rx.wait_for(|ready| *ready).await.is_ok()
    }

    /// Stop polling.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for ReadinessWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}
