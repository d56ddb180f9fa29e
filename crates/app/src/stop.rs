//! Stop signal — the explicit cancellation token handed to every worker.
//!
//! Every suspension point in a worker (poll sleep, match wait, min-delay)
//! is raced against [`StopSignal::stopped`], so stopping interrupts an
//! in-flight wait instead of waiting for it to finish.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// Why a worker was asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Manual shutdown.
    Shutdown,
    /// The watchdog fired.
    TimedOut { elapsed: Duration },
}

/// Cloneable one-shot cancellation token. The first reason wins.
#[derive(Debug, Clone)]
pub struct StopSignal {
    tx: Arc<watch::Sender<Option<StopReason>>>,
}

impl Default for StopSignal {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }
}

impl StopSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop. Returns `false` if a stop was already requested.
    pub fn stop(&self, reason: StopReason) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        })
    }

    #[must_use]
    pub fn reason(&self) -> Option<StopReason> {
        *self.tx.borrow()
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.reason().is_some()
    }

    /// Resolve once a stop has been requested. Cancel-safe.
    pub async fn stopped(&self) -> StopReason {
        let mut rx = self.tx.subscribe();
        let reason = rx.wait_for(Option::is_some).await.map(|reason| *reason);
        // The sender lives as long as `self`, so the channel cannot close.
        reason.ok().flatten().unwrap_or(StopReason::Shutdown)
    }
}
