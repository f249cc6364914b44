//! Shutdown coordination for a checker run.

use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Coordinator for cancelling a run.
///
/// Workers, the deadline timer and the signal handler all share one token.
#[derive(Debug, Clone)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// A token observed by long-running tasks.
    pub fn subscribe(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Trigger the shutdown signal once `deadline` elapses.
    ///
    /// The returned handle should be aborted when the run finishes first.
    pub fn trigger_after(&self, deadline: Duration) -> tokio::task::JoinHandle<()> {
        let token = self.token.clone();
        tokio::spawn(async move {
            if !sleep_with_shutdown(deadline, &token).await {
                tracing::warn!(deadline = ?deadline, "Run deadline reached, cancelling remaining jobs");
                token.cancel();
            }
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Sleep for `duration`. Returns true if cancelled first.
pub async fn sleep_with_shutdown(duration: Duration, shutdown: &CancellationToken) -> bool {
    tokio::select! {
        _ = shutdown.cancelled() => true,
        _ = sleep(duration) => false,
    }
}
