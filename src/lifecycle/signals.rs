//! OS signal handling.

use crate::lifecycle::shutdown::Shutdown;

/// Exit status for a forced exit on a second interrupt.
const INTERRUPTED: i32 = 130;

/// Cancel the run on Ctrl+C. A second Ctrl+C exits the process at once.
pub fn spawn_ctrl_c_handler(shutdown: Shutdown) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            return;
        }
        tracing::info!("Shutdown signal received, stopping job dispatch");
        shutdown.trigger();

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Second interrupt, exiting without waiting for in-flight probes");
            std::process::exit(INTERRUPTED);
        }
    })
}
