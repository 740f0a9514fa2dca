//! Signal handling.
//!
//! SIGTERM/SIGINT cancel the shared shutdown token. The HTTP server then stops
//! accepting connections and the heartbeat writer returns after its current
//! write.

use tokio_util::sync::CancellationToken;

/// Cancel `shutdown` on SIGTERM or SIGINT.
///
/// If a signal handler cannot be installed, that signal is ignored and
/// the process keeps running; it can still be killed.
pub fn spawn_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, shutting down");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, shutting down");
            }
            _ = shutdown.cancelled() => {
                return;
            }
        }

        shutdown.cancel();
    });
}
