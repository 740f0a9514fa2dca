//! HTTP server startup logic.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::error::FatalError;

/// Bind the responder's TCP listener.
///
/// Binding happens before anything else starts so that a port conflict is
/// reported as a startup failure.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, FatalError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| FatalError::Bind { addr, source })
}

/// Serve `app` on `listener` until `shutdown` is cancelled.
///
/// This function blocks until the server shuts down.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), FatalError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Starting HTTP server");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(FatalError::Serve)
}
