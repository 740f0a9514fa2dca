//! Composition root: owns the responder and the heartbeat writer.
//!
//! [`Fixture::bind`] does the fallible startup work (resolving and binding the
//! listener). [`Fixture::run`] spawns the writer as a supervised task, serves
//! HTTP, and returns the first fatal error from either side.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::error::FatalError;
use crate::heartbeat::HeartbeatWriter;
use crate::http;
use crate::routes::create_router;

/// A bound fixture, ready to run.
pub struct Fixture {
    listener: TcpListener,
    writer: HeartbeatWriter,
}

impl Fixture {
    /// Bind the HTTP listener and prepare the heartbeat writer.
    pub async fn bind(config: &AppConfig) -> Result<Self, FatalError> {
        let addr = config.bind_addr()?;
        let listener = http::bind(addr).await?;
        Ok(Self {
            listener,
            writer: HeartbeatWriter::from_config(&config.heartbeat),
        })
    }

    /// Address the responder is listening on.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run both components until `shutdown` is cancelled or one of them fails.
    ///
    /// A failure in either component cancels `shutdown` so the other stops too,
    /// and the error is returned. On a clean shutdown the writer task is awaited
    /// before returning, so the heartbeat file is closed.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), FatalError> {
        let mut writer = tokio::spawn(self.writer.run(shutdown.child_token()));
        let server = http::serve(self.listener, create_router(), shutdown.clone());
        tokio::pin!(server);

        tokio::select! {
            result = &mut writer => {
                shutdown.cancel();
                let result = result.map_err(FatalError::from).and_then(|r| r);
                if let Err(e) = &result {
                    tracing::error!(error = %e, "Heartbeat writer failed");
                }
                // The server drains and stops once shutdown is cancelled.
                let served = server.await;
                result.and(served)
            }
            result = &mut server => {
                shutdown.cancel();
                if let Err(e) = &result {
                    tracing::error!(error = %e, "HTTP server failed");
                }
                let written = writer.await.map_err(FatalError::from).and_then(|r| r);
                result.and(written)
            }
        }
    }
}
