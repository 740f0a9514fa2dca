use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::config::ConfigError;

/// Errors that terminate the fixture.
///
/// There is no recoverable category: each variant ends the process with a
/// non-zero exit status and the underlying message on stderr.
#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("HTTP server error: {0}")]
    Serve(#[source] io::Error),

    #[error("Failed to open heartbeat file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write heartbeat file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Heartbeat task aborted: {0}")]
    Task(#[from] tokio::task::JoinError),
}
