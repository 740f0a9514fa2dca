//! HTTP server module.
//!
//! Binds the responder's listener and serves the router until the process-wide
//! shutdown token is cancelled. SIGTERM/SIGINT cancel that token.

mod server;
mod shutdown;

pub use server::{bind, serve};
pub use shutdown::spawn_signal_handler;
