//! Heartbeat: a liveness and log-output fixture for integration tests.
//!
//! Serves `/v1/input` with an empty 200 response and appends a fixed line to a
//! log file on a fixed interval, so an external harness has a process it can
//! probe over HTTP and a file it can tail.

pub mod app;
pub mod config;
pub mod error;
pub mod heartbeat;
pub mod http;
pub mod middleware;
pub mod routes;

pub use app::Fixture;
pub use error::FatalError;
