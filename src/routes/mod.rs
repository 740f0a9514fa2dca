//! HTTP routes for the fixture.
//!
//! Only [`INPUT_ROUTE`] is registered, for every method. Other paths fall
//! through to axum's default 404 handler.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request.

pub mod input;

use axum::{middleware, routing::any, Router};

use crate::config::INPUT_ROUTE;
use crate::middleware::request_id_layer;

/// Creates the Axum router for the responder.
pub fn create_router() -> Router {
    Router::new()
        .route(INPUT_ROUTE, any(input::accept))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
