//! HTTP layer
//!
//! Axum server with:
//! - Session cookie middleware
//! - Request tracing
//! - Graceful shutdown
//! - HTML error pages

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod server;

pub use error::AppError;
pub use middleware::{session_layer, SESSION_COOKIE};
pub use server::{create_router, run_server, AppState, ServerConfig, ServerError};
