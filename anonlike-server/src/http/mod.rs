//! HTTP layer
//!
//! Axum server with:
//! - The like endpoint and its CORS preflight
//! - Health check
//! - Request tracing
//! - Graceful shutdown

pub mod cors;
pub mod routes;
pub mod server;
pub mod style;

pub use server::{build_router, run_server, ServerConfig, ServerError};
pub use style::{LikeOutcome, ResponseStyle};
