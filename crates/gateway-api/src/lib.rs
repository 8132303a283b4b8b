//! # gateway-api
//!
//! Axum HTTP surface for the push gateway: the WebSocket upgrade endpoint,
//! the push endpoint, the read-only statistics reporter, health checks,
//! and the mapping from [`gateway_core::AppError`] to HTTP responses.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::{build_gateway_router, build_stats_router};
pub use state::AppState;
