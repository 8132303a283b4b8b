//! Route definitions for the gateway and the statistics reporter.
//!
//! The gateway router carries client traffic (WebSocket upgrade and push);
//! the stats router is read-only and bound to its own listener.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Builds the client-facing router.
pub fn build_gateway_router(state: AppState) -> Router {
    let max_push = state.config.gateway.max_push_bytes;

    Router::new()
        .route("/", get(handlers::ws::ws_upgrade))
        .route(
            "/push",
            post(handlers::push::push).layer(DefaultBodyLimit::max(max_push)),
        )
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Builds the read-only statistics router.
pub fn build_stats_router(state: AppState) -> Router {
    Router::new()
        .route("/stats", get(handlers::stats::stats))
        .route("/stats/apps", get(handlers::stats::apps))
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
