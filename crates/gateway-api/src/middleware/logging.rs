//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::http::header::UPGRADE;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, info};

/// Logs method, path, status, and latency of every request.
///
/// Health checks are logged at `debug` so they do not drown the access log.
/// For WebSocket upgrades the latency covers only the handshake.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let upgrade = request.headers().contains_key(UPGRADE);
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if path == "/health" {
        debug!(method = %method, path = %path, status, elapsed_ms, "HTTP request");
    } else {
        info!(
            method = %method,
            path = %path,
            status,
            elapsed_ms,
            upgrade,
            "HTTP request"
        );
    }

    response
}
