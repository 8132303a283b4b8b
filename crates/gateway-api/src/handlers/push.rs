//! Push endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /push: accept a push envelope and fan it out
///
/// Answers 202 once the body decodes; delivery runs on its own task and
/// its outcome is never reported to the caller.
pub async fn push(State(state): State<AppState>, body: Bytes) -> Result<StatusCode, ApiError> {
    state.engine.dispatcher.dispatch(&body)?;
    debug!(bytes = body.len(), "Push accepted");
    Ok(StatusCode::ACCEPTED)
}
