//! Read-only statistics reporter.

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gateway_realtime::channel::AppOccupancy;
use gateway_realtime::metrics::MetricsSnapshot;

use crate::state::AppState;

/// Full statistics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    /// When the report was taken.
    pub generated_at: DateTime<Utc>,
    /// Per-app occupancy, sorted by app name.
    pub apps: Vec<AppOccupancy>,
    /// Engine counters.
    pub metrics: MetricsSnapshot,
}

/// GET /stats
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        generated_at: Utc::now(),
        apps: state.engine.registry.enumerate(),
        metrics: state.engine.metrics.snapshot(),
    })
}

/// GET /stats/apps
pub async fn apps(State(state): State<AppState>) -> Json<Vec<AppOccupancy>> {
    Json(state.engine.registry.enumerate())
}
