//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use gateway_core::config::AppConfig;
use gateway_realtime::RealtimeEngine;

/// Application state passed to every handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Real-time engine: registry, protocol, and fan-out.
    pub engine: RealtimeEngine,
}

impl AppState {
    /// Creates the state from a loaded configuration and a running engine.
    pub fn new(config: AppConfig, engine: RealtimeEngine) -> Self {
        Self {
            config: Arc::new(config),
            engine,
        }
    }
}
