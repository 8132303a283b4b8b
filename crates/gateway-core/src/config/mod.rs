//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files plus `GATEWAY__`-prefixed environment variables. Each
//! sub-module represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod gateway;
pub mod logging;

use std::path::Path;

use serde::{Deserialize, Serialize};

use self::app::{ServerConfig, StatsConfig};
use self::auth::AuthConfig;
use self::gateway::GatewayConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Every section has defaults, so an empty configuration is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gateway HTTP/WebSocket listener.
    #[serde(default)]
    pub server: ServerConfig,
    /// Read-only statistics listener.
    #[serde(default)]
    pub stats: StatsConfig,
    /// Protocol and fan-out settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Authentication backend settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `<dir>/default.toml`, `<dir>/<env>.toml`,
    /// and environment variables prefixed with `GATEWAY__`.
    pub fn load(dir: impl AsRef<Path>, env: &str) -> Result<Self, AppError> {
        let dir = dir.as_ref();
        let config = config::Config::builder()
            .add_source(
                config::File::with_name(&dir.join("default").to_string_lossy()).required(false),
            )
            .add_source(config::File::with_name(&dir.join(env).to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix("GATEWAY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("auth.denied_members"),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.gateway.private_app.trim().is_empty() {
            return Err(AppError::configuration("gateway.private_app must not be empty"));
        }
        if self.gateway.auth_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "gateway.auth_timeout_seconds must be positive",
            ));
        }
        if self.gateway.outbound_buffer_size == 0 {
            return Err(AppError::configuration(
                "gateway.outbound_buffer_size must be positive",
            ));
        }
        Ok(())
    }
}
