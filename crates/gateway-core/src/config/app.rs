//! Listener configuration for the gateway and stats servers.

use serde::{Deserialize, Serialize};

/// Gateway HTTP/WebSocket server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_grace_seconds: default_shutdown_grace(),
        }
    }
}

/// Statistics listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Whether the stats listener is started.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Bind address (loopback by default).
    #[serde(default = "default_stats_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_stats_port")]
    pub port: u16,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_stats_host(),
            port: default_stats_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_shutdown_grace() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_stats_host() -> String {
    "127.0.0.1".to_string()
}

fn default_stats_port() -> u16 {
    6000
}
