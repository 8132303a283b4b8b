//! Push gateway protocol configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Protocol and fan-out configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Name of the private app. Subscriptions to it are scoped per member.
    #[serde(default = "default_private_app")]
    pub private_app: String,
    /// Deadline for the first (auth) frame, in seconds.
    #[serde(default = "default_auth_timeout")]
    pub auth_timeout_seconds: u64,
    /// Outbound frames buffered per connection before sends are dropped.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer_size: usize,
    /// Maximum inbound WebSocket frame size in bytes.
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
    /// Maximum push request body size in bytes.
    #[serde(default = "default_max_push_bytes")]
    pub max_push_bytes: usize,
}

impl GatewayConfig {
    /// Auth deadline as a [`Duration`].
    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_seconds)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            private_app: default_private_app(),
            auth_timeout_seconds: default_auth_timeout(),
            outbound_buffer_size: default_outbound_buffer(),
            max_frame_bytes: default_max_frame_bytes(),
            max_push_bytes: default_max_push_bytes(),
        }
    }
}

fn default_private_app() -> String {
    "im".to_string()
}

fn default_auth_timeout() -> u64 {
    10
}

fn default_outbound_buffer() -> usize {
    256
}

fn default_max_frame_bytes() -> usize {
    65_536
}

fn default_max_push_bytes() -> usize {
    65_536
}
