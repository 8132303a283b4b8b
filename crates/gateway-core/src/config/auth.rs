//! Authentication backend configuration.

use serde::{Deserialize, Serialize};

/// Settings for the static member authenticator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Member ids whose credentials are always rejected.
    #[serde(default = "default_denied_members")]
    pub denied_members: Vec<i64>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            denied_members: default_denied_members(),
        }
    }
}

fn default_denied_members() -> Vec<i64> {
    vec![12345]
}
