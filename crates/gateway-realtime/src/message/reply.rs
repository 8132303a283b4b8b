//! Coded replies sent to clients during the handshake and subscribe loop.

use serde::{Deserialize, Serialize};

use gateway_core::types::MemberId;

/// A coded reply: `{"code": <int>, "message": <string>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// HTTP-like status code.
    pub code: u16,
    /// Human-readable message.
    pub message: String,
}

impl Reply {
    fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The auth frame was missing, late, or unparseable.
    pub fn missing_auth() -> Self {
        Self::new(400, "missing auth message")
    }

    /// The authentication backend rejected the credentials.
    pub fn unauthorized() -> Self {
        Self::new(401, "unauthorized")
    }

    /// The client identified itself as anonymous.
    pub fn hello_stranger() -> Self {
        Self::new(200, "hello stranger")
    }

    /// The client authenticated as `member`.
    pub fn hello_member(member: MemberId) -> Self {
        Self::new(200, format!("hello {member}"))
    }

    /// A frame after auth could not be parsed as a subscribe request.
    pub fn bad_subscribe() -> Self {
        Self::new(400, "bad subscribe message")
    }

    /// Subscription to `app` accepted.
    pub fn subscribe_success(app: &str) -> Self {
        Self::new(200, format!("subscribe {app} success"))
    }

    /// Subscription to the private `app` refused for an anonymous client.
    pub fn subscribe_forbidden(app: &str) -> Self {
        Self::new(403, format!("subscribe {app} forbidden"))
    }

    /// Serializes the reply as a text frame.
    pub fn to_frame(&self) -> String {
        // Two plain fields; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
