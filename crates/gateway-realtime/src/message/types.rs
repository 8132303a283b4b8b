//! Inbound frame payloads and the push envelope.

use serde::{Deserialize, Deserializer, Serialize};

use gateway_core::error::AppError;
use gateway_core::types::MemberId;

/// First frame sent by a client: `{"member_id": <int>, "token": <string>}`.
///
/// Absent and `null` fields decode to zero values, so `{}` is an
/// anonymous auth. Only malformed JSON or a mistyped field fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMessage {
    /// Claimed member id; non-positive means anonymous.
    #[serde(default, deserialize_with = "null_as_default")]
    pub member_id: MemberId,
    /// Credential checked by the authentication backend.
    #[serde(default, deserialize_with = "null_as_default")]
    pub token: String,
}

impl AuthMessage {
    /// Parses an auth frame.
    pub fn parse(frame: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(frame)?)
    }
}

/// Any frame after auth: `{"app": <string>}`.
///
/// An absent or `null` app is the empty app name, which is a public app
/// like any other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeMessage {
    /// App (channel) name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub app: String,
}

impl SubscribeMessage {
    /// Parses a subscribe frame.
    pub fn parse(frame: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(frame)?)
    }
}

/// Push request body and the frame delivered to matched subscribers.
///
/// Field order is part of the wire format: `app`, `member_id`, `text`.
/// Absent and `null` fields decode to zero values and are delivered as such.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    /// Target app.
    #[serde(default, deserialize_with = "null_as_default")]
    pub app: String,
    /// Target member (only meaningful for the private app).
    #[serde(default, deserialize_with = "null_as_default")]
    pub member_id: MemberId,
    /// Opaque payload text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

impl PushMessage {
    /// Decodes a push request body.
    pub fn decode(body: &[u8]) -> Result<Self, AppError> {
        serde_json::from_slice(body)
            .map_err(|e| AppError::validation(format!("invalid push message: {e}")))
    }

    /// Serializes the envelope as delivered to subscribers.
    pub fn to_frame(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
