//! Typed identifiers for members and connections.
//!
//! A [`MemberId`] comes from the client's auth frame and is only trusted
//! once the authentication backend accepts it. A [`ConnectionId`] is the
//! transport identity of a socket (its remote endpoint), unique while the
//! socket is open.

use std::fmt;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Member identity. Valid iff strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub i64);

impl MemberId {
    /// Sentinel for an unauthenticated or auth-rejected connection.
    pub const ANONYMOUS: MemberId = MemberId(-1);

    /// Whether this id names a real member.
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }

    /// Whether this id is the anonymous sentinel (or any non-positive value).
    pub fn is_anonymous(self) -> bool {
        !self.is_valid()
    }
}

/// Zero, the value an absent or `null` wire field decodes to. Anonymous.
impl Default for MemberId {
    fn default() -> Self {
        Self(0)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MemberId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Transport-layer identity of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create an identifier from an arbitrary label (used by test doubles).
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Borrow the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<SocketAddr> for ConnectionId {
    fn from(addr: SocketAddr) -> Self {
        Self(addr.to_string())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
