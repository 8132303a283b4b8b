//! Pluggable identity verification.

use async_trait::async_trait;

use crate::types::MemberId;

/// Verifies a member's credentials during the connection handshake.
///
/// Called concurrently from every connection task, so implementations must
/// be `Send + Sync`. The time spent here extends the handshake.
#[async_trait]
pub trait MemberAuthenticator: Send + Sync + std::fmt::Debug + 'static {
    /// Returns `true` if `token` proves the caller is `member`.
    async fn authenticate(&self, member: MemberId, token: &str) -> bool;
}
