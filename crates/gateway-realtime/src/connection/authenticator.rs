//! Static authentication backend driven by configuration.

use std::collections::HashSet;

use async_trait::async_trait;

use gateway_core::config::auth::AuthConfig;
use gateway_core::traits::MemberAuthenticator;
use gateway_core::types::MemberId;

/// Accepts every positive member except a configured deny list.
///
/// Stands in for a real identity service; tokens are not inspected.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthenticator {
    denied: HashSet<MemberId>,
}

impl StaticAuthenticator {
    /// Creates an authenticator rejecting `denied`.
    pub fn new(denied: impl IntoIterator<Item = MemberId>) -> Self {
        Self {
            denied: denied.into_iter().collect(),
        }
    }

    /// Builds the authenticator from the `[auth]` config section.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.denied_members.iter().copied().map(MemberId))
    }
}

#[async_trait]
impl MemberAuthenticator for StaticAuthenticator {
    async fn authenticate(&self, member: MemberId, _token: &str) -> bool {
        member.is_valid() && !self.denied.contains(&member)
    }
}
