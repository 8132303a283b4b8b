//! App (channel) classification and bucket ownership.

use serde::{Deserialize, Serialize};

use gateway_core::types::MemberId;

/// Whether an app is broadcast to all subscribers or scoped per member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppKind {
    /// Every subscriber shares one bucket.
    Public,
    /// Subscribers are bucketed by member.
    Private,
}

/// Owner of a registry bucket within an app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    /// The shared bucket of a public app.
    Public,
    /// A member's bucket in the private app.
    Member(MemberId),
}

/// Static membership test deciding which app is private.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppClassifier {
    private_app: String,
}

impl AppClassifier {
    /// Creates a classifier with exactly one private app.
    pub fn new(private_app: impl Into<String>) -> Self {
        Self {
            private_app: private_app.into(),
        }
    }

    /// Name of the private app.
    pub fn private_app(&self) -> &str {
        &self.private_app
    }

    /// Classifies `app`.
    pub fn kind(&self, app: &str) -> AppKind {
        if app == self.private_app {
            AppKind::Private
        } else {
            AppKind::Public
        }
    }

    /// Whether `app` is the private app.
    pub fn is_private(&self, app: &str) -> bool {
        self.kind(app) == AppKind::Private
    }

    /// The bucket a connection belongs to in `app` given the member it
    /// presented. `None` means it has no bucket there (anonymous in the
    /// private app).
    pub fn owner_for(&self, app: &str, member: MemberId) -> Option<Owner> {
        match self.kind(app) {
            AppKind::Public => Some(Owner::Public),
            AppKind::Private if member.is_valid() => Some(Owner::Member(member)),
            AppKind::Private => None,
        }
    }
}
