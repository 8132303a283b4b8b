//! Connection registry: live connections indexed by app and owner.
//!
//! Two levels of sharding: a `DashMap` from app name to that app's owner
//! map, and inside each app a `DashMap` from [`Owner`] to its bucket. A
//! mutation or read of one `(app, owner)` bucket holds only that bucket's
//! shard lock, so unrelated apps and members never contend. Reads return
//! owned snapshots so callers can write frames without holding any lock.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use gateway_core::result::AppResult;
use gateway_core::types::{ConnectionId, MemberId};

use crate::connection::handle::ConnectionHandle;

use super::types::{AppClassifier, AppKind, Owner};

type Bucket = HashMap<ConnectionId, Arc<ConnectionHandle>>;

/// Owner buckets of a single app.
#[derive(Debug, Default)]
struct AppConnections {
    owners: DashMap<Owner, Bucket>,
}

impl AppConnections {
    fn insert(&self, owner: Owner, conn: Arc<ConnectionHandle>) {
        self.owners
            .entry(owner)
            .or_default()
            .insert(conn.id().clone(), conn);
    }

    fn remove(&self, owner: &Owner, conn_id: &ConnectionId) -> bool {
        let (removed, emptied) = match self.owners.get_mut(owner) {
            Some(mut bucket) => {
                let removed = bucket.remove(conn_id).is_some();
                (removed, bucket.is_empty())
            }
            None => (false, false),
        };

        // Re-checked under the shard lock; a concurrent insert keeps the bucket.
        if emptied {
            self.owners.remove_if(owner, |_, bucket| bucket.is_empty());
        }
        removed
    }

    fn snapshot(&self, owner: &Owner) -> Vec<Arc<ConnectionHandle>> {
        self.owners
            .get(owner)
            .map(|bucket| bucket.values().cloned().collect())
            .unwrap_or_default()
    }

    fn bucket_len(&self, owner: &Owner) -> usize {
        self.owners.get(owner).map(|b| b.len()).unwrap_or(0)
    }

    fn occupied_members(&self) -> usize {
        self.owners
            .iter()
            .filter(|entry| matches!(entry.key(), Owner::Member(_)) && !entry.value().is_empty())
            .count()
    }
}

/// Occupancy of one app, as reported to the stats collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppOccupancy {
    /// App name.
    pub app: String,
    /// Public or private.
    pub kind: AppKind,
    /// Distinct members for the private app, connections otherwise.
    pub count: usize,
}

/// Concurrent index of subscribed connections.
#[derive(Debug)]
pub struct ConnectionRegistry {
    /// App name → owner buckets. Apps are never pruned.
    apps: DashMap<String, Arc<AppConnections>>,
    /// Decides which app is private.
    classifier: AppClassifier,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new(classifier: AppClassifier) -> Self {
        Self {
            apps: DashMap::new(),
            classifier,
        }
    }

    /// The classifier this registry buckets by.
    pub fn classifier(&self) -> &AppClassifier {
        &self.classifier
    }

    /// Records `conn` as a subscriber of `app`.
    ///
    /// Public apps ignore `owner_hint`. For the private app a non-positive
    /// hint makes this a no-op; the protocol layer refuses such
    /// subscriptions before they get here.
    pub fn save(
        &self,
        app: &str,
        owner_hint: MemberId,
        conn: Arc<ConnectionHandle>,
    ) -> AppResult<()> {
        let Some(owner) = self.classifier.owner_for(app, owner_hint) else {
            debug!(
                app = %app,
                member_id = %owner_hint,
                conn_id = %conn.id(),
                "Ignoring anonymous save to private app"
            );
            return Ok(());
        };

        self.app(app).insert(owner, conn);
        Ok(())
    }

    /// Removes `conn_id` from every bucket it could occupy: the public bucket
    /// of each app and, for a valid `member_hint`, that member's private
    /// bucket. Idempotent.
    pub fn remove(&self, member_hint: MemberId, conn_id: &ConnectionId) {
        // Snapshot app handles so no outer shard lock is held while
        // touching the inner maps.
        let apps: Vec<(String, Arc<AppConnections>)> = self
            .apps
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();

        let mut removed = 0usize;
        for (name, app) in &apps {
            if let Some(owner) = self.classifier.owner_for(name, member_hint) {
                if app.remove(&owner, conn_id) {
                    removed += 1;
                }
            }
        }

        debug!(
            conn_id = %conn_id,
            member_id = %member_hint,
            removed,
            "Removed connection from registry"
        );
    }

    /// Snapshot of the public bucket of `app`. Empty for unknown apps.
    pub fn public_connections(&self, app: &str) -> Vec<Arc<ConnectionHandle>> {
        match self.existing_app(app) {
            Some(connections) => connections.snapshot(&Owner::Public),
            None => Vec::new(),
        }
    }

    /// Snapshot of `member`'s bucket in the private app.
    pub fn private_connections(&self, member: MemberId) -> Vec<Arc<ConnectionHandle>> {
        match self.existing_app(self.classifier.private_app()) {
            Some(connections) => connections.snapshot(&Owner::Member(member)),
            None => Vec::new(),
        }
    }

    /// Per-app occupancy, sorted by app name.
    pub fn enumerate(&self) -> Vec<AppOccupancy> {
        let apps: Vec<(String, Arc<AppConnections>)> = self
            .apps
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();

        let mut occupancy: Vec<AppOccupancy> = apps
            .into_iter()
            .map(|(app, connections)| {
                let kind = self.classifier.kind(&app);
                let count = match kind {
                    AppKind::Private => connections.occupied_members(),
                    AppKind::Public => connections.bucket_len(&Owner::Public),
                };
                AppOccupancy { app, kind, count }
            })
            .collect();

        occupancy.sort_by(|a, b| a.app.cmp(&b.app));
        occupancy
    }

    /// Number of apps that have ever had a subscriber.
    pub fn app_count(&self) -> usize {
        self.apps.len()
    }

    fn app(&self, app: &str) -> Arc<AppConnections> {
        if let Some(existing) = self.existing_app(app) {
            return existing;
        }
        Arc::clone(
            self.apps
                .entry(app.to_string())
                .or_insert_with(|| Arc::new(AppConnections::default()))
                .value(),
        )
    }

    fn existing_app(&self, app: &str) -> Option<Arc<AppConnections>> {
        self.apps.get(app).map(|entry| Arc::clone(entry.value()))
    }
}
