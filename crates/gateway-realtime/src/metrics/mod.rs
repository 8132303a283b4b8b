//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Connections accepted since start
    pub connections_total: AtomicU64,
    /// Connections currently open
    pub connections_active: AtomicU64,
    /// Handshakes that ended with a missing-auth reply
    pub auth_missing: AtomicU64,
    /// Handshakes demoted to anonymous by the auth backend
    pub auth_rejected: AtomicU64,
    /// Handshakes that declared themselves anonymous
    pub auth_anonymous: AtomicU64,
    /// Handshakes that authenticated a member
    pub auth_members: AtomicU64,
    /// Accepted subscribe requests
    pub subscriptions_total: AtomicU64,
    /// Private subscribe attempts refused for anonymous connections
    pub subscriptions_forbidden: AtomicU64,
    /// Frames that did not parse as subscribe requests
    pub subscriptions_malformed: AtomicU64,
    /// Push requests accepted for fan-out
    pub pushes_accepted: AtomicU64,
    /// Push requests rejected at decode
    pub pushes_rejected: AtomicU64,
    /// Push frames queued to subscribers
    pub frames_delivered: AtomicU64,
    /// Push frames dropped (closed or saturated connection)
    pub delivery_failures: AtomicU64,
}

impl EngineMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly accepted connection.
    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a closed connection.
    pub fn connection_closed(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    /// Increment a counter by one.
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of one fan-out.
    pub fn record_fan_out(&self, delivered: u64, failed: u64) {
        self.frames_delivered.fetch_add(delivered, Ordering::Relaxed);
        self.delivery_failures.fetch_add(failed, Ordering::Relaxed);
    }

    /// Currently open connections.
    pub fn active_connections(&self) -> u64 {
        self.connections_active.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            auth_missing: self.auth_missing.load(Ordering::Relaxed),
            auth_rejected: self.auth_rejected.load(Ordering::Relaxed),
            auth_anonymous: self.auth_anonymous.load(Ordering::Relaxed),
            auth_members: self.auth_members.load(Ordering::Relaxed),
            subscriptions_total: self.subscriptions_total.load(Ordering::Relaxed),
            subscriptions_forbidden: self.subscriptions_forbidden.load(Ordering::Relaxed),
            subscriptions_malformed: self.subscriptions_malformed.load(Ordering::Relaxed),
            pushes_accepted: self.pushes_accepted.load(Ordering::Relaxed),
            pushes_rejected: self.pushes_rejected.load(Ordering::Relaxed),
            frames_delivered: self.frames_delivered.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub connections_total: u64,
    pub connections_active: u64,
    pub auth_missing: u64,
    pub auth_rejected: u64,
    pub auth_anonymous: u64,
    pub auth_members: u64,
    pub subscriptions_total: u64,
    pub subscriptions_forbidden: u64,
    pub subscriptions_malformed: u64,
    pub pushes_accepted: u64,
    pub pushes_rejected: u64,
    pub frames_delivered: u64,
    pub delivery_failures: u64,
}
