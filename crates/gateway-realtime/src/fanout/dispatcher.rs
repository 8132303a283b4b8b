//! Fan-out dispatcher: resolves push targets and writes the envelope.
//!
//! Delivery is best-effort and at-most-once: a frame that cannot be queued
//! on a connection is dropped, never retried, and never reported back to
//! the push caller. The dispatcher only reads the registry.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use gateway_core::result::AppResult;

use crate::channel::registry::ConnectionRegistry;
use crate::message::PushMessage;
use crate::metrics::EngineMetrics;

/// Outcome of delivering one push envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutReport {
    /// Connections matched by the registry snapshot.
    pub targets: usize,
    /// Frames queued successfully.
    pub delivered: usize,
    /// Frames dropped.
    pub failed: usize,
}

/// Inbound push entry point.
#[derive(Debug, Clone)]
pub struct FanOutDispatcher {
    registry: Arc<ConnectionRegistry>,
    metrics: Arc<EngineMetrics>,
}

impl FanOutDispatcher {
    /// Creates a dispatcher over `registry`.
    pub fn new(registry: Arc<ConnectionRegistry>, metrics: Arc<EngineMetrics>) -> Self {
        Self { registry, metrics }
    }

    /// Decodes a push request body and, if valid, spawns its fan-out.
    ///
    /// Returns as soon as the body is decoded; the caller is never blocked
    /// on delivery. A decode failure is a validation error and touches
    /// nothing.
    pub fn dispatch(&self, body: &[u8]) -> AppResult<JoinHandle<FanOutReport>> {
        let push = match PushMessage::decode(body) {
            Ok(push) => push,
            Err(e) => {
                EngineMetrics::incr(&self.metrics.pushes_rejected);
                warn!(error = %e, "Rejected push request");
                return Err(e);
            }
        };

        EngineMetrics::incr(&self.metrics.pushes_accepted);
        let dispatcher = self.clone();
        Ok(tokio::spawn(async move { dispatcher.fan_out(&push) }))
    }

    /// Writes `push` to every connection it targets.
    pub fn fan_out(&self, push: &PushMessage) -> FanOutReport {
        let targets = if self.registry.classifier().is_private(&push.app) {
            self.registry.private_connections(push.member_id)
        } else {
            self.registry.public_connections(&push.app)
        };

        let frame = match push.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(app = %push.app, error = %e, "Failed to serialize push envelope");
                return FanOutReport {
                    targets: targets.len(),
                    delivered: 0,
                    failed: targets.len(),
                };
            }
        };

        let mut report = FanOutReport {
            targets: targets.len(),
            ..FanOutReport::default()
        };
        for conn in &targets {
            if conn.send(frame.clone()) {
                report.delivered += 1;
            } else {
                report.failed += 1;
                debug!(conn_id = %conn.id(), app = %push.app, "Push frame dropped");
            }
        }

        self.metrics
            .record_fan_out(report.delivered as u64, report.failed as u64);
        debug!(
            app = %push.app,
            member_id = %push.member_id,
            targets = report.targets,
            delivered = report.delivered,
            failed = report.failed,
            "Push fanned out"
        );
        report
    }
}
