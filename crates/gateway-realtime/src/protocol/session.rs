//! Drives one connection through the protocol state machine.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use gateway_core::traits::MemberAuthenticator;
use gateway_core::types::MemberId;

use crate::channel::registry::ConnectionRegistry;
use crate::connection::handle::ConnectionHandle;
use crate::connection::reader::FrameReader;
use crate::message::{AuthMessage, Reply, SubscribeMessage};
use crate::metrics::EngineMetrics;

use super::state::{AuthOutcome, ProtocolState};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Closed during the handshake; nothing was registered.
    MissingAuth,
    /// The peer went away; its registrations were removed.
    Disconnected,
}

/// Runs the protocol for accepted connections. One call to
/// [`run`](Self::run) per connection, each on its own task.
#[derive(Debug, Clone)]
pub struct ProtocolRunner {
    registry: Arc<ConnectionRegistry>,
    authenticator: Arc<dyn MemberAuthenticator>,
    metrics: Arc<EngineMetrics>,
    auth_timeout: Duration,
}

impl ProtocolRunner {
    /// Creates a runner sharing the engine's registry and metrics.
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        authenticator: Arc<dyn MemberAuthenticator>,
        metrics: Arc<EngineMetrics>,
        auth_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            authenticator,
            metrics,
            auth_timeout,
        }
    }

    /// Serves `conn` until it disconnects, then closes it.
    pub async fn run<R: FrameReader>(&self, conn: Arc<ConnectionHandle>, mut reader: R) -> SessionEnd {
        self.metrics.connection_opened();
        debug!(conn_id = %conn.id(), "Connection accepted");

        let mut state = ProtocolState::AwaitingAuth;
        let end = loop {
            state = match state {
                ProtocolState::AwaitingAuth => {
                    let outcome = self.handshake(&mut reader).await;
                    conn.reply(&outcome.reply());
                    match outcome.next_state() {
                        Some(next) => next,
                        None => break SessionEnd::MissingAuth,
                    }
                }
                ProtocolState::Subscribed { member } => match reader.read_frame().await {
                    Ok(frame) => {
                        self.subscribe(&conn, member, &frame);
                        state
                    }
                    Err(e) if e.is_disconnect() => {
                        debug!(conn_id = %conn.id(), error = %e, "Connection read ended");
                        self.registry.remove(member, conn.id());
                        break SessionEnd::Disconnected;
                    }
                    Err(e) => {
                        debug!(conn_id = %conn.id(), error = %e, "Undecodable frame");
                        EngineMetrics::incr(&self.metrics.subscriptions_malformed);
                        conn.reply(&Reply::bad_subscribe());
                        state
                    }
                },
            };
        };

        conn.close();
        self.metrics.connection_closed();
        let lifetime_ms = (Utc::now() - conn.connected_at()).num_milliseconds();
        info!(conn_id = %conn.id(), end = ?end, lifetime_ms, "Connection closed");
        end
    }

    /// Waits for the auth frame and consults the authentication backend.
    async fn handshake<R: FrameReader>(&self, reader: &mut R) -> AuthOutcome {
        let frame = match tokio::time::timeout(self.auth_timeout, reader.read_frame()).await {
            Ok(Ok(frame)) => frame,
            Ok(Err(e)) => {
                warn!(error = %e, "Connection failed before auth");
                EngineMetrics::incr(&self.metrics.auth_missing);
                return AuthOutcome::Missing;
            }
            Err(_) => {
                warn!(timeout = ?self.auth_timeout, "Auth frame deadline expired");
                EngineMetrics::incr(&self.metrics.auth_missing);
                return AuthOutcome::Missing;
            }
        };

        let auth = match AuthMessage::parse(&frame) {
            Ok(auth) => auth,
            Err(e) => {
                warn!(error = %e, "Unparseable auth frame");
                EngineMetrics::incr(&self.metrics.auth_missing);
                return AuthOutcome::Missing;
            }
        };

        if auth.member_id.is_anonymous() {
            EngineMetrics::incr(&self.metrics.auth_anonymous);
            return AuthOutcome::Stranger;
        }

        if !self
            .authenticator
            .authenticate(auth.member_id, &auth.token)
            .await
        {
            info!(member_id = %auth.member_id, "Credentials rejected, continuing as anonymous");
            EngineMetrics::incr(&self.metrics.auth_rejected);
            return AuthOutcome::Rejected;
        }

        info!(member_id = %auth.member_id, "Member authenticated");
        EngineMetrics::incr(&self.metrics.auth_members);
        AuthOutcome::Member(auth.member_id)
    }

    /// Handles one frame received in the `Subscribed` state.
    fn subscribe(&self, conn: &Arc<ConnectionHandle>, member: MemberId, frame: &str) {
        let sub = match SubscribeMessage::parse(frame) {
            Ok(sub) => sub,
            Err(e) => {
                debug!(conn_id = %conn.id(), error = %e, "Bad subscribe frame");
                EngineMetrics::incr(&self.metrics.subscriptions_malformed);
                conn.reply(&Reply::bad_subscribe());
                return;
            }
        };

        if member.is_anonymous() && self.registry.classifier().is_private(&sub.app) {
            debug!(conn_id = %conn.id(), app = %sub.app, "Anonymous private subscribe refused");
            EngineMetrics::incr(&self.metrics.subscriptions_forbidden);
            conn.reply(&Reply::subscribe_forbidden(&sub.app));
            return;
        }

        // Registered before the success reply so a client reacting to it is
        // already reachable.
        if let Err(e) = self.registry.save(&sub.app, member, Arc::clone(conn)) {
            warn!(conn_id = %conn.id(), app = %sub.app, error = %e, "Registry save failed");
        }
        EngineMetrics::incr(&self.metrics.subscriptions_total);
        conn.reply(&Reply::subscribe_success(&sub.app));

        debug!(
            conn_id = %conn.id(),
            member_id = %member,
            app = %sub.app,
            "Subscribed"
        );
    }
}
