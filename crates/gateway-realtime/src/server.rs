//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::WebSocket;
use dashmap::DashMap;
use tracing::info;

use gateway_core::config::gateway::GatewayConfig;
use gateway_core::traits::MemberAuthenticator;
use gateway_core::types::ConnectionId;

use crate::channel::registry::ConnectionRegistry;
use crate::channel::types::AppClassifier;
use crate::connection::handle::ConnectionHandle;
use crate::connection::websocket::WsConnection;
use crate::fanout::dispatcher::FanOutDispatcher;
use crate::metrics::EngineMetrics;
use crate::protocol::session::{ProtocolRunner, SessionEnd};

/// How long a finished connection's writer may take to flush its close.
const WRITER_DRAIN: Duration = Duration::from_secs(5);

/// Central real-time engine shared by the HTTP handlers.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection registry.
    pub registry: Arc<ConnectionRegistry>,
    /// Push fan-out.
    pub dispatcher: FanOutDispatcher,
    /// Per-connection protocol.
    pub protocol: ProtocolRunner,
    /// Metrics collector.
    pub metrics: Arc<EngineMetrics>,
    /// Every open connection, registered or not, for shutdown.
    live: Arc<DashMap<ConnectionId, Arc<ConnectionHandle>>>,
    /// Protocol configuration.
    config: GatewayConfig,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("private_app", &self.config.private_app)
            .field("live", &self.live.len())
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: GatewayConfig, authenticator: Arc<dyn MemberAuthenticator>) -> Self {
        let metrics = Arc::new(EngineMetrics::new());
        let registry = Arc::new(ConnectionRegistry::new(AppClassifier::new(
            config.private_app.clone(),
        )));
        let dispatcher = FanOutDispatcher::new(Arc::clone(&registry), Arc::clone(&metrics));
        let protocol = ProtocolRunner::new(
            Arc::clone(&registry),
            authenticator,
            Arc::clone(&metrics),
            config.auth_timeout(),
        );

        info!(
            private_app = %config.private_app,
            auth_timeout_seconds = config.auth_timeout_seconds,
            "Real-time engine initialized"
        );

        Self {
            registry,
            dispatcher,
            protocol,
            metrics,
            live: Arc::new(DashMap::new()),
            config,
        }
    }

    /// Serves an upgraded socket for its whole lifetime.
    pub async fn serve_socket(&self, socket: WebSocket, id: ConnectionId) -> SessionEnd {
        let WsConnection {
            handle,
            reader,
            mut writer,
        } = WsConnection::split(socket, id, self.config.outbound_buffer_size);

        self.live.insert(handle.id().clone(), Arc::clone(&handle));
        let end = self.protocol.run(Arc::clone(&handle), reader).await;
        self.live.remove(handle.id());
        drop(handle);

        if tokio::time::timeout(WRITER_DRAIN, &mut writer).await.is_err() {
            writer.abort();
        }
        end
    }

    /// Number of open connections, including ones still in the handshake.
    pub fn live_connections(&self) -> usize {
        self.live.len()
    }

    /// Initiates a graceful shutdown: every open connection is sent a close.
    /// Returns without waiting on any peer.
    pub fn shutdown(&self) {
        info!("Shutting down real-time engine");

        let handles: Vec<Arc<ConnectionHandle>> = self
            .live
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        for handle in &handles {
            handle.close();
        }

        info!(count = handles.len(), "Close sent to all connections");
    }
}
