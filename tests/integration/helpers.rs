//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;

use gateway_api::{AppState, build_gateway_router, build_stats_router};
use gateway_core::config::AppConfig;
use gateway_realtime::RealtimeEngine;
use gateway_realtime::connection::authenticator::StaticAuthenticator;

/// How long a test waits for a frame before giving up.
const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// Test application context
pub struct TestApp {
    /// Address of the running gateway listener
    pub addr: SocketAddr,
    /// Gateway router for in-process push requests
    pub router: Router,
    /// Stats router for in-process requests
    pub stats: Router,
    /// Engine shared by the listener and both routers
    pub engine: RealtimeEngine,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Spawns a gateway on an ephemeral port with a one second auth deadline.
    pub async fn spawn() -> Self {
        let mut config = AppConfig::default();
        config.gateway.auth_timeout_seconds = 1;
        Self::spawn_with(config).await
    }

    /// Spawns a gateway with the given configuration.
    pub async fn spawn_with(config: AppConfig) -> Self {
        let engine = RealtimeEngine::new(
            config.gateway.clone(),
            Arc::new(StaticAuthenticator::from_config(&config.auth)),
        );
        let state = AppState::new(config.clone(), engine.clone());
        let router = build_gateway_router(state.clone());
        let stats = build_stats_router(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local address");

        let served = router.clone();
        tokio::spawn(async move {
            axum::serve(
                listener,
                served.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Test server failed");
        });

        Self {
            addr,
            router,
            stats,
            engine,
            config,
        }
    }

    /// Opens a WebSocket client against the gateway.
    pub async fn connect(&self) -> WsClient {
        let (stream, _) = connect_async(format!("ws://{}/", self.addr))
            .await
            .expect("WebSocket handshake failed");
        WsClient { stream }
    }

    /// Connects, authenticates, and checks the hello reply.
    pub async fn connect_as(&self, member_id: i64, token: &str) -> WsClient {
        let mut client = self.connect().await;
        client
            .send(&serde_json::json!({ "member_id": member_id, "token": token }).to_string())
            .await;
        client.recv().await;
        client
    }

    /// Connects, authenticates, and subscribes; returns once the subscribe
    /// reply has arrived.
    pub async fn subscriber(&self, member_id: i64, app: &str) -> WsClient {
        let mut client = self.connect_as(member_id, "token").await;
        client.subscribe(app).await;
        client
    }

    /// Issues a push request in-process.
    pub async fn push(&self, body: &str) -> StatusCode {
        let req = Request::builder()
            .method("POST")
            .uri("/push")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        self.router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request")
            .status()
    }

    /// GETs a stats endpoint and returns the parsed body.
    pub async fn stats(&self, path: &str) -> TestResponse {
        let req = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .stats
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Polls `check` until it holds or the receive timeout elapses.
    pub async fn eventually(&self, check: impl Fn(&RealtimeEngine) -> bool) -> bool {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        while tokio::time::Instant::now() < deadline {
            if check(&self.engine) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        check(&self.engine)
    }
}

/// WebSocket client used by the tests.
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    /// Sends a text frame.
    pub async fn send(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    /// Sends a subscribe frame and returns the reply.
    pub async fn subscribe(&mut self, app: &str) -> String {
        self.send(&serde_json::json!({ "app": app }).to_string())
            .await;
        self.recv().await
    }

    /// Next text frame, or `None` once the gateway has closed.
    pub async fn try_recv(&mut self, wait: Duration) -> Option<String> {
        loop {
            match tokio::time::timeout(wait, self.stream.next()).await {
                Err(_) => return None,
                Ok(None) | Ok(Some(Err(_))) | Ok(Some(Ok(Message::Close(_)))) => return None,
                Ok(Some(Ok(Message::Text(text)))) => return Some(text.as_str().to_owned()),
                Ok(Some(Ok(_))) => continue,
            }
        }
    }

    /// Next text frame; panics if none arrives.
    pub async fn recv(&mut self) -> String {
        self.try_recv(RECV_TIMEOUT)
            .await
            .expect("Expected a text frame")
    }

    /// Asserts nothing arrives within a short window.
    pub async fn assert_silent(&mut self) {
        let frame = self.try_recv(Duration::from_millis(200)).await;
        assert!(frame.is_none(), "Unexpected frame: {frame:?}");
    }

    /// Waits for the gateway to close the connection.
    pub async fn expect_closed(&mut self) {
        loop {
            match tokio::time::timeout(RECV_TIMEOUT, self.stream.next()).await {
                Err(_) => panic!("Connection was not closed"),
                Ok(None) | Ok(Some(Err(_))) | Ok(Some(Ok(Message::Close(_)))) => return,
                Ok(Some(Ok(Message::Text(text)))) => panic!("Unexpected frame: {}", text.as_str()),
                Ok(Some(Ok(_))) => continue,
            }
        }
    }

    /// Drops the TCP stream without a close handshake.
    pub fn abort(self) {
        drop(self.stream);
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
