//! WebSocket upgrade handler.

use std::net::SocketAddr;

use axum::extract::ws::WebSocket;
use axum::extract::{ConnectInfo, State, WebSocketUpgrade};
use axum::response::Response;
use tracing::{debug, info};

use gateway_core::types::ConnectionId;

use crate::state::AppState;

/// GET /: WebSocket upgrade
///
/// No credentials are checked here; the first frame on the socket is the
/// auth message.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    ws: WebSocketUpgrade,
) -> Response {
    let max_frame = state.config.gateway.max_frame_bytes;
    ws.max_message_size(max_frame)
        .max_frame_size(max_frame)
        .on_upgrade(move |socket| handle_ws_connection(state, ConnectionId::from(addr), socket))
}

/// Runs an established WebSocket connection until it ends.
async fn handle_ws_connection(state: AppState, id: ConnectionId, socket: WebSocket) {
    info!(conn_id = %id, "WebSocket connection established");

    let end = state.engine.serve_socket(socket, id.clone()).await;

    debug!(conn_id = %id, end = ?end, "WebSocket connection finished");
}
