//! Adapter from an axum WebSocket to the connection capability set.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitStream;
use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use gateway_core::error::{AppError, ErrorKind};
use gateway_core::result::AppResult;
use gateway_core::types::ConnectionId;

use super::handle::{ConnectionHandle, Outbound};
use super::reader::FrameReader;

/// Read half of an upgraded WebSocket.
#[derive(Debug)]
pub struct WsFrameReader {
    stream: SplitStream<WebSocket>,
}

#[async_trait]
impl FrameReader for WsFrameReader {
    async fn read_frame(&mut self) -> AppResult<String> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text.as_str().to_owned()),
                Some(Ok(Message::Binary(bytes))) => {
                    return String::from_utf8(bytes.to_vec())
                        .map_err(|e| AppError::validation(format!("binary frame is not UTF-8: {e}")));
                }
                // Control frames are answered by axum itself.
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                Some(Ok(Message::Close(_))) | None => {
                    return Err(AppError::connection_closed("peer closed the connection"));
                }
                Some(Err(e)) => {
                    return Err(AppError::with_source(
                        ErrorKind::Transport,
                        "websocket read failed",
                        e,
                    ));
                }
            }
        }
    }
}

/// An upgraded socket split into the gateway's capabilities.
#[derive(Debug)]
pub struct WsConnection {
    /// Shared write handle.
    pub handle: Arc<ConnectionHandle>,
    /// Exclusive reader for the protocol task.
    pub reader: WsFrameReader,
    /// Task draining the handle's queue into the socket.
    pub writer: JoinHandle<()>,
}

impl WsConnection {
    /// Splits `socket` and spawns its writer task.
    pub fn split(socket: WebSocket, id: ConnectionId, buffer: usize) -> Self {
        let (sink, stream) = socket.split();
        let (handle, outbound_rx) = ConnectionHandle::new(id, buffer);
        let writer = tokio::spawn(forward_outbound(sink, outbound_rx, handle.abort_signal()));

        Self {
            handle,
            reader: WsFrameReader { stream },
            writer,
        }
    }
}

/// Drains the outbound queue into `sink` until a close, a write error, or
/// an abort. An aborted writer drops the sink without a close handshake.
async fn forward_outbound<S>(
    mut sink: S,
    mut outbound_rx: mpsc::Receiver<Outbound>,
    mut abort: watch::Receiver<bool>,
) where
    S: Sink<Message> + Unpin,
{
    loop {
        let item = tokio::select! {
            biased;
            item = outbound_rx.recv() => item,
            _ = aborted(&mut abort) => return,
        };

        match item {
            Some(Outbound::Frame(frame)) => {
                let written = tokio::select! {
                    result = sink.send(Message::Text(frame.into())) => result.is_ok(),
                    _ = aborted(&mut abort) => return,
                };
                if !written {
                    break;
                }
            }
            Some(Outbound::Close) => {
                tokio::select! {
                    _ = sink.send(Message::Close(None)) => {}
                    _ = aborted(&mut abort) => return,
                }
                break;
            }
            None => break,
        }
    }
    let _ = sink.close().await;
}

/// Resolves once the handle forces a close. A dropped handle never aborts;
/// its queue closing ends the writer instead.
async fn aborted(abort: &mut watch::Receiver<bool>) {
    if abort.wait_for(|aborted| *aborted).await.is_err() {
        std::future::pending::<()>().await;
    }
}
