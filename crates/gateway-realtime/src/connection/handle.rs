//! Shared write side of a connection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};

use gateway_core::types::ConnectionId;

use crate::message::Reply;

/// Items queued for the connection's writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A text frame.
    Frame(String),
    /// Close the transport after everything queued before it.
    Close,
}

/// A handle to a single connection.
///
/// The registry stores these and the fan-out dispatcher writes through
/// them. Writes are queued on a bounded channel drained by a writer task
/// so a slow peer never blocks the caller.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Transport identity.
    id: ConnectionId,
    /// Sender for outbound frames.
    sender: mpsc::Sender<Outbound>,
    /// Cleared once the connection is closed or its writer is gone.
    alive: AtomicBool,
    /// Set when a close could not be queued; the writer stops at once.
    aborted: watch::Sender<bool>,
    /// When the connection was accepted.
    connected_at: DateTime<Utc>,
}

impl ConnectionHandle {
    /// Creates a handle and the receiver its writer task drains.
    pub fn new(id: ConnectionId, buffer: usize) -> (Arc<Self>, mpsc::Receiver<Outbound>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let handle = Arc::new(Self {
            id,
            sender,
            alive: AtomicBool::new(true),
            aborted: watch::channel(false).0,
            connected_at: Utc::now(),
        });
        (handle, receiver)
    }

    /// Transport identity of this connection.
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// When the connection was accepted.
    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Queues a text frame. Returns `false` if the frame was dropped.
    pub fn send(&self, frame: String) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(Outbound::Frame(frame)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Queues a coded reply.
    pub fn reply(&self, reply: &Reply) -> bool {
        self.send(reply.to_frame())
    }

    /// Closes the connection once already-queued frames are written.
    /// Later sends are refused. Never waits: if the queue is full the peer
    /// is not reading, and the writer is aborted instead.
    pub fn close(&self) {
        if !self.alive.swap(false, Ordering::SeqCst) {
            return;
        }
        match self.sender.try_send(Outbound::Close) {
            Ok(()) | Err(mpsc::error::TrySendError::Closed(_)) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full on close, aborting writer");
                self.aborted.send_replace(true);
            }
        }
    }

    /// Signal the writer task watches; it flips to `true` on a forced close.
    pub fn abort_signal(&self) -> watch::Receiver<bool> {
        self.aborted.subscribe()
    }

    /// Whether frames are still accepted.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
