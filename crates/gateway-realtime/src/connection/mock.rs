//! Test doubles for the connection capability set.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use gateway_core::result::AppResult;
use gateway_core::types::ConnectionId;

use super::handle::{ConnectionHandle, Outbound};
use super::reader::FrameReader;

/// A reader fed from a channel. Dropping the feeder reads as a peer close;
/// keeping it without sending leaves `read_frame` pending.
#[derive(Debug)]
pub struct ScriptedReader {
    frames: mpsc::UnboundedReceiver<AppResult<String>>,
}

#[async_trait]
impl FrameReader for ScriptedReader {
    async fn read_frame(&mut self) -> AppResult<String> {
        match self.frames.recv().await {
            Some(frame) => frame,
            None => Err(gateway_core::AppError::connection_closed("script ended")),
        }
    }
}

/// Feeds frames into a [`ScriptedReader`].
#[derive(Debug, Clone)]
pub struct Feeder(mpsc::UnboundedSender<AppResult<String>>);

impl Feeder {
    /// Queues a text frame.
    pub fn frame(&self, text: &str) {
        let _ = self.0.send(Ok(text.to_string()));
    }

    /// Queues a read error.
    pub fn error(&self, err: gateway_core::AppError) {
        let _ = self.0.send(Err(err));
    }
}

/// Creates a scripted reader and its feeder.
pub fn scripted_reader() -> (Feeder, ScriptedReader) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Feeder(tx), ScriptedReader { frames: rx })
}

/// Collects what a connection was sent.
#[derive(Debug)]
pub struct Inbox {
    rx: mpsc::Receiver<Outbound>,
}

impl Inbox {
    /// Everything queued so far, frames as text and closes as `None`.
    pub fn drain(&mut self) -> Vec<Option<String>> {
        let mut out = Vec::new();
        while let Ok(item) = self.rx.try_recv() {
            out.push(match item {
                Outbound::Frame(frame) => Some(frame),
                Outbound::Close => None,
            });
        }
        out
    }

    /// Waits for the next queued item; a close reads as `None`.
    pub async fn next(&mut self) -> Option<String> {
        match self.rx.recv().await {
            Some(Outbound::Frame(frame)) => Some(frame),
            Some(Outbound::Close) | None => None,
        }
    }

    /// Only the text frames queued so far.
    pub fn frames(&mut self) -> Vec<String> {
        self.drain().into_iter().flatten().collect()
    }
}

/// Creates a handle whose output lands in an [`Inbox`].
pub fn test_handle(label: &str) -> (Arc<ConnectionHandle>, Inbox) {
    let (handle, rx) = ConnectionHandle::new(ConnectionId::new(label), 64);
    (handle, Inbox { rx })
}
