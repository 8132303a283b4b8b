//! Exclusive read side of a connection.

use async_trait::async_trait;

use gateway_core::result::AppResult;

/// Reads the next text frame from a connection.
///
/// Exactly one protocol task owns a reader. Errors whose
/// [`is_disconnect`](gateway_core::AppError::is_disconnect) is true mean the
/// peer is gone; any other error is a frame that could not be decoded.
#[async_trait]
pub trait FrameReader: Send {
    /// Waits for the next frame.
    async fn read_frame(&mut self) -> AppResult<String>;
}
