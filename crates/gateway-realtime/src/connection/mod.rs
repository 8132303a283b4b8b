//! Connection capability set: a shared write handle, an exclusive frame
//! reader, the WebSocket adapter that produces both, and the static
//! authentication backend.

pub mod authenticator;
pub mod handle;
pub mod reader;
pub mod websocket;

#[cfg(test)]
pub mod mock;

pub use handle::ConnectionHandle;
pub use reader::FrameReader;
