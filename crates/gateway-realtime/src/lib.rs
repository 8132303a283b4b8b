//! # gateway-realtime
//!
//! Real-time push engine for the WebSocket gateway. Provides:
//!
//! - A narrow connection capability set (write handle + frame reader) and
//!   its WebSocket adapter
//! - The concurrent connection registry indexed by app and owner
//! - The per-connection protocol state machine (auth handshake, subscribe loop)
//! - Fan-out dispatch of push envelopes to matched connections
//! - Engine metrics and registry occupancy for the stats reporter

pub mod channel;
pub mod connection;
pub mod fanout;
pub mod message;
pub mod metrics;
pub mod protocol;
pub mod server;

pub use channel::registry::ConnectionRegistry;
pub use connection::handle::ConnectionHandle;
pub use fanout::dispatcher::FanOutDispatcher;
pub use protocol::session::ProtocolRunner;
pub use server::RealtimeEngine;
