//! Per-connection protocol: auth handshake, then the subscribe loop.

pub mod session;
pub mod state;

pub use session::{ProtocolRunner, SessionEnd};
pub use state::{AuthOutcome, ProtocolState};
