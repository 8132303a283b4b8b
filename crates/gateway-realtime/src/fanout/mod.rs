//! Fan-out of push envelopes to subscribed connections.

pub mod dispatcher;

pub use dispatcher::{FanOutDispatcher, FanOutReport};
