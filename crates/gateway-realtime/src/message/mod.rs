//! Wire messages exchanged with clients and push callers.

pub mod reply;
pub mod types;

pub use reply::Reply;
pub use types::{AuthMessage, PushMessage, SubscribeMessage};
