//! Core type definitions used across the gateway workspace.

pub mod id;

pub use id::{ConnectionId, MemberId};
