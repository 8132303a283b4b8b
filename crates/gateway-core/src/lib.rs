//! # gateway-core
//!
//! Core crate for the WebSocket push gateway. Contains configuration
//! schemas, typed identifiers, the authentication backend trait, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other gateway crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
