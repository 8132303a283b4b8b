//! Core traits defined in `gateway-core` and implemented by other crates.

pub mod auth;

pub use auth::MemberAuthenticator;
