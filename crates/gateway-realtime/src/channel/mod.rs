//! App classification and the connection registry.

pub mod registry;
pub mod types;

pub use registry::{AppOccupancy, ConnectionRegistry};
pub use types::{AppClassifier, AppKind, Owner};
