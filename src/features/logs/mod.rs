//! Read-only access to the append-only activity log.

pub mod client;
pub mod types;

pub use types::{ActivityLogEntry, ActivityType, LogQuery};
