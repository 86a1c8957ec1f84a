//! Heartbeat session entity and presence enums.

pub mod interval;
pub mod model;
pub mod status;

pub use interval::PollInterval;
pub use model::{HeartbeatSession, UpsertHeartbeat};
pub use status::{DerivedStatus, SessionStatus};
