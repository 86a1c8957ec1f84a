//! Heartbeat-driven presence engine.
//!
//! Four pieces, in dependency order: [`policy`] decides the next polling
//! interval, [`processor`] handles each inbound heartbeat, [`monitor`]
//! sweeps for stale sessions on a schedule, and [`aggregator`] computes
//! derived statuses for broadcasts and read queries.

pub mod aggregator;
pub mod monitor;
pub mod policy;
pub mod processor;

pub use aggregator::{derive_status, ComputerStatusDetail, RoomSummary, StatusAggregator};
pub use monitor::OfflineMonitor;
pub use policy::IntervalPolicy;
pub use processor::{HeartbeatOutcome, HeartbeatRequest, HeartbeatService};
