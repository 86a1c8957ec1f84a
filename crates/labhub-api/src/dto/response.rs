//! Response DTOs.

use serde::Serialize;
use uuid::Uuid;

use labhub_entity::computer::{Computer, ComputerStatus};
use labhub_entity::heartbeat::HeartbeatSession;
use labhub_service::heartbeat::HeartbeatOutcome;

/// Reduced computer view returned with a heartbeat.
#[derive(Debug, Clone, Serialize)]
pub struct ComputerBrief {
    /// The computer.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Administrative status.
    pub status: ComputerStatus,
}

impl From<&Computer> for ComputerBrief {
    fn from(computer: &Computer) -> Self {
        Self {
            id: computer.id,
            name: computer.name.clone(),
            status: computer.status,
        }
    }
}

/// POST /api/heartbeat response.
#[derive(Debug, Clone, Serialize)]
pub struct HeartbeatResponse {
    /// Seconds the client should wait before the next heartbeat.
    pub next_interval_seconds: u32,
    /// The upserted session row.
    pub session: HeartbeatSession,
    /// The resolved computer.
    pub computer: ComputerBrief,
}

impl From<HeartbeatOutcome> for HeartbeatResponse {
    fn from(outcome: HeartbeatOutcome) -> Self {
        Self {
            next_interval_seconds: outcome.next_interval.as_seconds(),
            computer: ComputerBrief::from(&outcome.computer),
            session: outcome.session,
        }
    }
}

/// GET /api/health response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Database reachability.
    pub database: &'static str,
}
