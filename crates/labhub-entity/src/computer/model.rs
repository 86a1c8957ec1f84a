//! Computer entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::ComputerStatus;

/// A registered lab computer.
///
/// Two write paths mutate this row: the heartbeat processor owns
/// `is_online`, `last_seen`, and `current_user_id`; administrative CRUD
/// owns `name`, `room_id`, and `status`. The field sets are disjoint, so
/// no transaction spans both paths.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Computer {
    /// Unique computer identifier.
    pub id: Uuid,
    /// Display name (e.g. "LAB1-PC-07").
    pub name: String,
    /// Hardware network identity, when known.
    pub mac_address: Option<String>,
    /// Room the computer is assigned to.
    pub room_id: Option<Uuid>,
    /// Live online flag, re-derived by the offline monitor.
    pub is_online: bool,
    /// When a heartbeat was last received.
    pub last_seen: Option<DateTime<Utc>>,
    /// The user currently at the computer.
    pub current_user_id: Option<Uuid>,
    /// Administrative operational status.
    pub status: ComputerStatus,
    /// When the computer was registered.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Computer {
    /// Whether the interval policy should treat this computer as under
    /// maintenance.
    pub fn in_maintenance(&self) -> bool {
        self.status == ComputerStatus::Maintenance
    }
}

/// Data required to register a new computer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterComputer {
    /// Display name.
    pub name: String,
    /// Hardware network identity, when resolvable at registration time.
    pub mac_address: Option<String>,
    /// Room assignment.
    pub room_id: Option<Uuid>,
}
