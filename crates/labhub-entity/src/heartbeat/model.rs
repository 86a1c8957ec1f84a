//! Heartbeat session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::SessionStatus;

/// One logical presence session of a computer (and optionally a user).
///
/// Rows are created lazily on the first heartbeat for a session key,
/// upserted on every subsequent heartbeat, and never hard-deleted: ended
/// and marker rows remain as the historical record that feeds the
/// repeated-instability heuristic. At most one row exists per
/// `session_key` (database unique constraint, upsert key).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HeartbeatSession {
    /// Surrogate row identifier.
    pub id: Uuid,
    /// Caller-supplied session identifier; the idempotency/upsert key.
    pub session_key: String,
    /// The computer this session belongs to.
    pub computer_id: Uuid,
    /// The user at the computer, when known.
    pub user_id: Option<Uuid>,
    /// Raw session status.
    pub status: SessionStatus,
    /// When the last heartbeat for this session arrived.
    pub timestamp: DateTime<Utc>,
    /// The polling interval (seconds) handed out on the last heartbeat.
    pub interval_used: i32,
    /// When the session started.
    pub session_start: DateTime<Utc>,
    /// When the session ended, if it has.
    pub session_end: Option<DateTime<Utc>>,
    /// Whether the session is still live.
    pub is_active: bool,
}

/// Data for the atomic heartbeat upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertHeartbeat {
    /// The upsert key.
    pub session_key: String,
    /// The computer this heartbeat is for.
    pub computer_id: Uuid,
    /// The acting user, when supplied.
    pub user_id: Option<Uuid>,
    /// Reported session status.
    pub status: SessionStatus,
    /// The interval handed out with this heartbeat (seconds).
    pub interval_used: i32,
    /// The heartbeat arrival time.
    pub timestamp: DateTime<Utc>,
}
