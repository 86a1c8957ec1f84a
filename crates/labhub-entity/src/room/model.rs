//! Room entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A lab room. Consumed read-only by the status aggregator for grouping;
/// bookings and room administration live outside the presence core.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    /// Unique room identifier.
    pub id: Uuid,
    /// Display name (e.g. "Lab 2, Building C").
    pub name: String,
    /// Seat capacity.
    pub capacity: i32,
    /// Administrative status string (open/closed/renovation).
    pub status: String,
    /// When the room was created.
    pub created_at: DateTime<Utc>,
}
