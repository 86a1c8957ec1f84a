//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted notification record.
///
/// The realtime sink writes one row per offline alert per staff user, so
/// alerts survive for users who were not connected when the event fired.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient.
    pub user_id: Uuid,
    /// Category string (e.g. "presence").
    pub category: String,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Structured event payload.
    pub payload: Option<serde_json::Value>,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to store a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    /// The recipient.
    pub user_id: Uuid,
    /// Category string.
    pub category: String,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Structured event payload.
    pub payload: Option<serde_json::Value>,
}
