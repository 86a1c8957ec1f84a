//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::UserRole;

/// A lab system user. Account lifecycle (creation, passwords, SSO) is
/// managed outside the presence core; this model is read for role-based
/// event routing and session ownership checks.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Role for event routing and authorization.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
