//! Storage boundary traits the presence core depends on.
//!
//! The heartbeat processor, offline monitor, and status aggregator talk
//! to storage exclusively through these traits. Production wiring uses
//! the sqlx implementations in this crate; tests substitute in-memory
//! fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use labhub_core::result::AppResult;
use labhub_entity::computer::Computer;
use labhub_entity::heartbeat::{HeartbeatSession, UpsertHeartbeat};
use labhub_entity::notification::CreateNotification;
use labhub_entity::room::Room;
use labhub_entity::user::User;

/// Read/write access to the computer registry.
#[async_trait]
pub trait ComputerStore: Send + Sync + std::fmt::Debug {
    /// Find a computer by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Computer>>;

    /// Find a computer by its hardware network identity.
    async fn find_by_mac(&self, mac_address: &str) -> AppResult<Option<Computer>>;

    /// List computers, optionally filtered to one room.
    async fn list(&self, room_id: Option<Uuid>) -> AppResult<Vec<Computer>>;

    /// Mark a computer online: set the flag, last-seen, and current user.
    async fn set_online(
        &self,
        id: Uuid,
        user_id: Option<Uuid>,
        seen_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Mark a computer offline and clear its current user.
    async fn set_offline(&self, id: Uuid) -> AppResult<()>;

    /// Register a new computer.
    async fn create(
        &self,
        name: &str,
        mac_address: Option<&str>,
        room_id: Option<Uuid>,
    ) -> AppResult<Computer>;
}

/// Read/write access to the heartbeat session log.
#[async_trait]
pub trait HeartbeatStore: Send + Sync + std::fmt::Debug {
    /// Atomically create-or-update the session row for a session key.
    async fn upsert(&self, data: &UpsertHeartbeat) -> AppResult<HeartbeatSession>;

    /// Find an active session by its session key.
    async fn find_active_by_key(&self, session_key: &str) -> AppResult<Option<HeartbeatSession>>;

    /// The most recently updated session for a computer.
    async fn latest_for_computer(&self, computer_id: Uuid) -> AppResult<Option<HeartbeatSession>>;

    /// Count offline-marker rows for a computer newer than the cutoff.
    async fn count_offline_since(
        &self,
        computer_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<i64>;

    /// Active sessions whose last heartbeat is older than the cutoff.
    async fn find_stale_active(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<HeartbeatSession>>;

    /// Append a synthetic offline-marker row for a computer.
    async fn insert_offline_marker(
        &self,
        computer_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<HeartbeatSession>;

    /// End a session: inactive, status offline, session end set.
    async fn end_session(&self, session_key: &str, at: DateTime<Utc>) -> AppResult<()>;
}

/// Read access to rooms.
#[async_trait]
pub trait RoomStore: Send + Sync + std::fmt::Debug {
    /// Find a room by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>>;

    /// List all rooms.
    async fn list(&self) -> AppResult<Vec<Room>>;
}

/// Read access to users.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Find a user by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// List all lab staff users (admin + staff roles).
    async fn list_lab_staff(&self) -> AppResult<Vec<User>>;
}

/// Write access to stored notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug {
    /// Persist one notification row.
    async fn create(&self, data: &CreateNotification) -> AppResult<()>;
}
