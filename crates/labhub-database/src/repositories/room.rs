//! Room repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use labhub_core::error::{AppError, ErrorKind};
use labhub_core::result::AppResult;
use labhub_entity::room::Room;

use super::traits::RoomStore;

/// Read-only repository for rooms.
#[derive(Debug, Clone)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    /// Create a new room repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomStore for RoomRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find room", e))
    }

    async fn list(&self) -> AppResult<Vec<Room>> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list rooms", e))
    }
}
