//! Computer repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use labhub_core::error::{AppError, ErrorKind};
use labhub_core::result::AppResult;
use labhub_entity::computer::Computer;

use super::traits::ComputerStore;

/// Repository for computer registry operations.
#[derive(Debug, Clone)]
pub struct ComputerRepository {
    pool: PgPool,
}

impl ComputerRepository {
    /// Create a new computer repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComputerStore for ComputerRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Computer>> {
        sqlx::query_as::<_, Computer>("SELECT * FROM computers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find computer", e))
    }

    async fn find_by_mac(&self, mac_address: &str) -> AppResult<Option<Computer>> {
        sqlx::query_as::<_, Computer>("SELECT * FROM computers WHERE mac_address = $1")
            .bind(mac_address)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find computer by MAC", e)
            })
    }

    async fn list(&self, room_id: Option<Uuid>) -> AppResult<Vec<Computer>> {
        match room_id {
            Some(room) => {
                sqlx::query_as::<_, Computer>(
                    "SELECT * FROM computers WHERE room_id = $1 ORDER BY name",
                )
                .bind(room)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Computer>("SELECT * FROM computers ORDER BY name")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list computers", e))
    }

    async fn set_online(
        &self,
        id: Uuid,
        user_id: Option<Uuid>,
        seen_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE computers SET is_online = TRUE, last_seen = $2, \
             current_user_id = COALESCE($3, current_user_id), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(seen_at)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark computer online", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Computer {id} not found")));
        }
        Ok(())
    }

    async fn set_offline(&self, id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE computers SET is_online = FALSE, current_user_id = NULL, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark computer offline", e)
        })?;
        Ok(())
    }

    async fn create(
        &self,
        name: &str,
        mac_address: Option<&str>,
        room_id: Option<Uuid>,
    ) -> AppResult<Computer> {
        sqlx::query_as::<_, Computer>(
            "INSERT INTO computers (name, mac_address, room_id) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name)
        .bind(mac_address)
        .bind(room_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create computer", e))
    }
}
