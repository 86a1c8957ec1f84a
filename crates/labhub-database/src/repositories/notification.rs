//! Notification repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use labhub_core::error::{AppError, ErrorKind};
use labhub_core::result::AppResult;
use labhub_entity::notification::CreateNotification;

use super::traits::NotificationStore;

/// Repository for persisted notifications.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create(&self, data: &CreateNotification) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO notifications (user_id, category, title, message, payload) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(data.user_id)
        .bind(&data.category)
        .bind(&data.title)
        .bind(&data.message)
        .bind(&data.payload)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
        })?;
        Ok(())
    }
}
