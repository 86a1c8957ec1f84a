//! Heartbeat session repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use labhub_core::error::{AppError, ErrorKind};
use labhub_core::result::AppResult;
use labhub_entity::heartbeat::{HeartbeatSession, SessionStatus, UpsertHeartbeat};

use super::traits::HeartbeatStore;

/// Repository for the heartbeat session log.
#[derive(Debug, Clone)]
pub struct HeartbeatRepository {
    pool: PgPool,
}

impl HeartbeatRepository {
    /// Create a new heartbeat repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HeartbeatStore for HeartbeatRepository {
    async fn upsert(&self, data: &UpsertHeartbeat) -> AppResult<HeartbeatSession> {
        // Single atomic statement; concurrent heartbeats for the same
        // session key resolve to last-write-wins without a read first.
        sqlx::query_as::<_, HeartbeatSession>(
            "INSERT INTO heartbeat_sessions \
             (session_key, computer_id, user_id, status, timestamp, interval_used, session_start, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $5, TRUE) \
             ON CONFLICT (session_key) DO UPDATE SET \
               status = EXCLUDED.status, \
               timestamp = EXCLUDED.timestamp, \
               interval_used = EXCLUDED.interval_used, \
               user_id = EXCLUDED.user_id, \
               is_active = TRUE \
             RETURNING *",
        )
        .bind(&data.session_key)
        .bind(data.computer_id)
        .bind(data.user_id)
        .bind(data.status)
        .bind(data.timestamp)
        .bind(data.interval_used)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert heartbeat", e))
    }

    async fn find_active_by_key(&self, session_key: &str) -> AppResult<Option<HeartbeatSession>> {
        sqlx::query_as::<_, HeartbeatSession>(
            "SELECT * FROM heartbeat_sessions WHERE session_key = $1 AND is_active = TRUE",
        )
        .bind(session_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find session by key", e)
        })
    }

    async fn latest_for_computer(&self, computer_id: Uuid) -> AppResult<Option<HeartbeatSession>> {
        sqlx::query_as::<_, HeartbeatSession>(
            "SELECT * FROM heartbeat_sessions WHERE computer_id = $1 \
             ORDER BY timestamp DESC LIMIT 1",
        )
        .bind(computer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find latest session", e))
    }

    async fn count_offline_since(
        &self,
        computer_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM heartbeat_sessions \
             WHERE computer_id = $1 AND session_key LIKE 'offline:%' AND timestamp >= $2",
        )
        .bind(computer_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count offline markers", e)
        })?;
        Ok(count)
    }

    async fn find_stale_active(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<HeartbeatSession>> {
        sqlx::query_as::<_, HeartbeatSession>(
            "SELECT * FROM heartbeat_sessions \
             WHERE is_active = TRUE AND timestamp < $1 ORDER BY timestamp ASC",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find stale sessions", e))
    }

    async fn insert_offline_marker(
        &self,
        computer_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<HeartbeatSession> {
        // Synthetic session key so the unique constraint never collides
        // with a real client session.
        let marker_key = format!("offline:{}", Uuid::new_v4());

        sqlx::query_as::<_, HeartbeatSession>(
            "INSERT INTO heartbeat_sessions \
             (session_key, computer_id, status, timestamp, interval_used, session_start, session_end, is_active) \
             VALUES ($1, $2, $3, $4, 0, $4, $4, FALSE) RETURNING *",
        )
        .bind(&marker_key)
        .bind(computer_id)
        .bind(SessionStatus::Offline)
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert offline marker", e)
        })
    }

    async fn end_session(&self, session_key: &str, at: DateTime<Utc>) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE heartbeat_sessions SET is_active = FALSE, status = 'offline', \
             session_end = $2 WHERE session_key = $1 AND is_active = TRUE",
        )
        .bind(session_key)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to end session", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Active session '{session_key}' not found"
            )));
        }
        Ok(())
    }
}
