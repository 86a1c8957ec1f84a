//! Embedded schema migrations, applied at startup before the server
//! accepts traffic.

use sqlx::migrate::Migrator;
use sqlx::PgPool;
use tracing::info;

use labhub_core::error::{AppError, ErrorKind};
use labhub_core::result::AppResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply any migrations the database has not seen yet.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    info!(
        available = MIGRATOR.iter().count(),
        "Applying schema migrations"
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, format!("Migration failed: {e}"), e)
    })?;

    info!("Schema is up to date");
    Ok(())
}
