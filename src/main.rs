//! LabHub server entry point.
//!
//! Loads configuration, initializes logging, connects to PostgreSQL,
//! runs migrations, and hands off to the API layer.

use tracing_subscriber::{fmt, EnvFilter};

use labhub_core::config::AppConfig;
use labhub_core::error::AppError;
use labhub_database::connection::DatabasePool;

#[tokio::main]
async fn main() {
    let env = std::env::var("LABHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting LabHub");

    tracing::info!("Connecting to database");
    let db = DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations");
    labhub_database::migration::run_migrations(db.pool()).await?;

    labhub_api::run_server(config, db.into_pool()).await
}
