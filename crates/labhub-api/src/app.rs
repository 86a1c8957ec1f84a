//! Server bootstrap: wires repositories, services, realtime, and the
//! worker into the axum application.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use labhub_core::clock::SystemClock;
use labhub_core::config::AppConfig;
use labhub_core::error::AppError;
use labhub_database::repositories::{
    ComputerRepository, HeartbeatRepository, NotificationRepository, RoomRepository,
    UserRepository,
};
use labhub_database::repositories::traits::{
    ComputerStore, HeartbeatStore, NotificationStore, RoomStore, UserStore,
};
use labhub_realtime::connection::KeepaliveMonitor;
use labhub_realtime::{ConnectionManager, RealtimeSink};
use labhub_service::heartbeat::{
    HeartbeatService, IntervalPolicy, OfflineMonitor, StatusAggregator,
};
use labhub_service::netid::ArpIdentityResolver;
use labhub_service::registration::RegistrationService;
use labhub_worker::SweepScheduler;

use crate::auth::JwtVerifier;
use crate::router::build_router;
use crate::state::AppState;

/// Runs the LabHub server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    info!("Starting LabHub server");

    // Repositories.
    let computers: Arc<dyn ComputerStore> = Arc::new(ComputerRepository::new(db_pool.clone()));
    let heartbeat_repo: Arc<dyn HeartbeatStore> =
        Arc::new(HeartbeatRepository::new(db_pool.clone()));
    let rooms: Arc<dyn RoomStore> = Arc::new(RoomRepository::new(db_pool.clone()));
    let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(db_pool.clone()));
    let notifications: Arc<dyn NotificationStore> =
        Arc::new(NotificationRepository::new(db_pool.clone()));

    // Realtime engine and the event sink the presence core publishes into.
    let connections = Arc::new(ConnectionManager::new(config.realtime.clone()));
    let sink = Arc::new(RealtimeSink::new(
        connections.clone(),
        users.clone(),
        notifications.clone(),
        config.realtime.persist_alerts,
    ));

    // Presence engine.
    let clock = Arc::new(SystemClock);
    let policy = IntervalPolicy::new(
        heartbeat_repo.clone(),
        clock.clone(),
        config.heartbeat.clone(),
    );
    let aggregator = StatusAggregator::new(
        computers.clone(),
        heartbeat_repo.clone(),
        rooms.clone(),
        clock.clone(),
        config.heartbeat.clone(),
    );
    let heartbeats = Arc::new(HeartbeatService::new(
        computers.clone(),
        heartbeat_repo.clone(),
        sink.clone(),
        clock.clone(),
        policy,
        aggregator.clone(),
    ));
    let monitor = Arc::new(OfflineMonitor::new(
        computers.clone(),
        heartbeat_repo.clone(),
        sink,
        clock,
        config.heartbeat.clone(),
    ));
    let registration = Arc::new(RegistrationService::new(
        computers,
        rooms,
        Arc::new(ArpIdentityResolver),
    ));

    // Scheduled offline sweep, stopped again once the server exits.
    let mut scheduler = SweepScheduler::new(monitor, config.worker.clone()).await?;
    scheduler.start().await?;

    let state = AppState {
        config: Arc::new(config.clone()),
        db_pool,
        heartbeats,
        aggregator: Arc::new(aggregator),
        registration,
        connections,
        keepalive: KeepaliveMonitor::new(&config.realtime),
        jwt: Arc::new(JwtVerifier::new(&config.auth)),
    };

    let app = build_router(state);
    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(addr = %addr, "LabHub server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Server stopped, shutting down sweep scheduler");
    scheduler.shutdown().await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
    }
}
