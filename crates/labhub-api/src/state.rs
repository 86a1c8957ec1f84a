//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use labhub_core::config::AppConfig;
use labhub_realtime::connection::KeepaliveMonitor;
use labhub_realtime::ConnectionManager;
use labhub_service::heartbeat::{HeartbeatService, StatusAggregator};
use labhub_service::registration::RegistrationService;

use crate::auth::JwtVerifier;

/// Application state containing all shared dependencies.
///
/// Passed to every axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool, used directly by the health check.
    pub db_pool: PgPool,
    /// Heartbeat processor and session termination.
    pub heartbeats: Arc<HeartbeatService>,
    /// Derived status read side.
    pub aggregator: Arc<StatusAggregator>,
    /// Computer registration flow.
    pub registration: Arc<RegistrationService>,
    /// Live WebSocket connections.
    pub connections: Arc<ConnectionManager>,
    /// Per-connection keepalive loop factory.
    pub keepalive: KeepaliveMonitor,
    /// Bearer token verifier.
    pub jwt: Arc<JwtVerifier>,
}
