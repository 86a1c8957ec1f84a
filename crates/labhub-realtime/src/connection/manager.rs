//! Connection manager: lifecycle, inbound handling, audience fan-out.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use labhub_core::config::realtime::RealtimeConfig;
use labhub_core::events::Audience;
use labhub_entity::user::UserRole;

use crate::message::{InboundMessage, OutboundMessage};

use super::handle::{ConnectionHandle, ConnectionId};
use super::pool::ConnectionPool;

/// Manages all active WebSocket connections.
#[derive(Debug)]
pub struct ConnectionManager {
    pool: Arc<ConnectionPool>,
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            pool: Arc::new(ConnectionPool::new()),
            config,
        }
    }

    /// Registers a new authenticated connection.
    ///
    /// Returns the connection handle and the receiver for its outbound
    /// queue; the socket task drains the receiver. A user already at the
    /// connection limit has their oldest connection evicted.
    pub fn register(
        &self,
        user_id: Uuid,
        role: UserRole,
        username: String,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, role, username, tx));

        let existing = self.pool.user_connections(&user_id);
        if existing.len() >= self.config.max_connections_per_user {
            warn!(
                user_id = %user_id,
                count = existing.len(),
                max = self.config.max_connections_per_user,
                "User at max connections, evicting oldest"
            );
            if let Some(oldest) = existing.first() {
                oldest.mark_dead();
                self.pool.remove(&oldest.id);
            }
        }

        self.pool.add(handle.clone());
        info!(
            conn_id = %handle.id,
            user_id = %user_id,
            role = %handle.role,
            "WebSocket connection registered"
        );
        (handle, rx)
    }

    /// Unregisters a connection.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.mark_dead();
            info!(
                conn_id = %conn_id,
                user_id = %handle.user_id,
                "WebSocket connection unregistered"
            );
        }
    }

    /// Processes an inbound text frame from a client.
    pub async fn handle_inbound(&self, conn_id: &ConnectionId, raw_message: &str) {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Message from unknown connection");
            return;
        };

        match serde_json::from_str::<InboundMessage>(raw_message) {
            Ok(InboundMessage::Pong { .. }) => {
                handle.record_pong().await;
            }
            Err(e) => {
                debug!(conn_id = %conn_id, error = %e, "Unparsable client message");
                handle.send(OutboundMessage::Error {
                    code: "INVALID_MESSAGE".to_string(),
                    message: format!("Failed to parse message: {e}"),
                });
            }
        }
    }

    /// Delivers a message to every connection in the audience.
    ///
    /// Returns how many connections accepted the message.
    pub fn send_to_audience(&self, audience: Audience, message: &OutboundMessage) -> usize {
        let connections = match audience {
            Audience::LabStaff => self.pool.staff_connections(),
            Audience::User(user_id) => self.pool.user_connections(&user_id),
            Audience::All => self.pool.all_connections(),
        };
        let mut sent = 0;
        for conn in &connections {
            if conn.send(message.clone()) {
                sent += 1;
            }
        }
        sent
    }

    /// Total connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }

    /// The underlying pool, for the keepalive monitor.
    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    /// Realtime configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }
}
