//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use labhub_entity::user::UserRole;

use crate::message::OutboundMessage;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// A handle to a single WebSocket connection.
///
/// Holds the sender side of the connection's outbound queue plus cached
/// metadata about the connected user. The socket task owns the receiver.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// User who owns this connection.
    pub user_id: Uuid,
    /// User's role, cached for audience routing.
    pub role: UserRole,
    /// Username, cached for logging.
    pub username: String,
    /// Sender for outbound messages.
    pub sender: mpsc::Sender<OutboundMessage>,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
    /// Last pong received from the client.
    pub last_pong: tokio::sync::RwLock<DateTime<Utc>>,
    /// Whether the connection is still alive.
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new connection handle.
    pub fn new(
        user_id: Uuid,
        role: UserRole,
        username: String,
        sender: mpsc::Sender<OutboundMessage>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            role,
            username,
            sender,
            connected_at: now,
            last_pong: tokio::sync::RwLock::new(now),
            alive: AtomicBool::new(true),
        }
    }

    /// Queue an outbound message. Returns false when it could not be
    /// delivered; a closed receiver also marks the connection dead.
    pub fn send(&self, msg: OutboundMessage) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(msg) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Whether the connection is still alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the connection as dead.
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Record a pong response.
    pub async fn record_pong(&self) {
        let mut lp = self.last_pong.write().await;
        *lp = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(buffer: usize) -> (ConnectionHandle, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(buffer);
        (
            ConnectionHandle::new(Uuid::new_v4(), UserRole::Staff, "staff1".to_string(), tx),
            rx,
        )
    }

    #[tokio::test]
    async fn test_send_delivers_to_receiver() {
        let (handle, mut rx) = handle(4);
        assert!(handle.send(OutboundMessage::Ping { timestamp: 1 }));
        assert!(matches!(
            rx.recv().await,
            Some(OutboundMessage::Ping { timestamp: 1 })
        ));
    }

    #[tokio::test]
    async fn test_closed_receiver_marks_dead() {
        let (handle, rx) = handle(4);
        drop(rx);
        assert!(!handle.send(OutboundMessage::Ping { timestamp: 1 }));
        assert!(!handle.is_alive());
    }

    #[tokio::test]
    async fn test_full_buffer_drops_without_killing_connection() {
        let (handle, _rx) = handle(1);
        assert!(handle.send(OutboundMessage::Ping { timestamp: 1 }));
        assert!(!handle.send(OutboundMessage::Ping { timestamp: 2 }));
        assert!(handle.is_alive());
    }
}
