//! Inbound and outbound WebSocket message type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use labhub_core::events::PresenceEvent;

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Pong response to a server ping.
    Pong {
        /// Echoed server timestamp.
        timestamp: i64,
    },
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Routine computer status change.
    StatusUpdate {
        /// The computer whose status changed.
        computer_id: Uuid,
        /// Display name.
        computer_name: String,
        /// Room the computer is assigned to.
        room_id: Option<Uuid>,
        /// Derived display status.
        status: String,
        /// The user currently at the computer.
        user_id: Option<Uuid>,
        /// When the computer was last seen.
        last_seen: Option<DateTime<Utc>>,
    },
    /// A computer was detected stale and went offline.
    OfflineAlert {
        /// The computer that went offline.
        computer_id: Uuid,
        /// Display name.
        computer_name: String,
        /// Room the computer is assigned to.
        room_id: Option<Uuid>,
        /// When the computer was last seen alive.
        last_seen: Option<DateTime<Utc>>,
        /// When the transition was detected.
        detected_at: DateTime<Utc>,
    },
    /// Server keepalive ping.
    Ping {
        /// Server timestamp.
        timestamp: i64,
    },
    /// Error message.
    Error {
        /// Error code.
        code: String,
        /// Error description.
        message: String,
    },
}

impl From<&PresenceEvent> for OutboundMessage {
    fn from(event: &PresenceEvent) -> Self {
        match event {
            PresenceEvent::StatusBroadcast {
                computer_id,
                computer_name,
                room_id,
                status,
                user_id,
                last_seen,
            } => Self::StatusUpdate {
                computer_id: *computer_id,
                computer_name: computer_name.clone(),
                room_id: *room_id,
                status: status.clone(),
                user_id: *user_id,
                last_seen: *last_seen,
            },
            PresenceEvent::OfflineAlert {
                computer_id,
                computer_name,
                room_id,
                last_seen,
                detected_at,
            } => Self::OfflineAlert {
                computer_id: *computer_id,
                computer_name: computer_name.clone(),
                room_id: *room_id,
                last_seen: *last_seen,
                detected_at: *detected_at,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_broadcast_converts_to_status_update() {
        let event = PresenceEvent::StatusBroadcast {
            computer_id: Uuid::new_v4(),
            computer_name: "PC-01".to_string(),
            room_id: None,
            status: "warning".to_string(),
            user_id: None,
            last_seen: None,
        };
        let msg = OutboundMessage::from(&event);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "status_update");
        assert_eq!(json["status"], "warning");
    }

    #[test]
    fn test_inbound_pong_parses() {
        let msg: InboundMessage =
            serde_json::from_str(r#"{"type":"pong","timestamp":1700000000}"#).unwrap();
        assert!(matches!(msg, InboundMessage::Pong { timestamp } if timestamp == 1700000000));
    }
}
