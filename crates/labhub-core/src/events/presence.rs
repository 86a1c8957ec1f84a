//! Presence-related domain events.
//!
//! Each event kind carries a statically-known target audience, so the
//! core never routes by role strings or transport-specific handles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who an event should be delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    /// Lab staff roles (admin + staff).
    LabStaff,
    /// A single user.
    User(Uuid),
    /// Every connected client.
    All,
}

/// Events produced by the heartbeat core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresenceEvent {
    /// Routine per-computer status change broadcast.
    StatusBroadcast {
        /// The computer whose status changed.
        computer_id: Uuid,
        /// Display name of the computer.
        computer_name: String,
        /// Room the computer is assigned to.
        room_id: Option<Uuid>,
        /// Derived display status (online/idle/warning/offline).
        status: String,
        /// The user currently at the computer.
        user_id: Option<Uuid>,
        /// When the computer was last seen.
        last_seen: Option<DateTime<Utc>>,
    },
    /// A computer was detected stale and transitioned to offline.
    OfflineAlert {
        /// The computer that went offline.
        computer_id: Uuid,
        /// Display name of the computer.
        computer_name: String,
        /// Room the computer is assigned to.
        room_id: Option<Uuid>,
        /// When the computer was last seen alive.
        last_seen: Option<DateTime<Utc>>,
        /// When the transition was detected.
        detected_at: DateTime<Utc>,
    },
}

impl PresenceEvent {
    /// The delivery audience for this event kind.
    pub fn audience(&self) -> Audience {
        match self {
            Self::StatusBroadcast { .. } => Audience::LabStaff,
            Self::OfflineAlert { .. } => Audience::LabStaff,
        }
    }

    /// The computer this event concerns.
    pub fn computer_id(&self) -> Uuid {
        match self {
            Self::StatusBroadcast { computer_id, .. } => *computer_id,
            Self::OfflineAlert { computer_id, .. } => *computer_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_is_static_per_kind() {
        let event = PresenceEvent::OfflineAlert {
            computer_id: Uuid::new_v4(),
            computer_name: "PC-01".to_string(),
            room_id: None,
            last_seen: None,
            detected_at: Utc::now(),
        };
        assert_eq!(event.audience(), Audience::LabStaff);
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let event = PresenceEvent::StatusBroadcast {
            computer_id: Uuid::new_v4(),
            computer_name: "PC-01".to_string(),
            room_id: None,
            status: "online".to_string(),
            user_id: None,
            last_seen: None,
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "status_broadcast");
    }
}
