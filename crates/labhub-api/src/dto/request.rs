//! Request body and query DTOs.
//!
//! Required fields arrive as `Option` so a missing field becomes a 400
//! naming that field instead of a generic deserialization error.

use serde::Deserialize;
use uuid::Uuid;

use labhub_core::error::AppError;
use labhub_entity::heartbeat::SessionStatus;
use labhub_service::heartbeat::HeartbeatRequest;

/// POST /api/heartbeat body.
#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatBody {
    /// The computer reporting in.
    pub computer_id: Option<Uuid>,
    /// Caller-supplied session identifier.
    pub session_key: Option<String>,
    /// Reported status string (online/idle/offline).
    pub status: Option<String>,
    /// Whether the reporting page is hidden.
    #[serde(default)]
    pub is_page_hidden: bool,
    /// Hardware identity fallback for the computer lookup.
    pub mac_address: Option<String>,
}

impl HeartbeatBody {
    /// Validate the body into a service-level request.
    pub fn into_request(self, user_id: Option<Uuid>) -> Result<HeartbeatRequest, AppError> {
        let computer_id = self
            .computer_id
            .ok_or_else(|| AppError::missing_field("computer_id"))?;
        let session_key = self
            .session_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("session_key"))?;
        let status = self
            .status
            .ok_or_else(|| AppError::missing_field("status"))?
            .parse::<SessionStatus>()?;

        Ok(HeartbeatRequest {
            computer_id,
            session_key,
            status,
            is_page_hidden: self.is_page_hidden,
            user_id,
            mac_address: self.mac_address,
        })
    }
}

/// POST /api/heartbeat/end body.
#[derive(Debug, Clone, Deserialize)]
pub struct EndSessionBody {
    /// The session to terminate.
    pub session_key: Option<String>,
}

/// POST /api/computers/register body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterComputerBody {
    /// Display name for the new computer.
    pub name: Option<String>,
    /// Room assignment.
    pub room_id: Option<Uuid>,
    /// Explicit MAC address; when absent the server tries ARP resolution.
    pub mac_address: Option<String>,
}

/// GET /api/status/rooms query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomStatusQuery {
    /// Restrict to a single room.
    pub room_id: Option<Uuid>,
    /// Include per-computer detail in each summary.
    #[serde(default)]
    pub include_computers: bool,
}

/// GET /ws query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    use labhub_core::error::ErrorKind;

    fn body(json: &str) -> HeartbeatBody {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_missing_session_key_names_the_field() {
        let err = body(&format!(
            r#"{{"computer_id":"{}","status":"online"}}"#,
            Uuid::new_v4()
        ))
        .into_request(None)
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("'session_key'"));
    }

    #[test]
    fn test_missing_computer_id_names_the_field() {
        let err = body(r#"{"session_key":"abc","status":"online"}"#)
            .into_request(None)
            .unwrap_err();
        assert!(err.message.contains("'computer_id'"));
    }

    #[test]
    fn test_invalid_status_is_rejected() {
        let err = body(&format!(
            r#"{{"computer_id":"{}","session_key":"abc","status":"away"}}"#,
            Uuid::new_v4()
        ))
        .into_request(None)
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_page_hidden_defaults_to_false() {
        let request = body(&format!(
            r#"{{"computer_id":"{}","session_key":"abc","status":"idle"}}"#,
            Uuid::new_v4()
        ))
        .into_request(Some(Uuid::new_v4()))
        .unwrap();
        assert!(!request.is_page_hidden);
        assert_eq!(request.status, SessionStatus::Idle);
    }
}
