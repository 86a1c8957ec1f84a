//! Session status and derived display status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw status stored on a heartbeat session row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// The session is actively heartbeating.
    Online,
    /// The client reported itself idle.
    Idle,
    /// The session ended or went stale. Offline-marker rows always carry
    /// this status.
    Offline,
}

impl SessionStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Idle => "idle",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = labhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "idle" => Ok(Self::Idle),
            "offline" => Ok(Self::Offline),
            _ => Err(labhub_core::AppError::validation(format!(
                "Invalid session status: '{s}'. Expected one of: online, idle, offline"
            ))),
        }
    }
}

/// Computed display status for a computer.
///
/// Distinct from the raw stored online flag: derivation folds in the
/// repeated-instability heuristic and the latest session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivedStatus {
    /// Alive and heartbeating normally.
    Online,
    /// Alive but the most recent session reported idle.
    Idle,
    /// Alive but repeatedly unstable within the warning window.
    Warning,
    /// Not alive.
    Offline,
}

impl DerivedStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Idle => "idle",
            Self::Warning => "warning",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for DerivedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_from_str() {
        assert_eq!(
            "ONLINE".parse::<SessionStatus>().unwrap(),
            SessionStatus::Online
        );
        assert_eq!(
            "idle".parse::<SessionStatus>().unwrap(),
            SessionStatus::Idle
        );
        assert!("away".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn test_derived_status_serializes_lowercase() {
        let json = serde_json::to_string(&DerivedStatus::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
