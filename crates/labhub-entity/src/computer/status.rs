//! Operational status enumeration for lab computers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Administrative operational status of a computer.
///
/// Distinct from the live online flag: a machine can be `InUse` yet
/// currently offline, or `Maintenance` while still sending heartbeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "computer_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComputerStatus {
    /// Ready for assignment.
    Available,
    /// Assigned to a user or booking.
    InUse,
    /// Under maintenance; polling is escalated.
    Maintenance,
    /// Retired from service.
    Decommissioned,
}

impl ComputerStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InUse => "in_use",
            Self::Maintenance => "maintenance",
            Self::Decommissioned => "decommissioned",
        }
    }
}

impl fmt::Display for ComputerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComputerStatus {
    type Err = labhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "in_use" => Ok(Self::InUse),
            "maintenance" => Ok(Self::Maintenance),
            "decommissioned" => Ok(Self::Decommissioned),
            _ => Err(labhub_core::AppError::validation(format!(
                "Invalid computer status: '{s}'. Expected one of: available, in_use, maintenance, decommissioned"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            "maintenance".parse::<ComputerStatus>().unwrap(),
            ComputerStatus::Maintenance
        );
        assert!("broken".parse::<ComputerStatus>().is_err());
    }
}
