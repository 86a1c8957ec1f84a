//! Adaptive polling interval tiers.

use serde::{Deserialize, Serialize};

/// The three fixed polling intervals the policy engine can hand out.
///
/// Clients schedule their next heartbeat after exactly this many seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollInterval {
    /// 10 s, for unstable or maintenance machines.
    High,
    /// 30 s, the default for active sessions.
    Normal,
    /// 120 s, for hidden pages, after-hours, and unattended machines.
    Low,
}

impl PollInterval {
    /// The interval length in seconds.
    pub fn as_seconds(&self) -> u32 {
        match self {
            Self::High => 10,
            Self::Normal => 30,
            Self::Low => 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_seconds() {
        assert_eq!(PollInterval::High.as_seconds(), 10);
        assert_eq!(PollInterval::Normal.as_seconds(), 30);
        assert_eq!(PollInterval::Low.as_seconds(), 120);
    }
}
