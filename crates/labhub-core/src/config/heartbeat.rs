//! Heartbeat and presence engine configuration.

use serde::{Deserialize, Serialize};

/// Presence engine tuning knobs.
///
/// The three polling intervals are fixed policy values and are not
/// configurable; only thresholds and windows are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatConfig {
    /// Seconds without a heartbeat before a session is considered stale.
    #[serde(default = "default_offline_threshold")]
    pub offline_threshold_seconds: i64,
    /// Window (minutes) in which repeated offline markers escalate polling.
    #[serde(default = "default_issue_window")]
    pub issue_window_minutes: i64,
    /// Window (hours) in which repeated offline markers derive WARNING.
    #[serde(default = "default_warning_window")]
    pub warning_window_hours: i64,
    /// First hour of the working day (inclusive, local time).
    #[serde(default = "default_day_start")]
    pub working_hours_start: u32,
    /// First hour after the working day (exclusive, local time).
    #[serde(default = "default_day_end")]
    pub working_hours_end: u32,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            offline_threshold_seconds: default_offline_threshold(),
            issue_window_minutes: default_issue_window(),
            warning_window_hours: default_warning_window(),
            working_hours_start: default_day_start(),
            working_hours_end: default_day_end(),
        }
    }
}

fn default_offline_threshold() -> i64 {
    120
}

fn default_issue_window() -> i64 {
    60
}

fn default_warning_window() -> i64 {
    24
}

fn default_day_start() -> u32 {
    7
}

fn default_day_end() -> u32 {
    18
}
