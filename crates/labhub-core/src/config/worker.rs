//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled task worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression for the offline sweep tick.
    #[serde(default = "default_sweep_schedule")]
    pub offline_sweep_schedule: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            offline_sweep_schedule: default_sweep_schedule(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sweep_schedule() -> String {
    // Every minute, at second 0.
    "0 * * * * *".to_string()
}
