//! Health monitor configuration.

use serde::Deserialize;

use crate::domain::Thresholds;

/// Settings for `check health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    /// systemd unit name of the bot.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// journalctl `--since` expression for the error-line count.
    #[serde(default = "default_error_window")]
    pub error_window: String,

    #[serde(default = "Thresholds::disk")]
    pub disk: Thresholds,

    #[serde(default = "Thresholds::memory")]
    pub memory: Thresholds,

    #[serde(default = "Thresholds::error_lines")]
    pub error_lines: Thresholds,
}

fn default_service_name() -> String {
    "marketpulse".to_string()
}

fn default_error_window() -> String {
    "1 hour ago".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            error_window: default_error_window(),
            disk: Thresholds::disk(),
            memory: Thresholds::memory(),
            error_lines: Thresholds::error_lines(),
        }
    }
}
