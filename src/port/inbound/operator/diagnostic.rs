//! Diagnostic projections for operator-facing adapters.

use async_trait::async_trait;

use super::source::ConfigSource;
use crate::domain::HealthReport;
use crate::error::Result;

/// Summary output for `check config`.
#[derive(Debug, Clone)]
pub struct ConfigCheckReport {
    pub env_file_found: bool,
    pub config_file_found: bool,
    pub channel: String,
    pub summary_interval_minutes: u64,
    pub testing_interval_minutes: u64,
    pub database: String,
    pub model: String,
    pub display_utc_offset_hours: i32,
    /// Environment variables required by `run` that are not set.
    pub missing_credentials: Vec<&'static str>,
}

impl ConfigCheckReport {
    /// True when `run` has every credential it needs.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.env_file_found && self.missing_credentials.is_empty()
    }
}

/// Inputs for `check health`.
#[derive(Debug, Clone, Default)]
pub struct HealthRequest {
    pub source: ConfigSource,
    /// systemd unit override.
    pub service: Option<String>,
    /// Database path override.
    pub database: Option<String>,
}

/// Diagnostic use-cases for operator-facing adapters.
#[async_trait]
pub trait DiagnosticOperator: Send + Sync {
    /// Load and validate configuration without starting anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is malformed or invalid.
    fn check_config(&self, source: &ConfigSource) -> Result<ConfigCheckReport>;

    /// Probe the service, database and host.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded; probe
    /// failures are reported inside the report.
    async fn health_report(&self, request: &HealthRequest) -> Result<HealthReport>;
}
