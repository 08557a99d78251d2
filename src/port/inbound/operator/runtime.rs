//! Runtime control projection types for operator-facing adapters.
//!
//! Defines request and response types for starting the bot.

use async_trait::async_trait;

use super::source::ConfigSource;
use crate::error::Result;

/// Launch request built from `run` flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub source: ConfigSource,

    /// Use the testing interval instead of the summary interval.
    pub test_mode: bool,

    /// Force debug logging.
    pub debug: bool,

    /// Emit JSON logs.
    pub json_logs: bool,

    /// User subscribed as admin before the bot starts.
    pub admin_id: Option<i64>,
}

/// Startup information snapshot for display.
#[derive(Debug, Clone)]
pub struct RunStartupSnapshot {
    pub channel: String,
    pub interval_minutes: u64,
    pub test_mode: bool,
    pub database: String,
    pub model: String,
    pub admin_id: Option<i64>,
}

/// Runtime control use-cases for operator-facing adapters.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait RuntimeOperator: Send + Sync {
    /// Resolve configuration and describe what `execute_run` would start.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment file is missing or the
    /// configuration is invalid.
    fn prepare_run(&self, request: &RunRequest) -> Result<RunStartupSnapshot>;

    /// Run the bot until it is interrupted.
    ///
    /// # Errors
    ///
    /// Returns an error if startup fails.
    async fn execute_run(&self, request: RunRequest) -> Result<()>;
}
