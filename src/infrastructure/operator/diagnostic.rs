//! Diagnostic operator implementation.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::HealthReport;
use crate::error::Result;
use crate::infrastructure::health::HealthMonitor;
use crate::port::inbound::operator::diagnostic::{
    ConfigCheckReport, DiagnosticOperator, HealthRequest,
};
use crate::port::inbound::operator::source::ConfigSource;

use super::{entry::Operator, shared};

#[async_trait]
impl DiagnosticOperator for Operator {
    fn check_config(&self, source: &ConfigSource) -> Result<ConfigCheckReport> {
        let env_file_found = shared::load_env_file(&source.env_file)?;
        let config = shared::load_config(source)?;

        Ok(ConfigCheckReport {
            env_file_found,
            config_file_found: Path::new(&source.config_file).exists(),
            channel: config.target_channel.clone(),
            summary_interval_minutes: config.summary_interval_minutes,
            testing_interval_minutes: config.testing_interval_minutes,
            database: config.database.clone(),
            model: config.llm.model.clone(),
            display_utc_offset_hours: config.display_utc_offset_hours,
            missing_credentials: config.secrets.missing(),
        })
    }

    async fn health_report(&self, request: &HealthRequest) -> Result<HealthReport> {
        shared::load_env_file(&request.source.env_file)?;
        let config = shared::load_config(&request.source)?;

        let mut health = config.health.clone();
        if let Some(service) = &request.service {
            health.service_name = service.clone();
        }
        let database = request.database.clone().unwrap_or(config.database);

        Ok(HealthMonitor::new(health, database).report().await)
    }
}
