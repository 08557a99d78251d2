//! Runtime operator implementation.

use async_trait::async_trait;
use tracing::info;

use crate::domain::UserId;
use crate::error::Result;
use crate::infrastructure::bootstrap::{self, RunOptions};
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::operator::runtime::{RunRequest, RunStartupSnapshot, RuntimeOperator};

use super::{entry::Operator, shared};

impl Operator {
    /// Configuration for `run`: the env file must exist, flags win.
    fn load_run_config(&self, request: &RunRequest) -> Result<Config> {
        shared::require_env_file(&request.source.env_file)?;
        let mut config = shared::load_config(&request.source)?;
        apply_run_flags(&mut config, request);
        Ok(config)
    }
}

/// Apply `run` flags on top of the loaded configuration.
fn apply_run_flags(config: &mut Config, request: &RunRequest) {
    if request.debug {
        config.logging.enable_debug();
    }
    if request.json_logs {
        config.logging.enable_json();
    }
}

fn run_options(request: &RunRequest) -> RunOptions {
    RunOptions {
        test_mode: request.test_mode,
        admin_id: request.admin_id.map(UserId::new),
    }
}

#[async_trait]
impl RuntimeOperator for Operator {
    fn prepare_run(&self, request: &RunRequest) -> Result<RunStartupSnapshot> {
        let config = self.load_run_config(request)?;

        Ok(RunStartupSnapshot {
            channel: config.target_channel.clone(),
            interval_minutes: config.interval(request.test_mode).as_secs() / 60,
            test_mode: request.test_mode,
            database: config.database.clone(),
            model: config.llm.model.clone(),
            admin_id: request.admin_id,
        })
    }

    async fn execute_run(&self, request: RunRequest) -> Result<()> {
        let config = self.load_run_config(&request)?;
        config.init_logging();

        info!(
            channel = %config.target_channel,
            test_mode = request.test_mode,
            "marketpulse starting"
        );

        bootstrap::run(config, run_options(&request)).await
    }
}
