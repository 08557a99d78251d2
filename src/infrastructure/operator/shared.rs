//! Shared helper routines for operator implementations.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::operator::source::ConfigSource;

/// Load the environment file into the process when it exists.
///
/// Variables already set in the process keep their value.
pub(super) fn load_env_file(path: &str) -> Result<bool> {
    if !Path::new(path).exists() {
        return Ok(false);
    }
    dotenvy::from_path(path).map_err(ConfigError::EnvFile)?;
    Ok(true)
}

/// Like [`load_env_file`], but a missing file is an error.
pub(super) fn require_env_file(path: &str) -> Result<()> {
    if load_env_file(path)? {
        Ok(())
    } else {
        Err(ConfigError::MissingEnvFile {
            path: PathBuf::from(path),
        }
        .into())
    }
}

/// Tuning file (when present) overlaid with the process environment.
pub(super) fn load_config(source: &ConfigSource) -> Result<Config> {
    let mut config = Config::load_or_default(&source.config_file)?;
    config.apply_env()?;
    Ok(config)
}
