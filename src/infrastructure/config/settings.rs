//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application
//! settings. Non-secret tuning is read from an optional TOML file; the
//! deployment values (credentials, channel, intervals, database path) come
//! from the environment, normally populated from the `.env` file.
//!
//! # Example
//!
//! ```no_run
//! use marketpulse::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::load_or_default("config.toml")?;
//!     config.apply_env()?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

use super::delivery::{minutes_to_duration, DeliveryConfig, MAX_WINDOW_MINUTES};
use super::health::HealthConfig;
use super::llm::LlmConfig;
use super::logging::LoggingConfig;
use crate::error::{ConfigError, Result};

/// Secrets and deployment values read from the environment only.
///
/// Never deserialized from the config file.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub api_id: Option<String>,
    pub api_hash: Option<String>,
    pub bot_token: Option<String>,
    pub session: Option<String>,
    pub openai_api_key: Option<String>,
    pub phone: Option<String>,
}

impl Secrets {
    /// Variables required by `run` that are not set.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("TELEGRAM_API_ID", &self.api_id),
            ("TELEGRAM_API_HASH", &self.api_hash),
            ("TELEGRAM_BOT_TOKEN", &self.bot_token),
            ("TELEGRAM_SESSION_STRING", &self.session),
            ("OPENAI_API_KEY", &self.openai_api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Validated credentials required to run the bot.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_id: i32,
    pub api_hash: String,
    pub bot_token: String,
    pub session: String,
    pub openai_api_key: String,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Generative model settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Loop and fan-out pacing.
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Health monitor settings.
    #[serde(default)]
    pub health: HealthConfig,

    /// Channel to monitor. `TARGET_CHANNEL` overrides.
    #[serde(default = "default_target_channel")]
    pub target_channel: String,

    /// Minutes between summary cycles. `SUMMARY_INTERVAL` overrides.
    #[serde(default = "default_summary_interval")]
    pub summary_interval_minutes: u64,

    /// Minutes between cycles in test mode. `TESTING_INTERVAL` overrides.
    #[serde(default = "default_testing_interval")]
    pub testing_interval_minutes: u64,

    /// Path to the SQLite subscriber database. `DATABASE_PATH` overrides.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Fixed UTC offset used for human-facing timestamps.
    #[serde(default = "default_display_offset")]
    pub display_utc_offset_hours: i32,

    #[serde(skip)]
    pub secrets: Secrets,
}

fn default_target_channel() -> String {
    "marketfeed".to_string()
}

const fn default_summary_interval() -> u64 {
    180
}

const fn default_testing_interval() -> u64 {
    5
}

fn default_database_path() -> String {
    "subscribers.db".to_string()
}

const fn default_display_offset() -> i32 {
    8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            llm: LlmConfig::default(),
            delivery: DeliveryConfig::default(),
            health: HealthConfig::default(),
            target_channel: default_target_channel(),
            summary_interval_minutes: default_summary_interval(),
            testing_interval_minutes: default_testing_interval(),
            database: default_database_path(),
            display_utc_offset_hours: default_display_offset(),
            secrets: Secrets::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or fails
    /// validation.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load the TOML file when present, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file is malformed or invalid.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Overlay values from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or the result
    /// fails validation.
    #[allow(clippy::result_large_err)]
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or the result
    /// fails validation.
    #[allow(clippy::result_large_err)]
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        self.secrets = Secrets {
            api_id: get("TELEGRAM_API_ID"),
            api_hash: get("TELEGRAM_API_HASH"),
            bot_token: get("TELEGRAM_BOT_TOKEN"),
            session: get("TELEGRAM_SESSION_STRING"),
            openai_api_key: get("OPENAI_API_KEY"),
            phone: get("TELEGRAM_PHONE"),
        };

        if let Some(channel) = get("TARGET_CHANNEL") {
            self.target_channel = channel.trim().to_string();
        }
        if let Some(raw) = get("SUMMARY_INTERVAL") {
            self.summary_interval_minutes = parse_minutes("SUMMARY_INTERVAL", &raw)?;
        }
        if let Some(raw) = get("TESTING_INTERVAL") {
            self.testing_interval_minutes = parse_minutes("TESTING_INTERVAL", &raw)?;
        }
        if let Some(path) = get("DATABASE_PATH") {
            self.database = path;
        }

        self.validate()
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.target_channel.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "target_channel",
            }
            .into());
        }
        for (field, minutes) in [
            ("summary_interval_minutes", self.summary_interval_minutes),
            ("testing_interval_minutes", self.testing_interval_minutes),
            (
                "delivery.on_demand_window_minutes",
                self.delivery.on_demand_window_minutes,
            ),
        ] {
            if !(1..=MAX_WINDOW_MINUTES).contains(&minutes) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be between 1 and {MAX_WINDOW_MINUTES} minutes"),
                }
                .into());
            }
        }
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if !(-12..=14).contains(&self.display_utc_offset_hours) {
            return Err(ConfigError::InvalidValue {
                field: "display_utc_offset_hours",
                reason: "must be between -12 and 14".to_string(),
            }
            .into());
        }
        if self.llm.max_input_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_input_chars",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature",
                reason: "must be between 0 and 2".to_string(),
            }
            .into());
        }
        for (field, thresholds) in [
            ("health.disk", &self.health.disk),
            ("health.memory", &self.health.memory),
            ("health.error_lines", &self.health.error_lines),
        ] {
            if !thresholds.is_valid() {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "warning must be >= 0 and <= error".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Resolve the credentials needed to run the bot.
    ///
    /// # Errors
    ///
    /// Returns the first missing or malformed credential.
    #[allow(clippy::result_large_err)]
    pub fn credentials(&self) -> Result<Credentials> {
        let (api_id, api_hash) = self.api_credentials()?;

        Ok(Credentials {
            api_id,
            api_hash,
            bot_token: require(&self.secrets.bot_token, "TELEGRAM_BOT_TOKEN")?,
            session: require(&self.secrets.session, "TELEGRAM_SESSION_STRING")?,
            openai_api_key: require(&self.secrets.openai_api_key, "OPENAI_API_KEY")?,
        })
    }

    /// Telegram application id and hash, needed by every MTProto client.
    ///
    /// # Errors
    ///
    /// Returns an error if either is missing or the id is not numeric.
    #[allow(clippy::result_large_err)]
    pub fn api_credentials(&self) -> Result<(i32, String)> {
        let api_id = require(&self.secrets.api_id, "TELEGRAM_API_ID")?;
        let api_id = api_id
            .trim()
            .parse::<i32>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "TELEGRAM_API_ID",
                reason: e.to_string(),
            })?;
        let api_hash = require(&self.secrets.api_hash, "TELEGRAM_API_HASH")?;
        Ok((api_id, api_hash))
    }

    /// Interval between monitor cycles.
    #[must_use]
    pub fn interval(&self, test_mode: bool) -> Duration {
        let minutes = if test_mode {
            self.testing_interval_minutes
        } else {
            self.summary_interval_minutes
        };
        minutes_to_duration(minutes)
    }

    /// Offset used when printing timestamps for users.
    #[must_use]
    pub fn display_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.display_utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[allow(clippy::result_large_err)]
fn require(value: &Option<String>, field: &'static str) -> Result<String> {
    value
        .clone()
        .ok_or_else(|| ConfigError::MissingField { field }.into())
}

#[allow(clippy::result_large_err)]
fn parse_minutes(field: &'static str, raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|e| {
        ConfigError::InvalidValue {
            field,
            reason: e.to_string(),
        }
        .into()
    })
}
