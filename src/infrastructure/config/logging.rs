//! Logging configuration and initialization.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".into()
}

fn default_format() -> String {
    "pretty".into()
}

impl LoggingConfig {
    /// Force the debug level, as requested by `--debug`.
    pub fn enable_debug(&mut self) {
        self.level = "debug".into();
    }

    /// Force JSON output, as requested by `--json-logs`.
    pub fn enable_json(&mut self) {
        self.format = "json".into();
    }

    /// Filter directive built from the configured level.
    ///
    /// `RUST_LOG` wins over the configured level unless debug was forced.
    #[must_use]
    pub fn filter(&self) -> EnvFilter {
        if self.level == "debug" {
            return EnvFilter::new("debug");
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Initialize the tracing subscriber with this logging configuration.
    ///
    /// A subscriber installed earlier (tests) is left in place.
    pub fn init(&self) {
        let filter = self.filter();

        let _ = match self.format.as_str() {
            "json" => fmt().json().with_env_filter(filter).try_init(),
            _ => fmt().with_env_filter(filter).try_init(),
        };
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_overrides_level() {
        let mut config = LoggingConfig::default();
        config.enable_debug();
        assert_eq!(config.level, "debug");
        assert_eq!(config.filter().to_string(), "debug");
    }

    #[test]
    fn json_flag_overrides_format() {
        let mut config = LoggingConfig::default();
        config.enable_json();
        assert_eq!(config.format, "json");
    }
}
