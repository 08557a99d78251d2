//! Where an operator command reads its configuration from.

/// Locations of the environment file and the optional tuning file.
///
/// Paths are plain strings so the port stays transport-agnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    /// `.env` file holding credentials and deployment values.
    pub env_file: String,
    /// Optional TOML file with non-secret tuning.
    pub config_file: String,
}

impl ConfigSource {
    pub fn new(env_file: impl Into<String>, config_file: impl Into<String>) -> Self {
        Self {
            env_file: env_file.into(),
            config_file: config_file.into(),
        }
    }
}

impl Default for ConfigSource {
    fn default() -> Self {
        Self::new(".env", "config.toml")
    }
}
