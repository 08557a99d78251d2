use std::path::PathBuf;

use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment file not found: {}", path.display())]
    MissingEnvFile { path: PathBuf },

    #[error("failed to load environment file: {0}")]
    EnvFile(#[source] dotenvy::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Telegram error: {0}")]
    Telegram(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("health check failed: {0}")]
    Unhealthy(String),
}

impl Error {
    /// True for failures that a fresh connection might cure.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            Self::Telegram(reason) => {
                let reason = reason.to_lowercase();
                reason.contains("disconnected") || reason.contains("connection")
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<teloxide::RequestError> for Error {
    fn from(err: teloxide::RequestError) -> Self {
        Error::Telegram(err.to_string())
    }
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        Error::Database(err.to_string())
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_errors_are_classified() {
        assert!(Error::Connection("reset by peer".into()).is_connection());
        assert!(Error::Telegram("Client Disconnected".into()).is_connection());
        assert!(!Error::Telegram("chat not found".into()).is_connection());
        assert!(!Error::Database("locked".into()).is_connection());
    }

    #[test]
    fn missing_env_file_mentions_path() {
        let err: Error = ConfigError::MissingEnvFile {
            path: PathBuf::from("/srv/bot/.env"),
        }
        .into();
        assert!(err.to_string().contains("/srv/bot/.env"));
    }

    #[test]
    fn missing_field_mentions_name() {
        let err: Error = ConfigError::MissingField {
            field: "OPENAI_API_KEY",
        }
        .into();
        assert_eq!(err.to_string(), "missing required field: OPENAI_API_KEY");
    }
}
