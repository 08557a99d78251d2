//! Miette-based error diagnostics for CLI error presentation.
//!
//! Turns crate errors into reports with source context and help text so
//! operators see what to fix before the bot starts.

use std::path::Path;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::error::{ConfigError as SettingsError, Error};

/// Configuration file error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(marketpulse::config))]
pub struct ConfigError {
    pub message: String,

    #[source_code]
    pub src: String,

    #[label("here")]
    pub span: SourceSpan,

    #[help]
    pub help: Option<String>,
}

impl ConfigError {
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        src: impl Into<String>,
        offset: usize,
        len: usize,
    ) -> Self {
        Self {
            message: message.into(),
            src: src.into(),
            span: (offset, len).into(),
            help: None,
        }
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Problem with the environment the bot is launched in.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(marketpulse::environment))]
pub struct EnvironmentError {
    pub message: String,

    #[help]
    pub help: Option<String>,
}

impl EnvironmentError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            help: None,
        }
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Network or platform failure.
#[derive(Debug, Error, Diagnostic)]
#[error("connection failed: {message}")]
#[diagnostic(
    code(marketpulse::connection),
    help("check your network connection and the Telegram and OpenAI credentials")
)]
pub struct ConnectionError {
    pub message: String,
}

/// Build the report shown for `error`.
///
/// `config_file` is the tuning file the command read, used to point parse
/// errors at the offending line.
#[must_use]
pub fn report(error: Error, config_file: Option<&str>) -> miette::Report {
    match error {
        Error::Config(SettingsError::Parse(parse)) => {
            let source = config_file.and_then(|path| std::fs::read_to_string(path).ok());
            match (source, parse.span()) {
                (Some(src), Some(span)) => miette::Report::new(
                    ConfigError::new(parse.message().to_string(), src, span.start, span.len())
                        .with_help(format!(
                            "fix the TOML syntax in {}",
                            config_file.unwrap_or("the config file")
                        )),
                ),
                _ => miette::Report::new(EnvironmentError::new(
                    Error::Config(SettingsError::Parse(parse)).to_string(),
                )),
            }
        }
        Error::Config(SettingsError::MissingEnvFile { path }) => miette::Report::new(
            EnvironmentError::new(format!("environment file not found: {}", path.display()))
                .with_help(env_file_help(&path)),
        ),
        Error::Config(SettingsError::MissingField { field }) => miette::Report::new(
            EnvironmentError::new(format!("missing required setting: {field}"))
                .with_help(format!("set {field} in the environment file")),
        ),
        error @ (Error::Connection(_) | Error::Http(_)) => {
            miette::Report::new(ConnectionError {
                message: error.to_string(),
            })
        }
        other => miette::Report::new(EnvironmentError::new(other.to_string())),
    }
}

fn env_file_help(path: &Path) -> String {
    format!(
        "copy .env.example to {} and fill in the Telegram and OpenAI credentials",
        path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_env_file_has_help() {
        let report = report(
            SettingsError::MissingEnvFile {
                path: PathBuf::from("/srv/bot/.env"),
            }
            .into(),
            None,
        );
        assert!(report.to_string().contains("/srv/bot/.env"));
        let help = report.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains(".env.example"));
    }

    #[test]
    fn parse_error_points_into_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let content = "target_channel = \"ok\"\nsummary_interval_minutes = \"often\"\n";
        std::fs::write(&path, content).unwrap();

        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Tuning {
            summary_interval_minutes: u64,
        }
        let parse = toml::from_str::<Tuning>(content).unwrap_err();
        let report = report(
            SettingsError::Parse(parse).into(),
            Some(path.to_str().unwrap()),
        );

        assert!(report.source_code().is_some());
        assert!(report.labels().is_some());
    }

    #[test]
    fn missing_field_names_variable() {
        let report = report(
            SettingsError::MissingField {
                field: "TELEGRAM_BOT_TOKEN",
            }
            .into(),
            None,
        );
        assert!(report.to_string().contains("TELEGRAM_BOT_TOKEN"));
    }

    #[test]
    fn connection_errors_get_connection_code() {
        let report = report(Error::Connection("timed out".into()), None);
        let code = report.code().map(|c| c.to_string()).unwrap_or_default();
        assert_eq!(code, "marketpulse::connection");
    }
}
