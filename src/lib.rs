//! Marketpulse - Telegram digests of a financial news channel.
//!
//! The bot reads a public Telegram news channel on a fixed interval,
//! asks a generative model for a structured market-impact summary, and
//! sends the formatted digest to every subscriber of a Telegram bot.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Subscribers, channel posts, summaries and health levels
//! - [`port`] - Traits at the seams: channel, model, store, messenger, operator
//! - [`adapter`] - Telegram (Bot API and MTProto), OpenAI, SQLite, and the CLI
//! - [`application`] - Summarizer, broadcaster, monitor loop, command handling
//! - [`infrastructure`] - Configuration, health probes, and runtime wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use marketpulse::infrastructure::bootstrap::{self, RunOptions};
//! use marketpulse::infrastructure::config::settings::Config;
//!
//! # async fn start() -> marketpulse::error::Result<()> {
//! let mut config = Config::load_or_default("config.toml")?;
//! config.apply_env()?;
//! config.init_logging();
//! bootstrap::run(config, RunOptions::default()).await
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
