//! Inbound (driving) ports consumed by inbound adapters.
//!
//! - [`command`]: the bot command surface driven by the Telegram dispatcher.
//! - [`operator`]: operator use-cases driven by the CLI.

pub mod command;
pub mod operator;
