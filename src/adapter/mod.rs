//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`]: driving adapters (the operator CLI).
//! - [`outbound`]: driven adapters (SQLite, OpenAI, Telegram).

pub mod inbound;
pub mod outbound;
