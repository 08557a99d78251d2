//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`mock`]: hand-written port implementations that script replies and
//!   record calls: `ScriptedLlm`, `ScriptedChannel`, `RecordingMessenger`.
//! - [`domain`]: builders for posts and summaries.
//! - [`store`]: the SQLite subscriber store on an in-memory database.

pub mod domain;
pub mod mock;
pub mod store;

pub use mock::{RecordingMessenger, ScriptedChannel, ScriptedLlm};
