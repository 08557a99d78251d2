//! Outbound adapters (driven side).

pub mod llm;
pub mod sqlite;
pub mod telegram;
