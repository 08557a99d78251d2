//! Configuration and health validation command handlers.

pub mod config;
pub mod health;
