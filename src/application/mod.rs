//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! through ports.

pub mod broadcast;
pub mod control;
pub mod monitor;
pub mod state;
pub mod summary;
