//! Operator implementations for inbound adapters.

pub mod diagnostic;
pub mod entry;
pub mod runtime;
pub mod session;
pub mod subscribers;

mod shared;
