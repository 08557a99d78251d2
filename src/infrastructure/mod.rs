//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! business logic.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`health`] - Host and service health probes
//! - [`operator`] - Operator use-cases behind the CLI ports

pub mod bootstrap;
pub mod config;
pub mod health;
pub mod operator;
