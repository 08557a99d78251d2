//! Infrastructure configuration modules.

pub mod delivery;
pub mod health;
pub mod llm;
pub mod logging;
pub mod settings;

pub use settings::{Config, Credentials};
