//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed subscriber store using Diesel ORM.

pub mod database;
pub mod store;

pub use store::SqliteSubscriberStore;
