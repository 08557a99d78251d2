//! Shared application state.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

/// Runtime state shared by the monitor loop and bot commands.
#[derive(Debug)]
pub struct AppState {
    last_processed: RwLock<DateTime<Utc>>,
}

impl AppState {
    /// State for a process started at `started_at`.
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            last_processed: RwLock::new(started_at),
        }
    }

    /// Time of the last completed summary cycle, or process start.
    #[must_use]
    pub fn last_processed(&self) -> DateTime<Utc> {
        *self.last_processed.read()
    }

    pub fn mark_processed(&self, at: DateTime<Utc>) {
        *self.last_processed.write() = at;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}
