//! Subscriber report projection for operator-facing adapters.

use async_trait::async_trait;

use super::source::ConfigSource;
use crate::domain::Subscriber;
use crate::error::Result;

/// Inputs for `subscribers`.
#[derive(Debug, Clone, Default)]
pub struct SubscribersRequest {
    pub source: ConfigSource,
    /// Database path override.
    pub database: Option<String>,
}

/// Every stored subscriber plus where they came from.
#[derive(Debug, Clone)]
pub struct SubscriberReport {
    pub database: String,
    pub subscribers: Vec<Subscriber>,
}

impl SubscriberReport {
    #[must_use]
    pub fn active(&self) -> usize {
        self.subscribers.iter().filter(|s| s.active).count()
    }
}

/// Subscriber inspection use-cases.
#[async_trait]
pub trait SubscriberOperator: Send + Sync {
    /// List all subscribers, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or read.
    async fn subscribers(&self, request: &SubscribersRequest) -> Result<SubscriberReport>;
}
