//! Persistence port for subscribers.

use async_trait::async_trait;

use crate::domain::{NewSubscriber, Subscriber, UserId};
use crate::error::Result;

/// Storage operations for subscribers.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Insert or re-activate a subscriber, refreshing profile fields and the
    /// subscription timestamp.
    async fn subscribe(&self, profile: &NewSubscriber) -> Result<()>;

    /// Mark a subscriber inactive. Returns false when the user was unknown.
    async fn unsubscribe(&self, user_id: UserId) -> Result<bool>;

    /// Identifiers of all active subscribers, in subscription order.
    async fn active_ids(&self) -> Result<Vec<UserId>>;

    /// Number of active subscribers.
    async fn active_count(&self) -> Result<u64>;

    /// Every subscriber row, active or not.
    async fn list(&self) -> Result<Vec<Subscriber>>;
}
