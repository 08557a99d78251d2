//! News channel port.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ChannelPost;
use crate::error::Result;

/// Source of recent posts from the monitored channel.
#[async_trait]
pub trait ChannelSource: Send + Sync {
    /// Name of the monitored channel, for status output.
    fn channel(&self) -> &str;

    /// Fetch text posts published within `window`, newest first.
    ///
    /// An unknown channel yields an empty list rather than an error.
    ///
    /// # Errors
    ///
    /// Returns a connection error when the underlying session dropped; the
    /// next call dials again.
    async fn fetch_recent(&self, window: Duration) -> Result<Vec<ChannelPost>>;

    /// Drop any cached session and connect again.
    ///
    /// # Errors
    ///
    /// Returns an error if the new connection cannot be authorized.
    async fn reconnect(&self) -> Result<()>;
}
