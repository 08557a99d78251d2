//! Fan-out of notices to active subscribers.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::Result;
use crate::port::outbound::messenger::{Messenger, Notice};
use crate::port::outbound::store::SubscriberStore;

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: usize,
    pub deactivated: usize,
}

/// Sends a notice to every active subscriber, one at a time.
pub struct Broadcaster {
    store: Arc<dyn SubscriberStore>,
    messenger: Arc<dyn Messenger>,
    pause: Duration,
}

impl Broadcaster {
    pub fn new(
        store: Arc<dyn SubscriberStore>,
        messenger: Arc<dyn Messenger>,
        pause: Duration,
    ) -> Self {
        Self {
            store,
            messenger,
            pause,
        }
    }

    /// Deliver `notice` to all active subscribers.
    ///
    /// A recipient whose delivery fails is deactivated and the fan-out goes
    /// on with the next one.
    ///
    /// # Errors
    ///
    /// Returns an error only if the subscriber list cannot be read.
    pub async fn broadcast(&self, notice: &Notice) -> Result<BroadcastReport> {
        let recipients = self.store.active_ids().await?;
        let mut report = BroadcastReport::default();

        if recipients.is_empty() {
            info!("No subscribers to send summary to");
            return Ok(report);
        }

        info!(recipients = recipients.len(), "Broadcasting to subscribers");

        for (i, user_id) in recipients.iter().copied().enumerate() {
            if i > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            match self.messenger.send(user_id, notice).await {
                Ok(()) => {
                    report.delivered += 1;
                    info!(user_id = %user_id, "Delivered to subscriber");
                }
                Err(e) => {
                    report.failed += 1;
                    error!(user_id = %user_id, error = %e, "Failed to deliver to subscriber");
                    match self.store.unsubscribe(user_id).await {
                        Ok(_) => {
                            report.deactivated += 1;
                            warn!(user_id = %user_id, "Deactivated unreachable subscriber");
                        }
                        Err(e) => {
                            error!(user_id = %user_id, error = %e, "Failed to deactivate subscriber");
                        }
                    }
                }
            }
        }

        info!(
            delivered = report.delivered,
            failed = report.failed,
            deactivated = report.deactivated,
            "Broadcast complete"
        );
        Ok(report)
    }
}
