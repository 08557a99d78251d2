//! Messenger port for user-facing messages.
//!
//! The application describes *what* to tell a user as a [`Notice`]; the
//! adapter owns the wording and markup of the concrete chat platform.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use crate::domain::{Summary, UserId};
use crate::error::Result;

/// Messages the bot can send.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A market summary, stamped with its generation time.
    Summary(SummaryNotice),
    /// Full welcome after `/start`.
    Welcome {
        name: String,
        interval_minutes: u64,
    },
    /// Short welcome after `/subscribe_me`.
    Subscribed { name: String },
    /// Direct message proving the bot can reach the user.
    DeliveryCheck,
    /// Confirmation after `/stop`.
    Unsubscribed,
    /// Command overview.
    Help { interval_minutes: u64 },
    /// Runtime status.
    Status(StatusNotice),
    /// Progress or outcome of an on-demand summary.
    Progress(Progress),
    /// The message looked like a command but could not be parsed.
    InvalidCommand { reason: String },
}

/// Summary payload of a [`Notice`].
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryNotice {
    pub summary: Summary,
    pub generated_at: DateTime<FixedOffset>,
}

/// Runtime status payload of a [`Notice`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatusNotice {
    pub subscribers: u64,
    pub last_check: DateTime<FixedOffset>,
    pub channel: String,
}

/// Steps of the on-demand `/test` and `/force_update` flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    GeneratingTest,
    ForcingUpdate,
    TestingDelivery,
    DeliveryConfirmed,
    ForceUpdateSent,
    NoPosts,
    SummaryFailed,
    FetchFailed,
}

/// Delivery of notices to a chat.
///
/// Unlike fire-and-forget notifiers, `send` reports failure so that callers
/// can react to unreachable recipients.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver a notice to the chat of `recipient`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejected the message or could not be
    /// reached.
    async fn send(&self, recipient: UserId, notice: &Notice) -> Result<()>;
}
