//! Bot command surface.

use async_trait::async_trait;

use crate::domain::{NewSubscriber, UserId};
use crate::error::Result;

/// Commands a chat user can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Start,
    Stop,
    Help,
    Status,
    Test,
    SubscribeMe,
    ForceUpdate,
}

impl UserCommand {
    /// Every command, in menu order.
    pub const ALL: [Self; 7] = [
        Self::Start,
        Self::Stop,
        Self::Help,
        Self::Status,
        Self::Test,
        Self::SubscribeMe,
        Self::ForceUpdate,
    ];

    /// Command name without the leading slash.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Help => "help",
            Self::Status => "status",
            Self::Test => "test",
            Self::SubscribeMe => "subscribe_me",
            Self::ForceUpdate => "force_update",
        }
    }

    /// One-line description for the command menu.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Start => "Subscribe to financial news summaries",
            Self::Stop => "Unsubscribe from updates",
            Self::Help => "Show all commands",
            Self::Status => "Show bot status and subscriber count",
            Self::Test => "Send a test summary now",
            Self::SubscribeMe => "Subscribe yourself",
            Self::ForceUpdate => "Force an immediate update to all subscribers",
        }
    }
}

/// The chat user who issued a command.
///
/// `reply_to` is the chat the command arrived in; it equals `user_id` in a
/// private chat and is the group id otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSender {
    pub user_id: UserId,
    pub reply_to: UserId,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl CommandSender {
    /// Profile to store when this sender subscribes.
    #[must_use]
    pub fn profile(&self) -> NewSubscriber {
        NewSubscriber {
            user_id: self.user_id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
        }
    }
}

/// Executes commands received from chat users.
///
/// Replies go back to the sender through the messenger port; the returned
/// error only reports that a reply could not be delivered.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run a recognized command.
    async fn handle(&self, sender: &CommandSender, command: UserCommand) -> Result<()>;

    /// Answer a message that looked like a command but was not recognized.
    async fn reject(&self, sender: &CommandSender, reason: &str) -> Result<()>;
}
