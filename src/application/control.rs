//! Bot command execution.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{FixedOffset, Utc};
use tracing::{error, info};

use super::broadcast::Broadcaster;
use super::state::AppState;
use super::summary::Summarizer;
use crate::domain::UserId;
use crate::error::Result;
use crate::port::inbound::command::{CommandHandler, CommandSender, UserCommand};
use crate::port::outbound::channel::ChannelSource;
use crate::port::outbound::messenger::{Messenger, Notice, Progress, StatusNotice, SummaryNotice};
use crate::port::outbound::store::SubscriberStore;

/// Collaborators and settings for [`BotControl`].
pub struct BotControlDeps {
    pub store: Arc<dyn SubscriberStore>,
    pub messenger: Arc<dyn Messenger>,
    pub channel: Arc<dyn ChannelSource>,
    pub summarizer: Arc<Summarizer>,
    pub broadcaster: Arc<Broadcaster>,
    pub state: Arc<AppState>,
    /// Polling interval advertised to users.
    pub interval: Duration,
    /// Window read by `/test` and `/force_update`.
    pub on_demand_window: Duration,
    pub display_offset: FixedOffset,
}

/// Executes the bot command surface.
pub struct BotControl {
    deps: BotControlDeps,
}

impl BotControl {
    #[must_use]
    pub fn new(deps: BotControlDeps) -> Self {
        Self { deps }
    }

    async fn reply(&self, to: UserId, notice: Notice) -> Result<()> {
        self.deps.messenger.send(to, &notice).await
    }

    fn interval_minutes(&self) -> u64 {
        self.deps.interval.as_secs() / 60
    }

    /// Fetch the on-demand window and summarize it.
    ///
    /// Failures come back as the progress notice to show the user.
    async fn on_demand_summary(&self) -> std::result::Result<Notice, Progress> {
        let posts = match self
            .deps
            .channel
            .fetch_recent(self.deps.on_demand_window)
            .await
        {
            Ok(posts) => posts,
            Err(e) => {
                error!(error = %e, "On-demand fetch failed");
                return Err(Progress::FetchFailed);
            }
        };

        if posts.is_empty() {
            return Err(Progress::NoPosts);
        }

        let summary = self
            .deps
            .summarizer
            .summarize(&posts)
            .await
            .ok_or(Progress::SummaryFailed)?;

        Ok(Notice::Summary(SummaryNotice {
            summary,
            generated_at: Utc::now().with_timezone(&self.deps.display_offset),
        }))
    }

    async fn start(&self, sender: &CommandSender) -> Result<()> {
        let profile = sender.profile();
        self.deps.store.subscribe(&profile).await?;
        info!(user_id = %sender.user_id, "Subscribed user");

        self.reply(
            sender.reply_to,
            Notice::Welcome {
                name: profile.display_name().to_string(),
                interval_minutes: self.interval_minutes(),
            },
        )
        .await?;
        self.reply(sender.reply_to, Notice::DeliveryCheck).await
    }

    async fn subscribe_me(&self, sender: &CommandSender) -> Result<()> {
        let profile = sender.profile();
        self.deps.store.subscribe(&profile).await?;
        info!(user_id = %sender.user_id, "Subscribed user");

        self.reply(
            sender.reply_to,
            Notice::Subscribed {
                name: profile.display_name().to_string(),
            },
        )
        .await
    }

    async fn stop(&self, sender: &CommandSender) -> Result<()> {
        let known = self.deps.store.unsubscribe(sender.user_id).await?;
        info!(user_id = %sender.user_id, known, "Unsubscribed user");
        self.reply(sender.reply_to, Notice::Unsubscribed).await
    }

    async fn status(&self, sender: &CommandSender) -> Result<()> {
        let subscribers = self.deps.store.active_count().await?;
        let status = StatusNotice {
            subscribers,
            last_check: self
                .deps
                .state
                .last_processed()
                .with_timezone(&self.deps.display_offset),
            channel: self.deps.channel.channel().to_string(),
        };
        self.reply(sender.reply_to, Notice::Status(status)).await
    }

    async fn test(&self, sender: &CommandSender) -> Result<()> {
        self.deps.store.subscribe(&sender.profile()).await?;
        self.reply(sender.reply_to, Notice::Progress(Progress::GeneratingTest))
            .await?;

        let notice = match self.on_demand_summary().await {
            Ok(notice) => notice,
            Err(progress) => return self.reply(sender.reply_to, Notice::Progress(progress)).await,
        };

        self.reply(sender.reply_to, notice.clone()).await?;
        self.reply(sender.reply_to, Notice::Progress(Progress::TestingDelivery))
            .await?;
        self.deps.broadcaster.broadcast(&notice).await?;
        self.reply(sender.reply_to, Notice::Progress(Progress::DeliveryConfirmed))
            .await
    }

    async fn force_update(&self, sender: &CommandSender) -> Result<()> {
        self.reply(sender.reply_to, Notice::Progress(Progress::ForcingUpdate))
            .await?;

        let notice = match self.on_demand_summary().await {
            Ok(notice) => notice,
            Err(progress) => return self.reply(sender.reply_to, Notice::Progress(progress)).await,
        };

        let report = self.deps.broadcaster.broadcast(&notice).await?;
        info!(delivered = report.delivered, "Forced update sent");
        self.reply(sender.reply_to, Notice::Progress(Progress::ForceUpdateSent))
            .await
    }
}

#[async_trait]
impl CommandHandler for BotControl {
    async fn handle(&self, sender: &CommandSender, command: UserCommand) -> Result<()> {
        match command {
            UserCommand::Start => self.start(sender).await,
            UserCommand::SubscribeMe => self.subscribe_me(sender).await,
            UserCommand::Stop => self.stop(sender).await,
            UserCommand::Help => {
                self.reply(
                    sender.reply_to,
                    Notice::Help {
                        interval_minutes: self.interval_minutes(),
                    },
                )
                .await
            }
            UserCommand::Status => self.status(sender).await,
            UserCommand::Test => self.test(sender).await,
            UserCommand::ForceUpdate => self.force_update(sender).await,
        }
    }

    async fn reject(&self, sender: &CommandSender, reason: &str) -> Result<()> {
        self.reply(
            sender.reply_to,
            Notice::InvalidCommand {
                reason: reason.to_string(),
            },
        )
        .await
    }
}
