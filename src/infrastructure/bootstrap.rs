//! Composition root: builds adapters and application services from
//! configuration and runs them until shutdown.

use std::sync::Arc;

use chrono::Utc;
use teloxide::Bot;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::adapter::outbound::llm::OpenAi;
use crate::adapter::outbound::sqlite::SqliteSubscriberStore;
use crate::adapter::outbound::telegram::{bot, MtprotoChannel, TelegramMessenger};
use crate::application::broadcast::Broadcaster;
use crate::application::control::{BotControl, BotControlDeps};
use crate::application::monitor::{Monitor, MonitorTiming};
use crate::application::state::AppState;
use crate::application::summary::Summarizer;
use crate::domain::{NewSubscriber, UserId};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::command::CommandHandler;
use crate::port::outbound::channel::ChannelSource;
use crate::port::outbound::llm::Llm;
use crate::port::outbound::messenger::Messenger;
use crate::port::outbound::store::SubscriberStore;

/// Launch options that do not live in the configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Use the testing interval instead of the summary interval.
    pub test_mode: bool,
    /// Operator subscribed before the bot starts.
    pub admin_id: Option<UserId>,
}

/// Services shared by the monitor and the command handler.
pub struct Components {
    pub store: Arc<dyn SubscriberStore>,
    pub channel: Arc<dyn ChannelSource>,
    pub messenger: Arc<dyn Messenger>,
    pub summarizer: Arc<Summarizer>,
    pub broadcaster: Arc<Broadcaster>,
    pub state: Arc<AppState>,
}

impl Components {
    /// Wire the application services around the given adapters.
    pub fn assemble(
        config: &Config,
        store: Arc<dyn SubscriberStore>,
        channel: Arc<dyn ChannelSource>,
        messenger: Arc<dyn Messenger>,
        llm: Arc<dyn Llm>,
    ) -> Self {
        let summarizer = Arc::new(Summarizer::new(llm, config.llm.max_input_chars));
        let broadcaster = Arc::new(Broadcaster::new(
            Arc::clone(&store),
            Arc::clone(&messenger),
            config.delivery.send_pause(),
        ));

        Self {
            store,
            channel,
            messenger,
            summarizer,
            broadcaster,
            state: Arc::new(AppState::new(Utc::now())),
        }
    }

    /// Monitor loop for this deployment.
    #[must_use]
    pub fn monitor(&self, config: &Config, options: RunOptions) -> Monitor {
        let timing = MonitorTiming {
            interval: config.interval(options.test_mode),
            error_backoff: config.delivery.error_backoff(),
            reconnect_delay: config.delivery.reconnect_delay(),
        };
        Monitor::new(
            Arc::clone(&self.channel),
            Arc::clone(&self.summarizer),
            Arc::clone(&self.broadcaster),
            Arc::clone(&self.state),
            timing,
            config.display_offset(),
        )
    }

    /// Command handler for this deployment.
    #[must_use]
    pub fn control(&self, config: &Config, options: RunOptions) -> BotControl {
        BotControl::new(BotControlDeps {
            store: Arc::clone(&self.store),
            messenger: Arc::clone(&self.messenger),
            channel: Arc::clone(&self.channel),
            summarizer: Arc::clone(&self.summarizer),
            broadcaster: Arc::clone(&self.broadcaster),
            state: Arc::clone(&self.state),
            interval: config.interval(options.test_mode),
            on_demand_window: config.delivery.on_demand_window(),
            display_offset: config.display_offset(),
        })
    }
}

/// Register the operator passed through `--admin_id`.
pub async fn subscribe_admin(store: &dyn SubscriberStore, admin_id: UserId) -> Result<()> {
    store.subscribe(&NewSubscriber::admin(admin_id)).await?;
    info!(user_id = %admin_id, "Admin subscribed");
    Ok(())
}

/// Run the bot until Ctrl-C or until the command listener stops.
pub async fn run(config: Config, options: RunOptions) -> Result<()> {
    let credentials = config.credentials()?;
    info!(
        channel = %config.target_channel,
        test_mode = options.test_mode,
        interval_secs = config.interval(options.test_mode).as_secs(),
        "Starting marketpulse"
    );

    let store: Arc<dyn SubscriberStore> = Arc::new(SqliteSubscriberStore::open(&config.database)?);
    info!(database = %config.database, "Database initialized");

    if let Some(admin_id) = options.admin_id {
        subscribe_admin(store.as_ref(), admin_id).await?;
    }

    let llm: Arc<dyn Llm> = Arc::new(OpenAi::new(credentials.openai_api_key, &config.llm)?);
    info!(provider = llm.name(), model = %config.llm.model, "LLM client initialized");

    let channel = MtprotoChannel::new(
        config.target_channel.clone(),
        credentials.api_id,
        credentials.api_hash,
        credentials.session,
    );
    channel.reconnect().await?;
    let channel: Arc<dyn ChannelSource> = Arc::new(channel);

    let bot = Bot::new(credentials.bot_token);
    let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(bot.clone()));

    let components = Components::assemble(&config, store, channel, messenger, llm);
    let handler: Arc<dyn CommandHandler> = Arc::new(components.control(&config, options));
    let monitor = components.monitor(&config, options);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let monitor_handle = tokio::spawn(monitor.run(shutdown_rx));
    let mut listener = tokio::spawn(bot::listen(bot, handler));

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!(error = %e, "Failed to listen for Ctrl-C"),
            }
            listener.abort();
        }
        result = &mut listener => {
            if let Err(e) = result {
                error!(error = %e, "Command listener panicked");
            } else {
                warn!("Command listener stopped");
            }
        }
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = monitor_handle.await {
        error!(error = %e, "Monitor task panicked");
    }

    info!("Bot stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::outbound::messenger::Notice;
    use crate::testkit::{RecordingMessenger, ScriptedChannel, ScriptedLlm};

    fn components(config: &Config) -> (Components, Arc<RecordingMessenger>) {
        let messenger = Arc::new(RecordingMessenger::new());
        let store: Arc<dyn SubscriberStore> = Arc::new(SqliteSubscriberStore::in_memory().unwrap());
        let channel: Arc<dyn ChannelSource> = Arc::new(ScriptedChannel::new("marketfeed"));
        let llm: Arc<dyn Llm> = Arc::new(ScriptedLlm::new("{}"));
        let built = Components::assemble(
            config,
            store,
            channel,
            Arc::clone(&messenger) as Arc<dyn Messenger>,
            llm,
        );
        (built, messenger)
    }

    #[tokio::test]
    async fn admin_is_subscribed_with_fixed_profile() {
        let store = SqliteSubscriberStore::in_memory().unwrap();
        subscribe_admin(&store, UserId::new(42)).await.unwrap();

        let subscribers = store.list().await.unwrap();
        assert_eq!(subscribers.len(), 1);
        assert_eq!(subscribers[0].username.as_deref(), Some("admin"));
        assert_eq!(subscribers[0].first_name.as_deref(), Some("Admin"));
        assert!(subscribers[0].active);
    }

    #[tokio::test]
    async fn test_mode_interval_reaches_help_text() {
        let config = Config::default();
        let (built, messenger) = components(&config);
        let options = RunOptions {
            test_mode: true,
            admin_id: None,
        };
        let control = built.control(&config, options);

        let sender = crate::port::inbound::command::CommandSender {
            user_id: UserId::new(7),
            reply_to: UserId::new(7),
            username: None,
            first_name: Some("Ann".into()),
        };
        control
            .handle(&sender, crate::port::inbound::command::UserCommand::Help)
            .await
            .unwrap();

        assert_eq!(
            messenger.notices_for(UserId::new(7)),
            vec![Notice::Help {
                interval_minutes: 5
            }]
        );
    }
}
