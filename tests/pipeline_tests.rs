//! End-to-end flow over the ports: channel posts in, formatted summaries
//! out, with the real SQLite store underneath.

use std::sync::Arc;
use std::time::Duration;

use chrono::FixedOffset;
use marketpulse::application::broadcast::{BroadcastReport, Broadcaster};
use marketpulse::application::control::{BotControl, BotControlDeps};
use marketpulse::application::monitor::{CycleOutcome, Monitor, MonitorTiming};
use marketpulse::application::state::AppState;
use marketpulse::application::summary::Summarizer;
use marketpulse::domain::{NewSubscriber, UserId};
use marketpulse::port::inbound::command::{CommandHandler, CommandSender, UserCommand};
use marketpulse::port::outbound::channel::ChannelSource;
use marketpulse::port::outbound::llm::Llm;
use marketpulse::port::outbound::messenger::{Messenger, Notice, Progress};
use marketpulse::port::outbound::store::SubscriberStore;
use marketpulse::testkit::store::{memory_store, SqliteSubscriberStore};
use marketpulse::testkit::{domain, RecordingMessenger, ScriptedChannel, ScriptedLlm};

struct Harness {
    store: Arc<SqliteSubscriberStore>,
    channel: Arc<ScriptedChannel>,
    messenger: Arc<RecordingMessenger>,
    summarizer: Arc<Summarizer>,
    broadcaster: Arc<Broadcaster>,
    state: Arc<AppState>,
}

impl Harness {
    fn new(llm: ScriptedLlm) -> Self {
        let store = Arc::new(memory_store());
        let channel = Arc::new(ScriptedChannel::new("marketfeed"));
        let messenger = Arc::new(RecordingMessenger::new());
        let llm: Arc<dyn Llm> = Arc::new(llm);
        let summarizer = Arc::new(Summarizer::new(llm, 4000));
        let broadcaster = Arc::new(Broadcaster::new(
            Arc::clone(&store) as Arc<dyn SubscriberStore>,
            Arc::clone(&messenger) as Arc<dyn Messenger>,
            Duration::ZERO,
        ));
        Self {
            store,
            channel,
            messenger,
            summarizer,
            broadcaster,
            state: Arc::new(AppState::default()),
        }
    }

    fn monitor(&self) -> Monitor {
        Monitor::new(
            Arc::clone(&self.channel) as Arc<dyn ChannelSource>,
            Arc::clone(&self.summarizer),
            Arc::clone(&self.broadcaster),
            Arc::clone(&self.state),
            MonitorTiming {
                interval: Duration::from_secs(180 * 60),
                error_backoff: Duration::from_secs(60),
                reconnect_delay: Duration::from_secs(5),
            },
            offset(),
        )
    }

    fn control(&self) -> BotControl {
        BotControl::new(BotControlDeps {
            store: Arc::clone(&self.store) as Arc<dyn SubscriberStore>,
            messenger: Arc::clone(&self.messenger) as Arc<dyn Messenger>,
            channel: Arc::clone(&self.channel) as Arc<dyn ChannelSource>,
            summarizer: Arc::clone(&self.summarizer),
            broadcaster: Arc::clone(&self.broadcaster),
            state: Arc::clone(&self.state),
            interval: Duration::from_secs(180 * 60),
            on_demand_window: Duration::from_secs(120 * 60),
            display_offset: offset(),
        })
    }
}

fn offset() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

fn sender(id: i64, name: &str) -> CommandSender {
    CommandSender {
        user_id: UserId::new(id),
        reply_to: UserId::new(id),
        username: Some(name.to_lowercase()),
        first_name: Some(name.to_string()),
    }
}

#[tokio::test]
async fn subscribers_receive_each_new_summary_once() {
    let harness = Harness::new(ScriptedLlm::new(domain::summary_json()));
    let control = harness.control();
    control
        .handle(&sender(1, "Ann"), UserCommand::Start)
        .await
        .unwrap();
    control
        .handle(&sender(2, "Bob"), UserCommand::SubscribeMe)
        .await
        .unwrap();

    harness
        .channel
        .push_posts(domain::posts(42, &["CPI came in soft", "Yields drop"]))
        .push_posts(domain::posts(42, &["CPI came in soft", "Yields drop"]));

    let mut monitor = harness.monitor();
    let first = monitor.run_cycle().await.unwrap();
    assert_eq!(
        first,
        CycleOutcome::Delivered(BroadcastReport {
            delivered: 2,
            failed: 0,
            deactivated: 0,
        })
    );
    assert_eq!(monitor.run_cycle().await.unwrap(), CycleOutcome::Unchanged);

    for id in [1, 2] {
        let summaries = harness
            .messenger
            .notices_for(UserId::new(id))
            .into_iter()
            .filter(|notice| matches!(notice, Notice::Summary(_)))
            .count();
        assert_eq!(summaries, 1, "user {id} should get exactly one summary");
    }
}

#[tokio::test]
async fn blocked_user_is_deactivated_and_others_still_served() {
    let harness = Harness::new(ScriptedLlm::new(domain::summary_json()));
    for id in [10, 11, 12] {
        harness
            .store
            .subscribe(&NewSubscriber::new(id, None, None))
            .await
            .unwrap();
    }
    harness.messenger.fail_for(UserId::new(11));
    harness.channel.push_posts(domain::posts(7, &["Oil jumps"]));

    let outcome = harness.monitor().run_cycle().await.unwrap();
    assert_eq!(
        outcome,
        CycleOutcome::Delivered(BroadcastReport {
            delivered: 2,
            failed: 1,
            deactivated: 1,
        })
    );
    assert_eq!(harness.store.active_count().await.unwrap(), 2);
    assert_eq!(
        harness.messenger.recipients(),
        vec![UserId::new(10), UserId::new(12)]
    );
}

#[tokio::test]
async fn stop_removes_user_from_the_next_broadcast() {
    let harness = Harness::new(ScriptedLlm::new(domain::summary_json()));
    let control = harness.control();
    control
        .handle(&sender(1, "Ann"), UserCommand::Start)
        .await
        .unwrap();
    control
        .handle(&sender(2, "Bob"), UserCommand::Start)
        .await
        .unwrap();
    control
        .handle(&sender(2, "Bob"), UserCommand::Stop)
        .await
        .unwrap();

    harness.channel.push_posts(domain::posts(3, &["Fed holds"]));
    harness.monitor().run_cycle().await.unwrap();

    let bob_summaries = harness
        .messenger
        .notices_for(UserId::new(2))
        .into_iter()
        .filter(|notice| matches!(notice, Notice::Summary(_)))
        .count();
    assert_eq!(bob_summaries, 0);
    assert_eq!(harness.store.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn malformed_model_reply_still_reaches_subscribers() {
    let harness = Harness::new(ScriptedLlm::new("Markets were mixed today."));
    harness
        .store
        .subscribe(&NewSubscriber::new(5, None, None))
        .await
        .unwrap();
    harness.channel.push_posts(domain::posts(9, &["Mixed session"]));

    harness.monitor().run_cycle().await.unwrap();

    let notices = harness.messenger.notices_for(UserId::new(5));
    let Some(Notice::Summary(notice)) = notices.first() else {
        panic!("expected a summary, got {notices:?}");
    };
    assert_eq!(
        notice.summary.key_points,
        vec!["Error: Unable to parse structured data"]
    );
}

#[tokio::test]
async fn force_update_with_empty_channel_reports_no_posts() {
    let harness = Harness::new(ScriptedLlm::new(domain::summary_json()));
    let control = harness.control();

    control
        .handle(&sender(1, "Ann"), UserCommand::ForceUpdate)
        .await
        .unwrap();

    let notices = harness.messenger.notices_for(UserId::new(1));
    assert_eq!(notices.last(), Some(&Notice::Progress(Progress::NoPosts)));
    assert_eq!(
        harness.channel.windows(),
        vec![Duration::from_secs(120 * 60)]
    );
}
