//! Scripted and recording port implementations.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{ChannelPost, UserId};
use crate::error::{Error, Result};
use crate::port::outbound::channel::ChannelSource;
use crate::port::outbound::llm::{Completion, Llm};
use crate::port::outbound::messenger::{Messenger, Notice};

/// LLM that answers every request with the same reply, or fails.
pub struct ScriptedLlm {
    reply: Option<String>,
    delay: Duration,
    requests: Mutex<Vec<Completion>>,
}

impl ScriptedLlm {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Take `delay` to answer each request.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// An LLM whose every request fails with a connection error.
    pub fn failing() -> Self {
        Self {
            reply: None,
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Completion> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Llm for ScriptedLlm {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, request: &Completion) -> Result<String> {
        self.requests.lock().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply
            .clone()
            .ok_or_else(|| Error::Connection("scripted failure".to_string()))
    }
}

enum Step {
    Posts(Vec<ChannelPost>),
    ConnectionLost,
    Failure(String),
}

/// Channel that replays queued fetch results, then returns no posts.
pub struct ScriptedChannel {
    name: String,
    steps: Mutex<VecDeque<Step>>,
    windows: Mutex<Vec<Duration>>,
    reconnects: Mutex<usize>,
}

impl ScriptedChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Mutex::new(VecDeque::new()),
            windows: Mutex::new(Vec::new()),
            reconnects: Mutex::new(0),
        }
    }

    /// Queue a successful fetch.
    pub fn push_posts(&self, posts: Vec<ChannelPost>) -> &Self {
        self.steps.lock().push_back(Step::Posts(posts));
        self
    }

    /// Queue a fetch that fails with a connection error.
    pub fn push_connection_lost(&self) -> &Self {
        self.steps.lock().push_back(Step::ConnectionLost);
        self
    }

    /// Queue a fetch that fails with a non-connection error.
    pub fn push_failure(&self, reason: impl Into<String>) -> &Self {
        self.steps.lock().push_back(Step::Failure(reason.into()));
        self
    }

    /// Windows requested so far.
    pub fn windows(&self) -> Vec<Duration> {
        self.windows.lock().clone()
    }

    pub fn reconnects(&self) -> usize {
        *self.reconnects.lock()
    }
}

#[async_trait]
impl ChannelSource for ScriptedChannel {
    fn channel(&self) -> &str {
        &self.name
    }

    async fn fetch_recent(&self, window: Duration) -> Result<Vec<ChannelPost>> {
        self.windows.lock().push(window);
        match self.steps.lock().pop_front() {
            Some(Step::Posts(posts)) => Ok(posts),
            Some(Step::ConnectionLost) => Err(Error::Connection("connection reset".to_string())),
            Some(Step::Failure(reason)) => Err(Error::Telegram(reason)),
            None => Ok(Vec::new()),
        }
    }

    async fn reconnect(&self) -> Result<()> {
        *self.reconnects.lock() += 1;
        Ok(())
    }
}

/// Messenger that records every notice and fails for chosen recipients.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(UserId, Notice)>>,
    failing: Mutex<HashSet<UserId>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to `user_id` fail.
    pub fn fail_for(&self, user_id: UserId) {
        self.failing.lock().insert(user_id);
    }

    /// Successfully delivered notices, in order.
    pub fn sent(&self) -> Vec<(UserId, Notice)> {
        self.sent.lock().clone()
    }

    pub fn recipients(&self) -> Vec<UserId> {
        self.sent.lock().iter().map(|(id, _)| *id).collect()
    }

    /// Notices delivered to one recipient, in order.
    pub fn notices_for(&self, user_id: UserId) -> Vec<Notice> {
        self.sent
            .lock()
            .iter()
            .filter(|(id, _)| *id == user_id)
            .map(|(_, notice)| notice.clone())
            .collect()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, recipient: UserId, notice: &Notice) -> Result<()> {
        if self.failing.lock().contains(&recipient) {
            return Err(Error::Telegram(
                "Forbidden: bot was blocked by the user".to_string(),
            ));
        }
        self.sent.lock().push((recipient, notice.clone()));
        Ok(())
    }
}
