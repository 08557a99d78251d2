//! MTProto channel reader.
//!
//! Reads the monitored public channel with a user session, since bots can
//! only see channels they administer.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use grammers_client::types::Chat;
use grammers_client::{Client, InvocationError};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::domain::ChannelPost;
use crate::error::{Error, Result};
use crate::port::outbound::channel::ChannelSource;

use super::session::{connect, decode_session};

/// Windows at least this long read the large message cap.
const LONG_WINDOW: Duration = Duration::from_secs(3 * 60 * 60);
const LONG_WINDOW_LIMIT: usize = 500;
const SHORT_WINDOW_LIMIT: usize = 50;

/// Channel source backed by a grammers user client.
///
/// The client is dialed lazily and dropped on connection failures so the
/// next fetch starts from a fresh connection.
pub struct MtprotoChannel {
    channel: String,
    api_id: i32,
    api_hash: String,
    session: String,
    client: Mutex<Option<Client>>,
}

impl MtprotoChannel {
    pub fn new(
        channel: impl Into<String>,
        api_id: i32,
        api_hash: impl Into<String>,
        session: impl Into<String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            api_id,
            api_hash: api_hash.into(),
            session: session.into(),
            client: Mutex::new(None),
        }
    }

    /// Connected client, dialing when there is none.
    async fn client(&self) -> Result<Client> {
        let mut guard = self.client.lock().await;
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        let client = self.dial().await?;
        *guard = Some(client.clone());
        Ok(client)
    }

    async fn dial(&self) -> Result<Client> {
        let session = decode_session(&self.session)?;
        let client = connect(self.api_id, &self.api_hash, session).await?;

        let authorized = client.is_authorized().await.map_err(invocation_error)?;
        if !authorized {
            return Err(Error::Telegram(
                "session is not authorized; generate a new one with `marketpulse session`"
                    .to_string(),
            ));
        }

        info!(channel = %self.channel, "Connected MTProto user client");
        Ok(client)
    }

    async fn drop_client(&self) {
        if self.client.lock().await.take().is_some() {
            warn!("Dropped MTProto client after connection failure");
        }
    }

    async fn resolve(&self, client: &Client) -> Result<Option<Chat>> {
        for name in candidate_names(&self.channel) {
            match client.resolve_username(&name).await {
                Ok(Some(chat)) => return Ok(Some(chat)),
                Ok(None) => debug!(name = %name, "Channel name did not resolve"),
                Err(e) => {
                    let err = invocation_error(e);
                    if err.is_connection() {
                        return Err(err);
                    }
                    debug!(name = %name, error = %err, "Channel lookup failed");
                }
            }
        }
        Ok(None)
    }

    async fn read(&self, client: &Client, window: Duration) -> Result<Vec<ChannelPost>> {
        let Some(chat) = self.resolve(client).await? else {
            error!(channel = %self.channel, "Channel not found");
            return Ok(Vec::new());
        };

        let limit = message_limit(window);
        let cutoff = cutoff(Utc::now(), window);
        info!(
            channel = %self.channel,
            since = %cutoff.format("%Y-%m-%d %H:%M:%S"),
            limit,
            "Fetching channel posts"
        );

        let mut messages = client.iter_messages(chat.pack()).limit(limit);
        let mut posts = Vec::new();
        while let Some(message) = messages.next().await.map_err(invocation_error)? {
            let post = ChannelPost::new(message.id(), message.date(), message.text());
            match admit(&post, cutoff) {
                Admit::Keep => posts.push(post),
                Admit::Skip => {}
                Admit::Stop => break,
            }
        }

        info!(channel = %self.channel, count = posts.len(), "Fetched channel posts");
        Ok(posts)
    }
}

#[async_trait]
impl ChannelSource for MtprotoChannel {
    fn channel(&self) -> &str {
        &self.channel
    }

    async fn fetch_recent(&self, window: Duration) -> Result<Vec<ChannelPost>> {
        let client = self.client().await?;
        match self.read(&client, window).await {
            Ok(posts) => Ok(posts),
            Err(e) => {
                if e.is_connection() {
                    self.drop_client().await;
                }
                Err(e)
            }
        }
    }

    async fn reconnect(&self) -> Result<()> {
        self.drop_client().await;
        self.client().await.map(|_| ())
    }
}

fn invocation_error(err: InvocationError) -> Error {
    match err {
        InvocationError::Rpc(rpc) => Error::Telegram(rpc.to_string()),
        other => Error::Connection(other.to_string()),
    }
}

/// Names to try when resolving a channel: as given, then with the `@`
/// prefix toggled.
fn candidate_names(channel: &str) -> Vec<String> {
    let channel = channel.trim();
    let toggled = match channel.strip_prefix('@') {
        Some(bare) => bare.to_string(),
        None => format!("@{channel}"),
    };
    vec![channel.to_string(), toggled]
}

/// Message cap for a fetch window.
fn message_limit(window: Duration) -> usize {
    if window >= LONG_WINDOW {
        LONG_WINDOW_LIMIT
    } else {
        SHORT_WINDOW_LIMIT
    }
}

fn cutoff(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(window)
        .ok()
        .and_then(|w| now.checked_sub_signed(w))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[derive(Debug, PartialEq, Eq)]
enum Admit {
    Keep,
    Skip,
    Stop,
}

/// Decide what to do with a post while walking newest to oldest.
fn admit(post: &ChannelPost, cutoff: DateTime<Utc>) -> Admit {
    if post.date < cutoff {
        Admit::Stop
    } else if post.text.trim().is_empty() {
        Admit::Skip
    } else {
        Admit::Keep
    }
}
