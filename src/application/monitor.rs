//! Periodic channel monitor.
//!
//! Each cycle reads the posts published since the previous cycle,
//! summarizes them and broadcasts the result. A cycle whose newest post was
//! already summarized is skipped.

use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, Utc};
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::broadcast::{BroadcastReport, Broadcaster};
use super::state::AppState;
use super::summary::Summarizer;
use crate::error::Result;
use crate::port::outbound::channel::ChannelSource;
use crate::port::outbound::messenger::{Notice, SummaryNotice};

/// Pacing of the monitor loop.
#[derive(Debug, Clone, Copy)]
pub struct MonitorTiming {
    /// Delay between cycles; also the fetch window.
    pub interval: Duration,
    /// Delay after a failed cycle.
    pub error_backoff: Duration,
    /// Pause before reconnecting after a connection failure.
    pub reconnect_delay: Duration,
}

/// What a single cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    NoPosts,
    /// The newest post was already summarized.
    Unchanged,
    Delivered(BroadcastReport),
}

/// Drives poll, summarize and fan-out on a fixed interval.
pub struct Monitor {
    channel: Arc<dyn ChannelSource>,
    summarizer: Arc<Summarizer>,
    broadcaster: Arc<Broadcaster>,
    state: Arc<AppState>,
    timing: MonitorTiming,
    display_offset: FixedOffset,
    last_post_id: Option<i32>,
}

impl Monitor {
    pub fn new(
        channel: Arc<dyn ChannelSource>,
        summarizer: Arc<Summarizer>,
        broadcaster: Arc<Broadcaster>,
        state: Arc<AppState>,
        timing: MonitorTiming,
        display_offset: FixedOffset,
    ) -> Self {
        Self {
            channel,
            summarizer,
            broadcaster,
            state,
            timing,
            display_offset,
            last_post_id: None,
        }
    }

    /// Run cycles until `shutdown` flips to true or its sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            channel = self.channel.channel(),
            interval_secs = self.timing.interval.as_secs(),
            "Starting channel monitor"
        );

        loop {
            let cycle = tokio::select! {
                result = self.run_cycle() => result,
                () = shutdown_requested(&mut shutdown) => {
                    warn!("Shutdown interrupted a monitor cycle");
                    break;
                }
            };

            let delay = match cycle {
                Ok(outcome) => {
                    info!(
                        ?outcome,
                        next_in_secs = self.timing.interval.as_secs(),
                        "Monitor cycle complete"
                    );
                    self.timing.interval
                }
                Err(e) => {
                    error!(error = %e, "Monitor cycle failed");
                    if e.is_connection() {
                        if wait(self.timing.reconnect_delay, &mut shutdown).await {
                            break;
                        }
                        match self.channel.reconnect().await {
                            Ok(()) => info!("Reconnected to channel"),
                            Err(e) => error!(error = %e, "Failed to reconnect to channel"),
                        }
                    }
                    self.timing.error_backoff
                }
            };

            if wait(delay, &mut shutdown).await {
                break;
            }
        }

        info!("Channel monitor stopped");
    }

    /// Run one poll, summarize and fan-out cycle.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel cannot be read or the subscriber list
    /// cannot be loaded.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let posts = self.channel.fetch_recent(self.timing.interval).await?;

        let Some(newest_id) = posts.iter().map(|post| post.id).max() else {
            info!("No new posts in this window");
            return Ok(CycleOutcome::NoPosts);
        };

        if self.last_post_id == Some(newest_id) {
            info!(post_id = newest_id, "Newest post already summarized");
            return Ok(CycleOutcome::Unchanged);
        }

        let Some(summary) = self.summarizer.summarize(&posts).await else {
            warn!("Summarizer returned nothing");
            return Ok(CycleOutcome::NoPosts);
        };

        let notice = Notice::Summary(SummaryNotice {
            summary,
            generated_at: Utc::now().with_timezone(&self.display_offset),
        });
        let report = self.broadcaster.broadcast(&notice).await?;

        self.last_post_id = Some(newest_id);
        self.state.mark_processed(Utc::now());
        Ok(CycleOutcome::Delivered(report))
    }
}

/// Sleep for `delay`; returns true when shutdown was requested meanwhile.
async fn wait(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        () = tokio::time::sleep(delay) => false,
        () = shutdown_requested(shutdown) => true,
    }
}

/// Resolves once shutdown is set or its sender is dropped.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    match shutdown.wait_for(|stop| *stop).await {
        Ok(_) => info!("Shutdown signal received"),
        Err(_) => info!("Shutdown channel closed"),
    }
}
