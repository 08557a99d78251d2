//! Delivery and loop pacing configuration.

use std::time::Duration;

use serde::Deserialize;

/// Pacing of the monitor loop and the subscriber fan-out.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    /// Pause between two sends of the same broadcast, in milliseconds.
    #[serde(default = "default_send_pause_ms")]
    pub send_pause_ms: u64,

    /// Window fetched by `/test` and `/force_update`, in minutes.
    #[serde(default = "default_on_demand_window_minutes")]
    pub on_demand_window_minutes: u64,

    /// Sleep after a failed monitor cycle, in seconds.
    #[serde(default = "default_error_backoff_secs")]
    pub error_backoff_secs: u64,

    /// Pause before reconnecting after a connection failure, in seconds.
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
}

const fn default_send_pause_ms() -> u64 {
    1000
}

const fn default_on_demand_window_minutes() -> u64 {
    120
}

const fn default_error_backoff_secs() -> u64 {
    60
}

const fn default_reconnect_delay_secs() -> u64 {
    5
}

/// Longest accepted polling interval or fetch window: one week.
pub const MAX_WINDOW_MINUTES: u64 = 7 * 24 * 60;

/// Minutes as a duration, saturating instead of overflowing.
#[must_use]
pub const fn minutes_to_duration(minutes: u64) -> Duration {
    Duration::from_secs(minutes.saturating_mul(60))
}

impl DeliveryConfig {
    #[must_use]
    pub fn send_pause(&self) -> Duration {
        Duration::from_millis(self.send_pause_ms)
    }

    #[must_use]
    pub fn on_demand_window(&self) -> Duration {
        minutes_to_duration(self.on_demand_window_minutes)
    }

    #[must_use]
    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }

    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            send_pause_ms: default_send_pause_ms(),
            on_demand_window_minutes: default_on_demand_window_minutes(),
            error_backoff_secs: default_error_backoff_secs(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_convert_without_overflow() {
        assert_eq!(minutes_to_duration(120), Duration::from_secs(7200));
        assert_eq!(minutes_to_duration(u64::MAX), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn default_window_is_two_hours() {
        assert_eq!(
            DeliveryConfig::default().on_demand_window(),
            Duration::from_secs(2 * 60 * 60)
        );
    }
}
