//! Channel post read from the monitored news channel.

use chrono::{DateTime, Utc};

/// A text post from the monitored channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPost {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub text: String,
}

impl ChannelPost {
    pub fn new(id: i32, date: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            id,
            date,
            text: text.into(),
        }
    }
}
