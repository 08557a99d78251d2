//! Builders for domain values used across tests.

use chrono::{Duration, Utc};

use crate::domain::{ChannelPost, StockImpact, Summary};

/// A post published `minutes_ago` minutes before now.
pub fn post(id: i32, minutes_ago: i64, text: &str) -> ChannelPost {
    ChannelPost::new(id, Utc::now() - Duration::minutes(minutes_ago), text)
}

/// Posts newest first, one minute apart, with ids counting down from
/// `newest_id`.
pub fn posts(newest_id: i32, texts: &[&str]) -> Vec<ChannelPost> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| post(newest_id - i as i32, i as i64, text))
        .collect()
}

/// A small but complete summary.
pub fn summary() -> Summary {
    Summary {
        summary: "Treasury yields fell after soft inflation data.".to_string(),
        potentially_impacted_stocks: vec![StockImpact {
            ticker: "JPM".to_string(),
            company_name: "JPMorgan Chase".to_string(),
            impact_type: "negative".to_string(),
            impact_reason: "Lower net interest margin".to_string(),
            confidence_level: "medium".to_string(),
            expected_magnitude: "minimal".to_string(),
        }],
        market_sectors: Vec::new(),
        sentiment: "bullish".to_string(),
        key_points: vec!["CPI below forecast".to_string()],
        market_implications: "Rate cut odds rise.".to_string(),
    }
}

/// The model reply that parses into [`summary`].
pub fn summary_json() -> String {
    serde_json::to_string(&summary()).unwrap_or_default()
}
