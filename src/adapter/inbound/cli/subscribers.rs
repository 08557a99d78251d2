//! Handler for the `subscribers` command.

use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::SubscribersArgs;
use crate::adapter::inbound::cli::{operator, output};
use crate::domain::Subscriber;
use crate::error::Result;
use crate::port::inbound::operator::subscribers::SubscribersRequest;

#[derive(Tabled)]
struct SubscriberRow {
    #[tabled(rename = "User ID")]
    user_id: i64,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "First name")]
    first_name: String,
    #[tabled(rename = "Subscribed")]
    subscribed_at: String,
    #[tabled(rename = "Active")]
    active: &'static str,
}

impl From<&Subscriber> for SubscriberRow {
    fn from(subscriber: &Subscriber) -> Self {
        Self {
            user_id: subscriber.user_id.get(),
            username: subscriber
                .username
                .as_deref()
                .map_or_else(|| "-".to_string(), |name| format!("@{name}")),
            first_name: subscriber.first_name.clone().unwrap_or_else(|| "-".into()),
            subscribed_at: subscriber
                .subscribed_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            active: if subscriber.active { "yes" } else { "no" },
        }
    }
}

/// Print every stored subscriber.
pub async fn execute(args: &SubscribersArgs) -> Result<()> {
    let request = SubscribersRequest {
        source: operator::source(&args.source),
        database: args.db.clone(),
    };
    let report = operator::operator().subscribers(&request).await?;

    if output::is_json() {
        let subscribers: Vec<_> = report
            .subscribers
            .iter()
            .map(|s| {
                json!({
                    "user_id": s.user_id.get(),
                    "username": s.username,
                    "first_name": s.first_name,
                    "subscribed_at": s.subscribed_at.to_rfc3339(),
                    "active": s.active,
                })
            })
            .collect();
        output::json_output(json!({
            "command": "subscribers",
            "database": report.database,
            "active": report.active(),
            "subscribers": subscribers,
        }));
        return Ok(());
    }

    output::section("Subscribers");
    output::field("Database", &report.database);
    output::field(
        "Active",
        format!("{} of {}", report.active(), report.subscribers.len()),
    );

    if report.subscribers.is_empty() {
        output::hint("users subscribe by sending /start to the bot");
        return Ok(());
    }

    println!();
    output::lines(&render_table(&report.subscribers));
    Ok(())
}

fn render_table(subscribers: &[Subscriber]) -> String {
    let rows: Vec<SubscriberRow> = subscribers.iter().map(SubscriberRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use chrono::{TimeZone, Utc};

    #[test]
    fn table_shows_profile_and_state() {
        let subscribers = vec![
            Subscriber {
                user_id: UserId::new(42),
                username: Some("trader".into()),
                first_name: None,
                subscribed_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
                active: true,
            },
            Subscriber {
                user_id: UserId::new(7),
                username: None,
                first_name: Some("Ann".into()),
                subscribed_at: Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(),
                active: false,
            },
        ];

        let table = render_table(&subscribers);
        assert!(table.contains("User ID"));
        assert!(table.contains("@trader"));
        assert!(table.contains("Ann"));
        assert!(table.contains("2026-03-01 09:30:00"));
        assert!(table.contains("no"));
    }
}
