//! Message formatting for Telegram notices.
//!
//! Every notice is rendered as `MarkdownV2`; dynamic text always goes
//! through [`escape_markdown`].

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset};

use crate::domain::{Confidence, Impact, Summary};
use crate::port::inbound::command::UserCommand;
use crate::port::outbound::messenger::{Notice, Progress, StatusNotice};

/// Key points shown in a rendered summary.
const MAX_KEY_POINTS: usize = 3;

/// Timestamp layout used in footers and status replies.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a notice into a `MarkdownV2` message.
#[must_use]
pub fn format_notice(notice: &Notice) -> String {
    match notice {
        Notice::Summary(n) => format_summary(&n.summary, &n.generated_at),
        Notice::Welcome {
            name,
            interval_minutes,
        } => format_welcome(name, *interval_minutes),
        Notice::Subscribed { name } => escape_markdown(&format!(
            "👋 Welcome {name}! You're now subscribed to financial news summaries."
        )),
        Notice::DeliveryCheck => escape_markdown(
            "This is a test message to verify I can send you direct messages. \
             If you see this, communication is working correctly!",
        ),
        Notice::Unsubscribed => escape_markdown(
            "You've been unsubscribed from financial news summaries. Use /start to subscribe again.",
        ),
        Notice::Help { interval_minutes } => format_help(*interval_minutes),
        Notice::Status(status) => format_status(status),
        Notice::Progress(progress) => escape_markdown(progress_text(*progress)),
        Notice::InvalidCommand { reason } => format!(
            "⚠️ {}\n\n{}",
            escape_markdown(&format!("Invalid command: {reason}")),
            command_list()
        ),
    }
}

/// Render a market summary.
#[must_use]
pub fn format_summary(summary: &Summary, generated_at: &DateTime<FixedOffset>) -> String {
    let mut msg = String::from("📊 *Financial News Summary*\n\n");
    let _ = writeln!(msg, "{}", escape_markdown(&summary.summary));

    msg.push_str("\n*Key Points:*\n");
    for point in summary.key_points.iter().take(MAX_KEY_POINTS) {
        let _ = writeln!(msg, "\\- {}", escape_markdown(point));
    }

    let _ = writeln!(
        msg,
        "\n*Market Sentiment:* {}",
        escape_markdown(&summary.sentiment)
    );

    if !summary.potentially_impacted_stocks.is_empty() {
        msg.push_str("\n*📈 Potentially Impacted Stocks:*\n");
        for stock in &summary.potentially_impacted_stocks {
            let _ = writeln!(
                msg,
                "{} *{}* \\({}\\)",
                impact_emoji(stock.impact()),
                escape_markdown(&stock.ticker),
                escape_markdown(&stock.company_name)
            );
            let _ = writeln!(
                msg,
                "   • Impact: {} \\({}\\)",
                escape_markdown(&title_case(&stock.impact_type)),
                escape_markdown(&stock.expected_magnitude)
            );
            let _ = writeln!(msg, "   • Reason: {}", escape_markdown(&stock.impact_reason));
            let _ = writeln!(
                msg,
                "   • Confidence: {} {}\n",
                confidence_emoji(stock.confidence()),
                escape_markdown(&title_case(&stock.confidence_level))
            );
        }
    }

    if !summary.market_sectors.is_empty() {
        msg.push_str("\n*🏭 Affected Sectors:*\n");
        for sector in &summary.market_sectors {
            let _ = writeln!(
                msg,
                "{} *{}* \\({}\\)",
                impact_emoji(sector.impact()),
                escape_markdown(&sector.sector_name),
                escape_markdown(&title_case(&sector.impact_type))
            );
            let _ = writeln!(msg, "   • Impact: {}", escape_markdown(&sector.impact_reason));
            if !sector.key_companies.is_empty() {
                let _ = writeln!(
                    msg,
                    "   • Key Companies: {}",
                    escape_markdown(&sector.key_companies.join(", "))
                );
            }
            msg.push('\n');
        }
    }

    if !summary.market_implications.trim().is_empty() {
        let _ = writeln!(
            msg,
            "\n*💡 Market Implications:*\n{}",
            escape_markdown(&summary.market_implications)
        );
    }

    let _ = write!(
        msg,
        "\nGenerated at {}",
        escape_markdown(&generated_at.format(TIMESTAMP_FORMAT).to_string())
    );
    msg
}

fn format_welcome(name: &str, interval_minutes: u64) -> String {
    let body = format!(
        "👋 Welcome {name}! You're now subscribed to financial news summaries.\n\n\
         The bot will send you regular summaries of financial news with:\n\
         • Comprehensive market analysis and key developments\n\
         • Detailed stock impact analysis with reasoning\n\
         • Market sentiment and sector analysis\n\
         • Confidence levels and expected impact magnitude\n\
         • Actionable market implications\n"
    );
    format!(
        "{}\n*Available commands:*\n{}\n\n{}",
        escape_markdown(&body),
        command_list(),
        escape_markdown(&format!(
            "You will receive summaries automatically {}.",
            describe_interval(interval_minutes)
        ))
    )
}

fn format_help(interval_minutes: u64) -> String {
    let about = format!(
        "This bot monitors a financial news channel and provides detailed summaries {}, including:\n\
         • Comprehensive market analysis\n\
         • Detailed stock impact analysis with reasoning\n\
         • Confidence levels and expected impact magnitude\n\
         • Sector-wide implications\n\
         • Actionable market insights",
        describe_interval(interval_minutes)
    );
    format!(
        "📈 *Financial News Bot \\- Commands*\n\n{}\n\n{}",
        command_list(),
        escape_markdown(&about)
    )
}

fn format_status(status: &StatusNotice) -> String {
    format!(
        "🤖 *Bot Status*\n\
         \\- Active: ✅\n\
         \\- Subscribers: `{}`\n\
         \\- Last check: {}\n\
         \\- Target channel: {}",
        status.subscribers,
        escape_markdown(&status.last_check.format(TIMESTAMP_FORMAT).to_string()),
        escape_markdown(&status.channel)
    )
}

fn progress_text(progress: Progress) -> &'static str {
    match progress {
        Progress::GeneratingTest => "Fetching latest news and generating a test summary...",
        Progress::ForcingUpdate => "Forcing an immediate update to all subscribers...",
        Progress::TestingDelivery => {
            "Now testing automatic delivery method, check for another message..."
        }
        Progress::DeliveryConfirmed => {
            "✅ Automatic delivery test successful! You should have received another copy."
        }
        Progress::ForceUpdateSent => "✅ Force update sent successfully to subscribers!",
        Progress::NoPosts => "No messages found to summarize.",
        Progress::SummaryFailed => "Error generating summary.",
        Progress::FetchFailed => "Could not reach the news channel. Please try again later.",
    }
}

/// Escaped `/command - description` lines for every command.
fn command_list() -> String {
    UserCommand::ALL
        .iter()
        .map(|c| escape_markdown(&format!("/{} - {}", c.name(), c.description())))
        .collect::<Vec<_>>()
        .join("\n")
}

/// "every 3 hours", "every 90 minutes", "every minute".
fn describe_interval(minutes: u64) -> String {
    match minutes {
        1 => "every minute".to_string(),
        60 => "every hour".to_string(),
        m if m % 60 == 0 => format!("every {} hours", m / 60),
        m => format!("every {m} minutes"),
    }
}

const fn impact_emoji(impact: Impact) -> &'static str {
    match impact {
        Impact::Positive => "🟢",
        Impact::Negative => "🔴",
        Impact::Neutral => "🟡",
    }
}

const fn confidence_emoji(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "🟢",
        Confidence::Medium => "🟡",
        Confidence::Low => "🔴",
    }
}

/// Capitalize the first letter of every word and lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut start_of_word = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if start_of_word {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            start_of_word = false;
        } else {
            result.push(c);
            start_of_word = true;
        }
    }
    result
}

/// Escape special characters for Telegram `MarkdownV2`.
pub fn escape_markdown(text: &str) -> String {
    let special_chars = [
        '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.',
        '!',
    ];
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SectorImpact, StockImpact};
    use crate::port::outbound::messenger::SummaryNotice;
    use chrono::TimeZone;

    fn at() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 14, 9, 30, 5)
            .unwrap()
    }

    fn sample() -> Summary {
        Summary {
            summary: "Oil rallies 3.5% after OPEC+ cut.".to_string(),
            potentially_impacted_stocks: vec![
                StockImpact {
                    ticker: "XOM".to_string(),
                    company_name: "Exxon Mobil".to_string(),
                    impact_type: "positive".to_string(),
                    impact_reason: "Higher crude prices".to_string(),
                    confidence_level: "high".to_string(),
                    expected_magnitude: "moderate".to_string(),
                },
                StockImpact {
                    ticker: "DAL".to_string(),
                    company_name: "Delta Air Lines".to_string(),
                    impact_type: "negative".to_string(),
                    impact_reason: "Fuel costs".to_string(),
                    confidence_level: "medium".to_string(),
                    expected_magnitude: "minimal".to_string(),
                },
                StockImpact {
                    ticker: "SPY".to_string(),
                    impact_type: "mixed".to_string(),
                    confidence_level: "unsure".to_string(),
                    ..StockImpact::default()
                },
            ],
            market_sectors: vec![SectorImpact {
                sector_name: "Energy".to_string(),
                impact_type: "positive".to_string(),
                impact_reason: "Supply tightening".to_string(),
                key_companies: vec!["XOM".to_string(), "CVX".to_string()],
            }],
            sentiment: "bullish".to_string(),
            key_points: vec![
                "one".to_string(),
                "two".to_string(),
                "three".to_string(),
                "four".to_string(),
            ],
            market_implications: "Energy may outperform.".to_string(),
        }
    }

    #[test]
    fn summary_layout() {
        let msg = format_summary(&sample(), &at());

        assert!(msg.starts_with("📊 *Financial News Summary*\n\n"));
        assert!(msg.contains("Oil rallies 3\\.5% after OPEC\\+ cut\\."));
        assert!(msg.contains("*Key Points:*\n\\- one\n\\- two\n\\- three\n"));
        assert!(!msg.contains("four"));
        assert!(msg.contains("*Market Sentiment:* bullish"));
        assert!(msg.contains("*💡 Market Implications:*\nEnergy may outperform\\."));
        assert!(msg.ends_with("Generated at 2026\\-03\\-14 09:30:05"));
    }

    #[test]
    fn stock_emoji_mapping() {
        let msg = format_summary(&sample(), &at());

        assert!(msg.contains("🟢 *XOM* \\(Exxon Mobil\\)"));
        assert!(msg.contains("   • Impact: Positive \\(moderate\\)"));
        assert!(msg.contains("   • Confidence: 🟢 High"));
        assert!(msg.contains("🔴 *DAL* \\(Delta Air Lines\\)"));
        assert!(msg.contains("   • Confidence: 🟡 Medium"));
        assert!(msg.contains("🟡 *SPY*"));
        assert!(msg.contains("   • Confidence: 🔴 Unsure"));
    }

    #[test]
    fn sector_block_lists_key_companies() {
        let msg = format_summary(&sample(), &at());
        assert!(msg.contains("*🏭 Affected Sectors:*\n🟢 *Energy* \\(Positive\\)"));
        assert!(msg.contains("   • Key Companies: XOM, CVX"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let summary = Summary {
            summary: "Quiet day".to_string(),
            sentiment: "neutral".to_string(),
            ..Summary::default()
        };
        let msg = format_summary(&summary, &at());

        assert!(!msg.contains("Potentially Impacted Stocks"));
        assert!(!msg.contains("Affected Sectors"));
        assert!(!msg.contains("Market Implications"));
        assert!(msg.contains("*Key Points:*"));
    }

    #[test]
    fn summary_notice_uses_summary_layout() {
        let notice = Notice::Summary(SummaryNotice {
            summary: sample(),
            generated_at: at(),
        });
        assert_eq!(format_notice(&notice), format_summary(&sample(), &at()));
    }

    #[test]
    fn help_lists_every_command() {
        let msg = format_notice(&Notice::Help {
            interval_minutes: 180,
        });
        for command in UserCommand::ALL {
            assert!(msg.contains(&escape_markdown(&format!("/{}", command.name()))));
        }
        assert!(msg.contains("every 3 hours"));
    }

    #[test]
    fn welcome_greets_by_name() {
        let msg = format_notice(&Notice::Welcome {
            name: "Ada".to_string(),
            interval_minutes: 5,
        });
        assert!(msg.starts_with("👋 Welcome Ada\\!"));
        assert!(msg.contains("every 5 minutes"));
        assert!(msg.contains("/force\\_update"));
    }

    #[test]
    fn status_reports_count_and_channel() {
        let msg = format_notice(&Notice::Status(StatusNotice {
            subscribers: 42,
            last_check: at(),
            channel: "market_feed".to_string(),
        }));
        assert!(msg.contains("Subscribers: `42`"));
        assert!(msg.contains("Last check: 2026\\-03\\-14 09:30:05"));
        assert!(msg.contains("Target channel: market\\_feed"));
    }

    #[test]
    fn invalid_command_includes_help() {
        let msg = format_notice(&Notice::InvalidCommand {
            reason: "unknown command `/foo`".to_string(),
        });
        assert!(msg.contains("Invalid command: unknown command `/foo`".replace('`', "\\`").as_str()));
        assert!(msg.contains("/start"));
    }

    #[test]
    fn progress_text_is_escaped() {
        let msg = format_notice(&Notice::Progress(Progress::NoPosts));
        assert_eq!(msg, "No messages found to summarize\\.");
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("hello"), "hello");
        assert_eq!(escape_markdown("hello_world"), "hello\\_world");
        assert_eq!(escape_markdown("*bold*"), "\\*bold\\*");
        assert_eq!(escape_markdown("test.com"), "test\\.com");
        assert_eq!(escape_markdown("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("positive"), "Positive");
        assert_eq!(title_case("HIGH"), "High");
        assert_eq!(title_case("very strong-ish"), "Very Strong-Ish");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_describe_interval() {
        assert_eq!(describe_interval(180), "every 3 hours");
        assert_eq!(describe_interval(60), "every hour");
        assert_eq!(describe_interval(90), "every 90 minutes");
        assert_eq!(describe_interval(1), "every minute");
    }
}
