//! Telegram Bot API delivery of notices.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::debug;

use crate::domain::UserId;
use crate::error::Result;
use crate::port::outbound::messenger::{Messenger, Notice};

use super::format::format_notice;

/// Bot API limit for a single message, in UTF-16 code units.
const MAX_MESSAGE_UNITS: usize = 4096;

/// Sends notices as `MarkdownV2` messages through a bot.
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Create a messenger for the given bot token.
    #[must_use]
    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(Bot::new(token))
    }

    #[must_use]
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(&self, recipient: UserId, notice: &Notice) -> Result<()> {
        let text = format_notice(notice);
        let chunks = split_message(&text, MAX_MESSAGE_UNITS);
        debug!(
            user_id = %recipient,
            chunks = chunks.len(),
            "Sending Telegram message"
        );

        for chunk in chunks {
            self.bot
                .send_message(ChatId(recipient.get()), chunk)
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
        }
        Ok(())
    }
}

/// Split a rendered message into chunks of at most `max_units` UTF-16
/// code units, the measure Telegram applies to message length.
///
/// Splits on line boundaries so inline markup, which never spans lines,
/// stays balanced. A single overlong line is cut between characters, never
/// directly after an escaping backslash.
pub fn split_message(text: &str, max_units: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = utf16_len(line);
        if current_len + line_len > max_units && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > max_units {
            let mut pieces = hard_split(line, max_units);
            if let Some(last) = pieces.pop() {
                chunks.extend(pieces);
                current_len = utf16_len(&last);
                current = last;
            }
            continue;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

fn hard_split(line: &str, max_units: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut pieces = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let mut end = start;
        let mut units = 0;
        while end < chars.len() && (end == start || units + chars[end].len_utf16() <= max_units) {
            units += chars[end].len_utf16();
            end += 1;
        }
        let trailing_escapes = chars[start..end]
            .iter()
            .rev()
            .take_while(|c| **c == '\\')
            .count();
        if end < chars.len() && trailing_escapes % 2 == 1 && end - start > 1 {
            end -= 1;
        }
        pieces.push(chars[start..end].iter().collect());
        start = end;
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_is_one_chunk() {
        assert_eq!(split_message("hello\nworld", 4096), vec!["hello\nworld"]);
    }

    #[test]
    fn splits_on_line_boundaries() {
        let text = "aaaa\nbbbb\ncccc\n";
        let chunks = split_message(text, 10);
        assert_eq!(chunks, vec!["aaaa\nbbbb\n", "cccc\n"]);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn overlong_line_is_cut() {
        let text = "x".repeat(25);
        let chunks = split_message(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn never_cuts_after_escape() {
        let text = format!("{}\\.rest", "a".repeat(9));
        let chunks = split_message(&text, 10);
        assert_eq!(chunks[0], "a".repeat(9));
        assert!(chunks[1].starts_with("\\."));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn bmp_characters_count_once() {
        let text = "é".repeat(8);
        assert_eq!(split_message(&text, 8).len(), 1);
    }

    #[test]
    fn emoji_count_as_two_units() {
        let text = "📊".repeat(8);
        let chunks = split_message(&text, 8);
        assert_eq!(chunks, vec!["📊".repeat(4), "📊".repeat(4)]);
        assert!(chunks.iter().all(|c| utf16_len(c) <= 8));
    }

    #[test]
    fn emoji_heavy_line_stays_under_limit() {
        let text = format!("{}\n", "📈 up ".repeat(1000));
        let chunks = split_message(&text, MAX_MESSAGE_UNITS);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| utf16_len(c) <= MAX_MESSAGE_UNITS));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn surrogate_pair_is_never_split() {
        let text = format!("a{}", "📊".repeat(3));
        let chunks = split_message(&text, 2);
        assert_eq!(chunks, vec!["a", "📊", "📊", "📊"]);
    }
}
