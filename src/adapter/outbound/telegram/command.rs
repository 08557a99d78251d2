//! Telegram command parsing.

use crate::port::inbound::command::UserCommand;

/// Parse error for Telegram command messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    NotACommand,
    UnknownCommand(String),
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotACommand => write!(f, "message is not a command"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command `{cmd}`"),
        }
    }
}

impl std::error::Error for CommandParseError {}

/// Parse a Telegram message into a bot command.
///
/// Accepts an `@botname` suffix on the command word and ignores any
/// trailing arguments.
pub fn parse_command(text: &str) -> Result<UserCommand, CommandParseError> {
    let Some(raw_command) = text.split_whitespace().next() else {
        return Err(CommandParseError::NotACommand);
    };
    let Some(raw_command) = raw_command.strip_prefix('/') else {
        return Err(CommandParseError::NotACommand);
    };

    let command = raw_command
        .split_once('@')
        .map_or(raw_command, |(head, _)| head);

    UserCommand::ALL
        .into_iter()
        .find(|c| c.name() == command)
        .ok_or_else(|| CommandParseError::UnknownCommand(format!("/{command}")))
}

/// Bot commands for Telegram menu registration.
///
/// Returns tuples of (command, description) for `set_my_commands`.
#[must_use]
pub fn bot_commands() -> Vec<(&'static str, &'static str)> {
    UserCommand::ALL
        .iter()
        .map(|c| (c.name(), c.description()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_commands() {
        assert_eq!(parse_command("/start").unwrap(), UserCommand::Start);
        assert_eq!(parse_command("/stop").unwrap(), UserCommand::Stop);
        assert_eq!(parse_command("/help").unwrap(), UserCommand::Help);
        assert_eq!(parse_command("/status").unwrap(), UserCommand::Status);
        assert_eq!(parse_command("/test").unwrap(), UserCommand::Test);
        assert_eq!(
            parse_command("/subscribe_me").unwrap(),
            UserCommand::SubscribeMe
        );
        assert_eq!(
            parse_command("/force_update").unwrap(),
            UserCommand::ForceUpdate
        );
    }

    #[test]
    fn parse_command_with_bot_mention() {
        assert_eq!(
            parse_command("/status@marketpulse_bot").unwrap(),
            UserCommand::Status
        );
        assert_eq!(
            parse_command("/force_update@marketpulse_bot now").unwrap(),
            UserCommand::ForceUpdate
        );
    }

    #[test]
    fn surrounding_whitespace_and_arguments_are_ignored() {
        assert_eq!(parse_command("  /help  ").unwrap(), UserCommand::Help);
        assert_eq!(parse_command("/start please").unwrap(), UserCommand::Start);
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(
            parse_command("hello there"),
            Err(CommandParseError::NotACommand)
        );
        assert_eq!(parse_command(""), Err(CommandParseError::NotACommand));
        assert_eq!(parse_command("   "), Err(CommandParseError::NotACommand));
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(
            parse_command("/pause"),
            Err(CommandParseError::UnknownCommand("/pause".to_string()))
        );
        assert_eq!(
            parse_command("/Start"),
            Err(CommandParseError::UnknownCommand("/Start".to_string()))
        );
        assert_eq!(
            parse_command("/foo@marketpulse_bot")
                .unwrap_err()
                .to_string(),
            "unknown command `/foo`"
        );
    }

    #[test]
    fn prefixes_do_not_match_longer_commands() {
        assert!(parse_command("/testing").is_err());
        assert!(parse_command("/stopped").is_err());
    }

    #[test]
    fn bot_commands_cover_every_command() {
        let commands = bot_commands();
        assert_eq!(commands.len(), UserCommand::ALL.len());
        assert!(commands.iter().any(|(name, _)| *name == "force_update"));
        assert!(commands.iter().all(|(_, desc)| !desc.is_empty()));
    }
}
