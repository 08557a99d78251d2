//! Telegram command listener.
//!
//! Long-polls the Bot API and hands every command to a
//! [`CommandHandler`]. Plain text is ignored.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{BotCommand, Chat, User};
use tracing::{error, info, warn};

use crate::domain::UserId;
use crate::port::inbound::command::{CommandHandler, CommandSender};

use super::command::{bot_commands, parse_command, CommandParseError};

/// Register commands and process incoming messages until Ctrl-C.
pub async fn listen(bot: Bot, handler: Arc<dyn CommandHandler>) {
    // Register commands with Telegram so they appear in the "/" menu
    if let Err(e) = register_bot_commands(&bot).await {
        warn!(error = %e, "Failed to register bot commands with Telegram");
    }

    info!("Telegram command listener started");

    teloxide::repl(bot, move |_bot: Bot, msg: Message| {
        let handler = Arc::clone(&handler);
        async move {
            if let Some(text) = msg.text() {
                let sender = sender_of(msg.from.as_ref(), &msg.chat);
                dispatch(handler.as_ref(), &sender, text).await;
            }
            respond(())
        }
    })
    .await;

    info!("Telegram command listener stopped");
}

/// Route one message text to the handler.
pub async fn dispatch(handler: &dyn CommandHandler, sender: &CommandSender, text: &str) {
    let result = match parse_command(text) {
        Ok(command) => {
            info!(
                user_id = %sender.user_id,
                username = sender.username.as_deref().unwrap_or("-"),
                command = command.name(),
                "Command received"
            );
            handler.handle(sender, command).await
        }
        Err(CommandParseError::NotACommand) => return,
        Err(err) => handler.reject(sender, &err.to_string()).await,
    };

    if let Err(e) = result {
        error!(user_id = %sender.user_id, error = %e, "Failed to answer Telegram command");
    }
}

/// The user who sent a message, replying in the chat it came from.
///
/// Channel posts carry no `from`; the chat stands in for the user then.
fn sender_of(from: Option<&User>, chat: &Chat) -> CommandSender {
    let reply_to = UserId::new(chat.id.0);
    match from.and_then(|user| Some((i64::try_from(user.id.0).ok()?, user))) {
        Some((id, user)) => CommandSender {
            user_id: UserId::new(id),
            reply_to,
            username: user.username.clone(),
            first_name: Some(user.first_name.clone()),
        },
        None => CommandSender {
            user_id: reply_to,
            reply_to,
            username: chat.username().map(str::to_string),
            first_name: chat.first_name().map(str::to_string),
        },
    }
}

/// Register bot commands with Telegram for the "/" menu.
async fn register_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = bot_commands()
        .into_iter()
        .map(|(cmd, desc)| BotCommand::new(cmd, desc))
        .collect();

    bot.set_my_commands(commands).await?;
    info!("Registered bot commands with Telegram");
    Ok(())
}
