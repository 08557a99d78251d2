//! Handler for the `session` command.

use dialoguer::{Input, Password};

use crate::adapter::inbound::cli::command::SourceArgs;
use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;
use crate::port::inbound::operator::session::LoginPrompt;

/// Terminal prompts for the login flow.
struct TerminalPrompt;

impl LoginPrompt for TerminalPrompt {
    fn phone(&self) -> Result<String> {
        Ok(Input::<String>::new()
            .with_prompt("Phone number (international format)")
            .interact_text()?)
    }

    fn code(&self) -> Result<String> {
        Ok(Input::<String>::new()
            .with_prompt("Login code")
            .interact_text()?)
    }

    fn password(&self, hint: Option<&str>) -> Result<String> {
        let prompt = match hint {
            Some(hint) if !hint.is_empty() => format!("Two-step password (hint: {hint})"),
            _ => "Two-step password".to_string(),
        };
        Ok(Password::new().with_prompt(prompt).interact()?)
    }
}

/// Log in interactively and print the session string.
pub async fn execute(args: &SourceArgs) -> Result<()> {
    output::section("Telegram Session");
    output::hint("a login code will be sent to your Telegram app");

    let session = operator::operator()
        .create_session(&operator::source(args), &TerminalPrompt)
        .await?;

    output::success("Logged in");
    output::section("Session string");
    println!("{session}");
    println!();
    output::hint("store it as TELEGRAM_SESSION_STRING in the environment file and keep it secret");
    Ok(())
}
