//! Interactive session generation for the channel reader.

use async_trait::async_trait;

use super::source::ConfigSource;
use crate::error::Result;

/// Answers the operator gives during login.
///
/// Implemented by the CLI with terminal prompts.
pub trait LoginPrompt: Send + Sync {
    /// Phone number of the account, when `TELEGRAM_PHONE` is not set.
    fn phone(&self) -> Result<String>;

    /// Login code sent by Telegram.
    fn code(&self) -> Result<String>;

    /// Two-factor password; `hint` is the account's password hint.
    fn password(&self, hint: Option<&str>) -> Result<String>;
}

/// Session generation use-cases.
#[async_trait]
pub trait SessionOperator: Send + Sync {
    /// Log in interactively and return the encoded session string.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or Telegram rejects the
    /// login.
    async fn create_session(&self, source: &ConfigSource, prompt: &dyn LoginPrompt)
        -> Result<String>;
}
