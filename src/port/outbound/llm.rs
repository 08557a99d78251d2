//! LLM completion port for summarization.
//!
//! Defines a generic interface for chat-style large language model requests.

use async_trait::async_trait;

use crate::error::Result;

/// A chat completion request with a system instruction and a user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Instruction framing the model's role and answer format.
    pub system: String,
    /// The content to work on.
    pub user: String,
    /// Ask the provider to constrain the answer to a JSON object.
    pub json: bool,
}

impl Completion {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            json: false,
        }
    }

    /// Request a JSON object answer.
    #[must_use]
    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }
}

/// Client for large language model text completion.
///
/// Implementations wrap specific LLM providers and handle authentication and
/// response parsing.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`): the monitor loop and
/// bot commands summarize concurrently.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Return the provider name for logging.
    fn name(&self) -> &'static str;

    /// Send a completion request and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response is invalid.
    async fn complete(&self, request: &Completion) -> Result<String>;
}
