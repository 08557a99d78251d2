//! Generative model configuration.
//!
//! The API key is read from `OPENAI_API_KEY` at runtime; the tuning values
//! below can be set under `[llm]` in the config file.

use serde::Deserialize;

/// OpenAI chat completion settings used for summarization.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Model identifier. Defaults to "gpt-4o-mini".
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature. Defaults to 0.2.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens in the response. Defaults to 1000.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Characters of joined channel text sent to the model before
    /// truncation. Defaults to 15000.
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// Request timeout in seconds. Defaults to 60.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

const fn default_temperature() -> f64 {
    0.2
}

const fn default_max_tokens() -> usize {
    1000
}

const fn default_max_input_chars() -> usize {
    15_000
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_input_chars: default_max_input_chars(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
