//! OpenAI LLM client.
//!
//! Provides an implementation of the [`Llm`] trait for the OpenAI
//! Chat Completions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::infrastructure::config::llm::LlmConfig;
use crate::port::outbound::llm::{Completion, Llm};

/// OpenAI Chat Completions API endpoint.
const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI API client.
#[derive(Debug)]
pub struct OpenAi {
    client: Client,
    api_key: String,
    url: String,
    /// Model identifier (e.g., "gpt-4o-mini").
    model: String,
    max_tokens: usize,
    /// Sampling temperature (0.0 to 2.0).
    temperature: f64,
}

impl OpenAi {
    /// Create a new OpenAI client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            url: API_URL.to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Point the client at another compatible endpoint.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    fn request(&self, completion: &Completion) -> Request {
        Request {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![
                Message {
                    role: "system",
                    content: completion.system.clone(),
                },
                Message {
                    role: "user",
                    content: completion.user.clone(),
                },
            ],
            response_format: completion.json.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }
}

#[derive(Serialize)]
struct Request {
    model: String,
    max_tokens: usize,
    temperature: f64,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct Response {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl Response {
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default()
    }
}

#[async_trait]
impl Llm for OpenAi {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, completion: &Completion) -> Result<String> {
        let request = self.request(completion);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Connection(e.to_string()))?
            .json::<Response>()
            .await?;

        Ok(response.into_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAi {
        OpenAi::new("test-api-key", &LlmConfig::default()).unwrap()
    }

    #[test]
    fn request_carries_system_and_user_messages() {
        let completion = Completion::new("You are an analyst.", "Oil fell 3%.").json();
        let json = serde_json::to_value(client().request(&completion)).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["temperature"], 0.2);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "You are an analyst.");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Oil fell 3%.");
        assert_eq!(json["response_format"]["type"], "json_object");
    }

    #[test]
    fn plain_request_omits_response_format() {
        let completion = Completion::new("system", "user");
        let json = serde_json::to_value(client().request(&completion)).unwrap();
        assert!(json.get("response_format").is_none());
    }

    #[test]
    fn response_text_is_first_choice() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "{\"summary\": \"ok\"}"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "second"}, "finish_reason": "stop"}
            ]
        }"#;

        let response: Response = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_text(), r#"{"summary": "ok"}"#);
    }

    #[test]
    fn empty_or_null_content_yields_empty_text() {
        let response: Response = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(response.into_text(), "");

        let response: Response = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text(), "");
    }

    #[test]
    fn malformed_response_is_rejected() {
        let result: std::result::Result<Response, _> =
            serde_json::from_str(r#"{"choices": "not an array"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn client_uses_configured_model() {
        let config = LlmConfig {
            model: "gpt-4o".to_string(),
            ..LlmConfig::default()
        };
        let client = OpenAi::new("key", &config).unwrap().with_url("http://127.0.0.1:9/v1");
        assert_eq!(client.model, "gpt-4o");
        assert_eq!(client.url, "http://127.0.0.1:9/v1");
        assert_eq!(client.name(), "openai");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let client = client().with_url("http://127.0.0.1:9/v1/chat/completions");
        let result = client.complete(&Completion::new("s", "u")).await;
        assert!(result.is_err());
    }
}
