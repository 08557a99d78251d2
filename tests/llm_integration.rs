//! Integration tests for the OpenAI adapter.
//!
//! These tests require a real API key and network access to run.
//!
//! # Running Integration Tests
//!
//! Integration tests are gated behind the `integration-tests` feature flag
//! and are marked with `#[ignore]` to prevent accidental execution.
//!
//! ```bash
//! export OPENAI_API_KEY="your-openai-api-key"
//! cargo test --features integration-tests -- --ignored
//! ```
//!
//! # Cost Considerations
//!
//! These tests make real API calls that incur small charges. Prompts are
//! kept short and the default model is used.

#![cfg(feature = "integration-tests")]

use std::sync::Arc;
use std::time::Duration;

use marketpulse::adapter::outbound::llm::OpenAi;
use marketpulse::application::summary::Summarizer;
use marketpulse::infrastructure::config::llm::LlmConfig;
use marketpulse::port::outbound::llm::{Completion, Llm};
use marketpulse::testkit::domain;

/// Client built from `OPENAI_API_KEY`, or `None` when it is unset.
fn create_client() -> Option<OpenAi> {
    let Ok(key) = std::env::var("OPENAI_API_KEY") else {
        eprintln!("Skipping OpenAI test: OPENAI_API_KEY not set");
        return None;
    };
    match OpenAi::new(key, &LlmConfig::default()) {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping OpenAI test: {e}");
            None
        }
    }
}

#[tokio::test]
#[ignore = "requires OPENAI_API_KEY and network access"]
async fn openai_basic_completion() {
    let Some(client) = create_client() else {
        return;
    };

    let completion = Completion::new("You are a terse assistant.", "Respond with exactly: PONG");
    let result = tokio::time::timeout(Duration::from_secs(30), client.complete(&completion))
        .await
        .expect("Request timed out")
        .expect("API call failed");

    assert!(result.contains("PONG"), "Expected 'PONG' in response: {result}");
}

#[tokio::test]
#[ignore = "requires OPENAI_API_KEY and network access"]
async fn openai_json_mode_returns_object() {
    let Some(client) = create_client() else {
        return;
    };

    let completion = Completion::new(
        "Answer in JSON.",
        r#"Output exactly this JSON object: {"status":"success","value":123}"#,
    )
    .json();
    let result = tokio::time::timeout(Duration::from_secs(30), client.complete(&completion))
        .await
        .expect("Request timed out")
        .expect("API call failed");

    let json: serde_json::Value =
        serde_json::from_str(&result).unwrap_or_else(|_| panic!("Expected JSON, got: {result}"));
    assert_eq!(json["status"], "success");
    assert_eq!(json["value"], 123);
}

#[tokio::test]
#[ignore = "requires OPENAI_API_KEY and network access"]
async fn openai_summarizes_posts() {
    let Some(client) = create_client() else {
        return;
    };

    let summarizer = Summarizer::new(Arc::new(client), 4000);
    let posts = domain::posts(
        3,
        &[
            "US CPI rose 0.2% month over month, below the 0.3% consensus.",
            "Treasury yields fell sharply after the inflation print.",
            "Nvidia shares gained 4% in premarket trading.",
        ],
    );

    let summary = tokio::time::timeout(Duration::from_secs(60), summarizer.summarize(&posts))
        .await
        .expect("Request timed out")
        .expect("posts were not empty");

    assert!(!summary.summary.is_empty());
    assert_ne!(summary.summary, "Error generating summary");
    assert!(!summary.key_points.is_empty());
}

#[tokio::test]
#[ignore = "network access"]
async fn openai_rejects_invalid_key() {
    let client = OpenAi::new("sk-invalid", &LlmConfig::default()).expect("client");
    let completion = Completion::new("system", "hello");

    let result = tokio::time::timeout(Duration::from_secs(30), client.complete(&completion))
        .await
        .expect("Request timed out");
    assert!(result.is_err(), "Expected an error for an invalid key");
}
