//! Summarization of channel posts through the generative model.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::{ChannelPost, Summary};
use crate::port::outbound::llm::{Completion, Llm};

/// Separator placed between posts in the prompt.
pub const POST_SEPARATOR: &str = "\n\n---\n\n";

/// Marker appended to input cut at the character budget.
pub const TRUNCATION_MARKER: &str = "...(truncated)";

/// Instruction sent as the system message.
pub const SYSTEM_PROMPT: &str = r#"You are an expert financial analyst specializing in market impact analysis. Your task is to analyze financial news updates and provide detailed insights on potentially impacted stocks and market sectors.

For each news item, you should:
1. Identify specific stock tickers that will be directly impacted
2. Explain WHY each stock will be impacted (positive or negative)
3. Assess the confidence level of your prediction
4. Identify broader market sectors that may be affected
5. Provide actionable insights for investors

When analyzing stocks, consider:
- Direct mentions of companies in the news
- Companies in related industries or supply chains
- Competitors that might benefit or suffer
- Regulatory impacts on specific sectors
- Market sentiment shifts that could affect similar companies

Format your response as a valid JSON object with the following structure exactly:
{
    "summary": "Comprehensive 3-4 sentence summary of key market developments and their implications",
    "potentially_impacted_stocks": [
        {
            "ticker": "TICKER1",
            "company_name": "Full Company Name",
            "impact_type": "positive/negative/neutral",
            "impact_reason": "Detailed explanation of why this stock will be impacted",
            "confidence_level": "high/medium/low",
            "expected_magnitude": "significant/moderate/minimal"
        }
    ],
    "market_sectors": [
        {
            "sector_name": "Sector Name",
            "impact_type": "positive/negative/neutral",
            "impact_reason": "Explanation of sector-wide impact",
            "key_companies": ["TICKER1", "TICKER2"]
        }
    ],
    "sentiment": "bullish/bearish/neutral",
    "key_points": [
        "Point 1 with specific details",
        "Point 2 with specific details",
        "Point 3 with specific details"
    ],
    "market_implications": "2-3 sentences on broader market implications and potential trading opportunities"
}

Make sure your response can be parsed as valid JSON. Be specific and detailed in your analysis."#;

/// Turns channel posts into a structured [`Summary`].
pub struct Summarizer {
    llm: Arc<dyn Llm>,
    max_input_chars: usize,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn Llm>, max_input_chars: usize) -> Self {
        Self {
            llm,
            max_input_chars,
        }
    }

    /// Summarize posts.
    ///
    /// Returns `None` only when there is nothing to summarize. Model failures
    /// and malformed replies degrade to fallback summaries.
    pub async fn summarize(&self, posts: &[ChannelPost]) -> Option<Summary> {
        if posts.is_empty() {
            warn!("No posts to summarize");
            return None;
        }

        let (combined, truncated) = compile(posts, self.max_input_chars);
        if truncated {
            warn!(
                max_chars = self.max_input_chars,
                "Post text truncated to fit the model input budget"
            );
        }

        let completion =
            Completion::new(SYSTEM_PROMPT, format!("News updates to analyze:\n{combined}")).json();

        info!(
            provider = self.llm.name(),
            posts = posts.len(),
            "Requesting summary"
        );

        let summary = match self.llm.complete(&completion).await {
            Ok(reply) => {
                debug!(reply = %reply, "Raw model reply");
                match Summary::from_json(&reply) {
                    Ok(summary) => summary,
                    Err(e) => {
                        warn!(error = %e, "Model reply is not valid summary JSON");
                        Summary::unparsed(&reply)
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "Summarization request failed");
                Summary::failed()
            }
        };
        Some(summary)
    }
}

/// Join post texts and cut the result at `max_chars` characters.
///
/// Returns the prompt text and whether it was truncated.
#[must_use]
pub fn compile(posts: &[ChannelPost], max_chars: usize) -> (String, bool) {
    let combined = posts
        .iter()
        .map(|post| post.text.as_str())
        .collect::<Vec<_>>()
        .join(POST_SEPARATOR);

    match combined.char_indices().nth(max_chars) {
        Some((cut, _)) => (format!("{}{TRUNCATION_MARKER}", &combined[..cut]), true),
        None => (combined, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::ScriptedLlm;
    use chrono::Utc;

    fn posts(texts: &[&str]) -> Vec<ChannelPost> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| ChannelPost::new(i as i32 + 1, Utc::now(), *text))
            .collect()
    }

    #[test]
    fn compile_joins_with_separator() {
        let (text, truncated) = compile(&posts(&["Fed holds", "Oil up"]), 15_000);
        assert_eq!(text, "Fed holds\n\n---\n\nOil up");
        assert!(!truncated);
    }

    #[test]
    fn compile_truncates_on_char_boundary() {
        let long = "é".repeat(20);
        let (text, truncated) = compile(&posts(&[&long]), 10);
        assert!(truncated);
        assert_eq!(text, format!("{}...(truncated)", "é".repeat(10)));
    }

    #[test]
    fn compile_at_exact_budget_is_untouched() {
        let exact = "x".repeat(10);
        let (text, truncated) = compile(&posts(&[&exact]), 10);
        assert_eq!(text, exact);
        assert!(!truncated);
    }

    #[tokio::test]
    async fn empty_input_yields_none() {
        let llm = Arc::new(ScriptedLlm::new("{}"));
        let summarizer = Summarizer::new(llm.clone(), 15_000);
        assert!(summarizer.summarize(&[]).await.is_none());
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn request_carries_prompt_and_json_mode() {
        let llm = Arc::new(ScriptedLlm::new(r#"{"summary": "ok"}"#));
        let summarizer = Summarizer::new(llm.clone(), 15_000);
        summarizer.summarize(&posts(&["Fed holds"])).await.unwrap();

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system, SYSTEM_PROMPT);
        assert_eq!(requests[0].user, "News updates to analyze:\nFed holds");
        assert!(requests[0].json);
    }

    #[tokio::test]
    async fn valid_reply_is_parsed() {
        let llm = Arc::new(ScriptedLlm::new(
            r#"{"summary": "Stocks rose.", "sentiment": "bullish", "key_points": ["a"]}"#,
        ));
        let summary = Summarizer::new(llm, 15_000)
            .summarize(&posts(&["Stocks rose"]))
            .await
            .unwrap();
        assert_eq!(summary.summary, "Stocks rose.");
        assert_eq!(summary.sentiment, "bullish");
    }

    #[tokio::test]
    async fn malformed_reply_falls_back() {
        let llm = Arc::new(ScriptedLlm::new("Markets were mixed."));
        let summary = Summarizer::new(llm, 15_000)
            .summarize(&posts(&["news"]))
            .await
            .unwrap();
        assert_eq!(
            summary.summary,
            "Summary could not be generated in the correct format. Here's the raw output: Markets were mixed...."
        );
        assert_eq!(summary.key_points, vec!["Error: Unable to parse structured data"]);
        assert_eq!(summary.sentiment, "neutral");
    }

    #[tokio::test]
    async fn api_error_falls_back() {
        let llm = Arc::new(ScriptedLlm::failing());
        let summary = Summarizer::new(llm, 15_000)
            .summarize(&posts(&["news"]))
            .await
            .unwrap();
        assert_eq!(summary, Summary::failed());
    }
}
