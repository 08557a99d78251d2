//! Structured market summary produced by the generative model.
//!
//! The model is asked to answer with a JSON object; every field defaults when
//! absent so a partially filled reply still yields a usable [`Summary`].
//! Categorical fields stay as the raw strings the model produced and are
//! classified on demand, so an unexpected label is shown verbatim instead of
//! failing the whole reply.

use serde::{Deserialize, Deserializer, Serialize};

/// Number of characters of a malformed reply kept in the fallback summary.
const RAW_EXCERPT_CHARS: usize = 500;

/// Market analysis for one batch of channel posts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Summary {
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub potentially_impacted_stocks: Vec<StockImpact>,
    #[serde(deserialize_with = "null_as_default")]
    pub market_sectors: Vec<SectorImpact>,
    #[serde(deserialize_with = "null_as_default")]
    pub sentiment: String,
    #[serde(deserialize_with = "null_as_default")]
    pub key_points: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub market_implications: String,
}

/// Expected impact on a single listed company.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StockImpact {
    #[serde(deserialize_with = "null_as_default")]
    pub ticker: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub impact_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub impact_reason: String,
    #[serde(deserialize_with = "null_as_default")]
    pub confidence_level: String,
    #[serde(deserialize_with = "null_as_default")]
    pub expected_magnitude: String,
}

/// Expected impact on a market sector.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorImpact {
    #[serde(deserialize_with = "null_as_default")]
    pub sector_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub impact_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub impact_reason: String,
    #[serde(deserialize_with = "null_as_default")]
    pub key_companies: Vec<String>,
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Direction of an expected price impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

impl Impact {
    /// Classify a model label; anything unrecognized is neutral.
    #[must_use]
    pub fn classify(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

/// Model confidence in a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Classify a model label; anything unrecognized is low.
    #[must_use]
    pub fn classify(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl StockImpact {
    #[must_use]
    pub fn impact(&self) -> Impact {
        Impact::classify(&self.impact_type)
    }

    #[must_use]
    pub fn confidence(&self) -> Confidence {
        Confidence::classify(&self.confidence_level)
    }
}

impl SectorImpact {
    #[must_use]
    pub fn impact(&self) -> Impact {
        Impact::classify(&self.impact_type)
    }
}

impl Summary {
    /// Parse a JSON reply from the model.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the reply is not an object of the
    /// expected shape.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let mut summary: Self = serde_json::from_str(raw)?;
        if summary.sentiment.trim().is_empty() {
            summary.sentiment = "neutral".to_string();
        }
        Ok(summary)
    }

    /// Summary used when the model answered with something other than JSON.
    #[must_use]
    pub fn unparsed(raw: &str) -> Self {
        let excerpt: String = raw.chars().take(RAW_EXCERPT_CHARS).collect();
        Self {
            summary: format!(
                "Summary could not be generated in the correct format. Here's the raw output: {excerpt}..."
            ),
            sentiment: "neutral".to_string(),
            key_points: vec!["Error: Unable to parse structured data".to_string()],
            ..Self::default()
        }
    }

    /// Summary used when the model could not be reached.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            summary: "Error generating summary".to_string(),
            sentiment: "neutral".to_string(),
            key_points: vec!["Failed to analyze news due to an error".to_string()],
            ..Self::default()
        }
    }
}
