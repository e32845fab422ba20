//! Shared configuration and reference data for the GEO tracker dashboard.

pub mod app_config;
pub mod config;
pub mod engines;
pub mod metrics;
pub mod pricing;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use engines::{engine_color, engine_display_name, sentiment_color, BRAND_PALETTE};
pub use metrics::{average, percent_one_decimal, percent_whole, round_to};
pub use pricing::{
    model_pricing, request_fee, ModelPricing, EXTRACTION_INPUT_TOKENS, EXTRACTION_MODEL,
    EXTRACTION_OUTPUT_TOKENS, EXTRACTION_PROVIDER,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Tone the extractor assigned to a single brand mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Mixed,
}

impl Sentiment {
    pub const ALL: [Sentiment; 4] = [
        Sentiment::Positive,
        Sentiment::Neutral,
        Sentiment::Negative,
        Sentiment::Mixed,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Mixed => "mixed",
        }
    }

    /// Parses a stored label, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_parse_is_case_insensitive() {
        assert_eq!(Sentiment::parse("Positive"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::parse(" mixed "), Some(Sentiment::Mixed));
        assert_eq!(Sentiment::parse("ecstatic"), None);
    }

    #[test]
    fn sentiment_serializes_lowercase() {
        let json = serde_json::to_string(&Sentiment::Negative).expect("serialize");
        assert_eq!(json, "\"negative\"");
    }
}
