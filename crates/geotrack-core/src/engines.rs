//! Static display lookups: engine names and colors, sentiment colors and the
//! competitor palette.

use crate::Sentiment;

const ENGINE_DISPLAY: &[(&str, &str)] = &[
    ("openai", "ChatGPT (GPT-5.2)"),
    ("gemini", "Gemini (3 Flash)"),
    ("perplexity", "Perplexity (Sonar)"),
];

const ENGINE_COLORS: &[(&str, &str)] = &[
    ("openai", "#10A37F"),
    ("gemini", "#4285F4"),
    ("perplexity", "#20808D"),
];

const FALLBACK_COLOR: &str = "#6B7280";

/// Series colors for competitor charts, cycled by rank.
pub const BRAND_PALETTE: [&str; 10] = [
    "#2563EB", "#DC2626", "#059669", "#D97706", "#7C3AED", "#DB2777", "#0891B2", "#65A30D",
    "#EA580C", "#4F46E5",
];

/// Human-readable engine name; unknown providers display as their raw id.
#[must_use]
pub fn engine_display_name(provider: &str) -> &str {
    ENGINE_DISPLAY
        .iter()
        .find(|(id, _)| *id == provider)
        .map_or(provider, |(_, name)| *name)
}

#[must_use]
pub fn engine_color(provider: &str) -> &'static str {
    ENGINE_COLORS
        .iter()
        .find(|(id, _)| *id == provider)
        .map_or(FALLBACK_COLOR, |(_, color)| *color)
}

#[must_use]
pub fn sentiment_color(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "#22C55E",
        Sentiment::Neutral => FALLBACK_COLOR,
        Sentiment::Negative => "#EF4444",
        Sentiment::Mixed => "#F59E0B",
    }
}
