//! Token pricing per model, in USD per million tokens.

/// Input/output prices for one model, USD per 1M tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input: f64,
    pub output: f64,
}

impl ModelPricing {
    pub const FREE: ModelPricing = ModelPricing {
        input: 0.0,
        output: 0.0,
    };

    /// Token cost for the given totals, unrounded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn token_cost(self, input_tokens: i64, output_tokens: i64) -> (f64, f64) {
        (
            input_tokens as f64 / 1_000_000.0 * self.input,
            output_tokens as f64 / 1_000_000.0 * self.output,
        )
    }
}

// Feb 2026 list prices.
const PRICING: &[(&str, ModelPricing)] = &[
    ("gpt-5", ModelPricing { input: 2.0, output: 8.0 }),
    ("gpt-4o", ModelPricing { input: 2.5, output: 10.0 }),
    ("gpt-4o-mini", ModelPricing { input: 0.15, output: 0.6 }),
    ("gemini-3-flash-preview", ModelPricing { input: 0.1, output: 0.4 }),
    ("gemini-2.0-flash", ModelPricing { input: 0.1, output: 0.4 }),
    ("sonar", ModelPricing { input: 1.0, output: 1.0 }),
    ("sonar-pro", ModelPricing { input: 3.0, output: 15.0 }),
];

// Flat per-request fees, USD.
const REQUEST_FEES: &[(&str, f64)] = &[("sonar", 5.0 / 1000.0), ("sonar-pro", 5.0 / 1000.0)];

/// Model used for brand and sentiment extraction.
pub const EXTRACTION_MODEL: &str = "gpt-4o-mini";
/// Provider label of the synthesized extraction cost entry.
pub const EXTRACTION_PROVIDER: &str = "extraction";
/// Estimated extraction workload per analysed response.
pub const EXTRACTION_INPUT_TOKENS: i64 = 500;
pub const EXTRACTION_OUTPUT_TOKENS: i64 = 200;

/// Pricing for `model`; unknown models are free.
#[must_use]
pub fn model_pricing(model: &str) -> ModelPricing {
    PRICING
        .iter()
        .find(|(id, _)| *id == model)
        .map_or(ModelPricing::FREE, |(_, p)| *p)
}

/// Flat per-request fee for `model`, `0` when the model has none.
#[must_use]
pub fn request_fee(model: &str) -> f64 {
    REQUEST_FEES
        .iter()
        .find(|(id, _)| *id == model)
        .map_or(0.0, |(_, fee)| *fee)
}
