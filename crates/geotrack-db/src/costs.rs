//! API spend per provider and model, plus the estimated extraction cost.

use geotrack_core::{
    model_pricing, request_fee, round_to, EXTRACTION_INPUT_TOKENS, EXTRACTION_MODEL,
    EXTRACTION_OUTPUT_TOKENS, EXTRACTION_PROVIDER,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::DbError;

/// Token usage of one (provider, model) pair within a run.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ModelUsage {
    pub provider: String,
    pub model: String,
    pub queries: i64,
    pub input_tokens: i64,
    pub output_tokens: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEntry {
    pub provider: String,
    pub model: String,
    pub queries: i64,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub input_cost: f64,
    pub output_cost: f64,
    pub request_cost: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    pub costs: Vec<CostEntry>,
    pub total: f64,
}

const COST_PLACES: i32 = 4;

impl CostEntry {
    fn priced(usage: ModelUsage) -> Self {
        let pricing = model_pricing(&usage.model);
        let (input_cost, output_cost) = pricing.token_cost(usage.input_tokens, usage.output_tokens);
        #[allow(clippy::cast_precision_loss)]
        let request_cost = usage.queries as f64 * request_fee(&usage.model);

        Self {
            provider: usage.provider,
            model: usage.model,
            queries: usage.queries,
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            input_cost: round_to(input_cost, COST_PLACES),
            output_cost: round_to(output_cost, COST_PLACES),
            request_cost: round_to(request_cost, COST_PLACES),
            total_cost: round_to(input_cost + output_cost + request_cost, COST_PLACES),
        }
    }

    /// Estimated brand/sentiment extraction spend for `responses` analysed responses.
    fn extraction(responses: i64) -> Self {
        let input_tokens = responses * EXTRACTION_INPUT_TOKENS;
        let output_tokens = responses * EXTRACTION_OUTPUT_TOKENS;
        let (input_cost, output_cost) =
            model_pricing(EXTRACTION_MODEL).token_cost(input_tokens, output_tokens);

        Self {
            provider: EXTRACTION_PROVIDER.to_string(),
            model: EXTRACTION_MODEL.to_string(),
            queries: responses,
            input_tokens,
            output_tokens,
            input_cost: round_to(input_cost, COST_PLACES),
            output_cost: round_to(output_cost, COST_PLACES),
            request_cost: 0.0,
            total_cost: round_to(input_cost + output_cost, COST_PLACES),
        }
    }
}

/// Prices each usage row and appends the extraction estimate when the run
/// has any responses. The grand total sums the rounded entry totals.
#[must_use]
pub fn summarize_costs(usage: Vec<ModelUsage>) -> CostSummary {
    let responses: i64 = usage.iter().map(|u| u.queries).sum();
    let mut costs: Vec<CostEntry> = usage.into_iter().map(CostEntry::priced).collect();

    if responses > 0 {
        costs.push(CostEntry::extraction(responses));
    }

    let total = round_to(costs.iter().map(|c| c.total_cost).sum(), COST_PLACES);
    CostSummary { costs, total }
}

/// Returns the cost breakdown for a run, ordered by provider then model.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_costs(pool: &SqlitePool, run_id: &str) -> Result<CostSummary, DbError> {
    let usage = sqlx::query_as::<_, ModelUsage>(
        "SELECT provider, model, \
             COUNT(*) AS queries, \
             COALESCE(SUM(input_tokens), 0) AS input_tokens, \
             COALESCE(SUM(output_tokens), 0) AS output_tokens \
         FROM responses \
         WHERE run_id = ? \
         GROUP BY provider, model \
         ORDER BY provider, model",
    )
    .bind(run_id)
    .fetch_all(pool)
    .await?;

    Ok(summarize_costs(usage))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(provider: &str, model: &str, queries: i64, input: i64, output: i64) -> ModelUsage {
        ModelUsage {
            provider: provider.to_string(),
            model: model.to_string(),
            queries,
            input_tokens: input,
            output_tokens: output,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_run_has_no_entries() {
        let summary = summarize_costs(Vec::new());
        assert!(summary.costs.is_empty());
        assert!(approx(summary.total, 0.0));
    }

    #[test]
    fn unknown_model_still_counts_usage() {
        let summary = summarize_costs(vec![usage("mystery", "llama-9000", 3, 1_000, 2_000)]);
        let entry = &summary.costs[0];
        assert_eq!(entry.queries, 3);
        assert_eq!(entry.input_tokens, 1_000);
        assert_eq!(entry.output_tokens, 2_000);
        assert!(approx(entry.total_cost, 0.0));
        assert_eq!(summary.costs.len(), 2, "extraction entry is appended");
    }

    #[test]
    fn request_fee_applies_per_query() {
        let summary = summarize_costs(vec![usage("perplexity", "sonar", 10, 0, 0)]);
        assert!(approx(summary.costs[0].request_cost, 0.05));
        assert!(approx(summary.costs[0].total_cost, 0.05));
    }

    #[test]
    fn extraction_entry_scales_with_response_count() {
        let summary = summarize_costs(vec![
            usage("openai", "gpt-5", 60, 0, 0),
            usage("gemini", "gemini-3-flash-preview", 40, 0, 0),
        ]);
        let extraction = summary.costs.last().expect("extraction entry");
        assert_eq!(extraction.provider, EXTRACTION_PROVIDER);
        assert_eq!(extraction.queries, 100);
        assert_eq!(extraction.input_tokens, 50_000);
        assert_eq!(extraction.output_tokens, 20_000);
        // 50k * 0.15 / 1M + 20k * 0.6 / 1M
        assert!(approx(extraction.total_cost, 0.0195));
    }

    #[test]
    fn grand_total_includes_extraction() {
        let summary = summarize_costs(vec![usage("openai", "gpt-5", 100, 1_000_000, 1_000_000)]);
        // 2.0 + 8.0 for the engine, 0.0195 for extraction
        assert!(approx(summary.costs[0].total_cost, 10.0));
        assert!(approx(summary.total, 10.0195));
    }
}
