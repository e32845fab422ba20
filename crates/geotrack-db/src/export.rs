//! Flat per-response dump for spreadsheet export.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::DbError;

/// One response with its analysis columns and citation counts.
///
/// Analysis fields are the stored text, undecoded, and are `None` when the
/// response has no analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ExportRow {
    pub run_id: String,
    pub prompt_id: String,
    pub prompt_text: String,
    pub provider: String,
    pub model: String,
    pub latency_ms: Option<i64>,
    pub input_tokens: Option<i64>,
    pub output_tokens: Option<i64>,
    pub repeat_num: Option<i64>,
    #[serde(rename = "coke_brands_found")]
    pub first_party_brands: Option<String>,
    #[serde(rename = "competitor_brands_found")]
    pub competitor_brands: Option<String>,
    pub response_type: Option<String>,
    #[serde(rename = "coke_is_primary_recommendation")]
    pub is_primary_recommendation: Option<i64>,
    pub citation_count: i64,
    #[serde(rename = "coke_citation_count")]
    pub first_party_citation_count: i64,
}

impl ExportRow {
    /// Header row, in field order.
    pub const COLUMNS: [&'static str; 15] = [
        "run_id",
        "prompt_id",
        "prompt_text",
        "provider",
        "model",
        "latency_ms",
        "input_tokens",
        "output_tokens",
        "repeat_num",
        "coke_brands_found",
        "competitor_brands_found",
        "response_type",
        "coke_is_primary_recommendation",
        "citation_count",
        "coke_citation_count",
    ];
}

/// Returns every response of `run_id`, or of all runs when `None`, ordered by
/// prompt, provider and repeat.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn export_rows(pool: &SqlitePool, run_id: Option<&str>) -> Result<Vec<ExportRow>, DbError> {
    let rows = sqlx::query_as::<_, ExportRow>(
        "SELECT r.run_id, r.prompt_id, r.prompt_text, r.provider, r.model, \
             r.latency_ms, r.input_tokens, r.output_tokens, r.repeat_num, \
             a.coke_brands_found AS first_party_brands, \
             a.competitor_brands_found AS competitor_brands, \
             a.response_type, \
             a.coke_is_primary_recommendation AS is_primary_recommendation, \
             (SELECT COUNT(*) FROM citations c \
              WHERE c.response_id = r.response_id) AS citation_count, \
             (SELECT COUNT(*) FROM citations c \
              WHERE c.response_id = r.response_id AND c.is_coke_domain = 1) \
                 AS first_party_citation_count \
         FROM responses r \
         LEFT JOIN analyses a ON r.response_id = a.response_id \
         WHERE ?1 IS NULL OR r.run_id = ?1 \
         ORDER BY r.prompt_id, r.provider, r.repeat_num",
    )
    .bind(run_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
