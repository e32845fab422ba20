//! Individual responses for one (run, prompt, provider) cell.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::DbError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseDetail {
    pub response_id: String,
    pub repeat_num: i64,
    pub raw_text: String,
    #[serde(rename = "coke_brands_found")]
    pub first_party_brands: Vec<String>,
    #[serde(rename = "competitor_brands_found")]
    pub competitor_brands: Vec<String>,
    #[serde(rename = "coke_is_primary_recommendation")]
    pub is_primary_recommendation: bool,
    pub response_type: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct ResponseDetailRow {
    response_id: String,
    repeat_num: i64,
    raw_text: String,
    first_party_brands: Option<String>,
    competitor_brands: Option<String>,
    is_primary_recommendation: Option<i64>,
    response_type: Option<String>,
}

/// Decodes a stored JSON brand list.
///
/// A missing value reads as `[]`; text that is not a JSON array of strings
/// yields an empty list instead of an error.
#[must_use]
pub fn decode_brand_list(raw: Option<&str>) -> Vec<String> {
    let raw = raw.unwrap_or("[]");
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(brands) => brands,
        Err(e) => {
            tracing::debug!(error = %e, raw, "unreadable brand list; treating as empty");
            Vec::new()
        }
    }
}

/// Returns every response for the triple, ordered by repeat number.
///
/// Responses without an analysis are included with empty brand lists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_responses(
    pool: &SqlitePool,
    run_id: &str,
    prompt_id: &str,
    provider: &str,
) -> Result<Vec<ResponseDetail>, DbError> {
    let rows = sqlx::query_as::<_, ResponseDetailRow>(
        "SELECT r.response_id, \
             COALESCE(r.repeat_num, 1) AS repeat_num, \
             r.raw_text, \
             a.coke_brands_found AS first_party_brands, \
             a.competitor_brands_found AS competitor_brands, \
             a.coke_is_primary_recommendation AS is_primary_recommendation, \
             a.response_type \
         FROM responses r \
         LEFT JOIN analyses a ON r.response_id = a.response_id \
         WHERE r.run_id = ? AND r.prompt_id = ? AND r.provider = ? \
         ORDER BY r.repeat_num",
    )
    .bind(run_id)
    .bind(prompt_id)
    .bind(provider)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ResponseDetail {
            first_party_brands: decode_brand_list(row.first_party_brands.as_deref()),
            competitor_brands: decode_brand_list(row.competitor_brands.as_deref()),
            is_primary_recommendation: row.is_primary_recommendation == Some(1),
            response_id: row.response_id,
            repeat_num: row.repeat_num,
            raw_text: row.raw_text,
            response_type: row.response_type,
        })
        .collect())
}
