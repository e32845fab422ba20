//! Prompt-level visibility and recommendation counts.
//!
//! Only responses that have an analysis row take part: a response without
//! one is dropped here, whereas the engine overview counts it as not visible.

use geotrack_core::percent_whole;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{DbError, VISIBLE_FLAG_SQL};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptData {
    pub prompt_id: String,
    pub prompt_text: String,
    pub provider: String,
    pub total: i64,
    pub visible: i64,
    pub recommended: i64,
    pub visibility_pct: i64,
    pub rec_pct: i64,
}

/// A prompt ranked by how rarely it surfaces a first-party brand, all engines combined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeakPrompt {
    pub prompt_id: String,
    pub prompt_text: String,
    pub total: i64,
    pub visibility: i64,
    pub recommendation: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct PromptTallyRow {
    prompt_id: String,
    prompt_text: String,
    provider: String,
    total: i64,
    visible: i64,
    recommended: Option<i64>,
}

#[derive(Debug, sqlx::FromRow)]
struct WeakPromptRow {
    prompt_id: String,
    prompt_text: String,
    total: i64,
    visible: i64,
    recommended: Option<i64>,
}

/// Returns one record per (prompt, provider) pair, ordered by prompt id then provider.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_prompt_data(pool: &SqlitePool, run_id: &str) -> Result<Vec<PromptData>, DbError> {
    let rows = sqlx::query_as::<_, PromptTallyRow>(&format!(
        "SELECT r.prompt_id, r.prompt_text, r.provider, \
             COUNT(*) AS total, \
             SUM({VISIBLE_FLAG_SQL}) AS visible, \
             SUM(a.coke_is_primary_recommendation) AS recommended \
         FROM responses r \
         JOIN analyses a ON r.response_id = a.response_id \
         WHERE r.run_id = ? \
         GROUP BY r.prompt_id, r.provider \
         ORDER BY r.prompt_id, r.provider"
    ))
    .bind(run_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let recommended = row.recommended.unwrap_or(0);
            PromptData {
                visibility_pct: percent_whole(row.visible, row.total),
                rec_pct: percent_whole(recommended, row.total),
                prompt_id: row.prompt_id,
                prompt_text: row.prompt_text,
                provider: row.provider,
                total: row.total,
                visible: row.visible,
                recommended,
            }
        })
        .collect())
}

/// Returns the `limit` prompts with the lowest visibility ratio across all engines.
///
/// Ties are broken by prompt id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_weakest_prompts(
    pool: &SqlitePool,
    run_id: &str,
    limit: i64,
) -> Result<Vec<WeakPrompt>, DbError> {
    let rows = sqlx::query_as::<_, WeakPromptRow>(&format!(
        "SELECT r.prompt_id, r.prompt_text, \
             COUNT(*) AS total, \
             SUM({VISIBLE_FLAG_SQL}) AS visible, \
             SUM(a.coke_is_primary_recommendation) AS recommended \
         FROM responses r \
         JOIN analyses a ON r.response_id = a.response_id \
         WHERE r.run_id = ? \
         GROUP BY r.prompt_id \
         ORDER BY CAST(SUM({VISIBLE_FLAG_SQL}) AS REAL) \
                  / COUNT(*) ASC, \
                  r.prompt_id \
         LIMIT ?"
    ))
    .bind(run_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| WeakPrompt {
            visibility: percent_whole(row.visible, row.total),
            recommendation: percent_whole(row.recommended.unwrap_or(0), row.total),
            prompt_id: row.prompt_id,
            prompt_text: row.prompt_text,
            total: row.total,
        })
        .collect())
}
