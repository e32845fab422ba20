//! Per-engine visibility, share of voice, recommendation, position,
//! sentiment and citation metrics for one run.
//!
//! Every provider with at least one response in the run gets a record; its
//! metrics are computed from that provider's rows only.

use std::collections::{BTreeMap, HashMap};

use geotrack_core::{engine_display_name, percent_one_decimal, round_to};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{DbError, VISIBLE_FLAG_SQL};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineOverview {
    pub provider: String,
    pub display_name: String,
    pub total_responses: i64,
    pub visibility: f64,
    pub sov: f64,
    pub rec_rate: f64,
    /// `None` when the engine never mentioned a first-party brand.
    pub avg_position: Option<f64>,
    /// Counts per sentiment label; labels never observed are absent.
    pub sentiment_dist: BTreeMap<String, i64>,
    pub citation_rate: f64,
    pub first_party_citation_rate: f64,
    pub avg_latency_ms: i64,
    pub total_input_tokens: i64,
    pub total_output_tokens: i64,
}

/// Raw counts for one provider, before any percentages are derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineTallies {
    pub total_responses: i64,
    /// Responses whose analysis found at least one first-party brand.
    pub visible: i64,
    pub recommended: i64,
    pub total_mentions: i64,
    pub first_party_mentions: i64,
    pub first_party_avg_position: Option<f64>,
    pub sentiment_counts: BTreeMap<String, i64>,
    pub responses_with_citations: i64,
    pub total_citations: i64,
    pub first_party_citations: i64,
    pub avg_latency_ms: Option<f64>,
    pub input_tokens: i64,
    pub output_tokens: i64,
}

impl EngineTallies {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn into_overview(self, provider: String) -> EngineOverview {
        let total = self.total_responses;
        let mut sentiment_dist = self.sentiment_counts;
        sentiment_dist.retain(|_, count| *count > 0);

        EngineOverview {
            display_name: engine_display_name(&provider).to_string(),
            provider,
            total_responses: total,
            visibility: percent_one_decimal(self.visible, total),
            sov: percent_one_decimal(self.first_party_mentions, self.total_mentions),
            rec_rate: percent_one_decimal(self.recommended, total),
            avg_position: self.first_party_avg_position.map(|p| round_to(p, 1)),
            sentiment_dist,
            citation_rate: percent_one_decimal(self.responses_with_citations, total),
            first_party_citation_rate: percent_one_decimal(
                self.first_party_citations,
                self.total_citations,
            ),
            avg_latency_ms: self.avg_latency_ms.map_or(0, |ms| ms.trunc() as i64),
            total_input_tokens: self.input_tokens,
            total_output_tokens: self.output_tokens,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ResponseTallyRow {
    provider: String,
    total: i64,
    avg_latency_ms: Option<f64>,
    input_tokens: Option<i64>,
    output_tokens: Option<i64>,
}

#[derive(Debug, sqlx::FromRow)]
struct AnalysisTallyRow {
    provider: String,
    visible: i64,
    recommended: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct MentionTallyRow {
    provider: String,
    total_mentions: i64,
    first_party_mentions: i64,
    avg_position: Option<f64>,
}

#[derive(Debug, sqlx::FromRow)]
struct SentimentTallyRow {
    provider: String,
    sentiment: String,
    count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct CitationTallyRow {
    provider: String,
    responses_with_citations: i64,
    total_citations: i64,
    first_party_citations: i64,
}

/// Returns one overview record per provider in the run, ordered by provider id.
///
/// An unknown run yields an empty list.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any query fails.
pub async fn get_engine_overview(
    pool: &SqlitePool,
    run_id: &str,
) -> Result<Vec<EngineOverview>, DbError> {
    let responses = sqlx::query_as::<_, ResponseTallyRow>(
        "SELECT provider, \
             COUNT(*) AS total, \
             AVG(latency_ms) AS avg_latency_ms, \
             SUM(input_tokens) AS input_tokens, \
             SUM(output_tokens) AS output_tokens \
         FROM responses \
         WHERE run_id = ? \
         GROUP BY provider \
         ORDER BY provider",
    )
    .bind(run_id)
    .fetch_all(pool)
    .await?;

    if responses.is_empty() {
        return Ok(Vec::new());
    }

    let analyses = sqlx::query_as::<_, AnalysisTallyRow>(&format!(
        "SELECT r.provider, \
             SUM({VISIBLE_FLAG_SQL}) AS visible, \
             SUM(CASE WHEN a.coke_is_primary_recommendation = 1 THEN 1 ELSE 0 END) AS recommended \
         FROM analyses a \
         JOIN responses r ON a.response_id = r.response_id \
         WHERE r.run_id = ? \
         GROUP BY r.provider"
    ))
    .bind(run_id)
    .fetch_all(pool)
    .await?;

    let mentions = sqlx::query_as::<_, MentionTallyRow>(
        "SELECT r.provider, \
             COUNT(*) AS total_mentions, \
             SUM(CASE WHEN bm.is_coke_brand = 1 THEN 1 ELSE 0 END) AS first_party_mentions, \
             AVG(CASE WHEN bm.is_coke_brand = 1 THEN bm.position END) AS avg_position \
         FROM brand_mentions bm \
         JOIN responses r ON bm.response_id = r.response_id \
         WHERE r.run_id = ? \
         GROUP BY r.provider",
    )
    .bind(run_id)
    .fetch_all(pool)
    .await?;

    let sentiments = sqlx::query_as::<_, SentimentTallyRow>(
        "SELECT r.provider, bm.sentiment, COUNT(*) AS count \
         FROM brand_mentions bm \
         JOIN responses r ON bm.response_id = r.response_id \
         WHERE r.run_id = ? AND bm.is_coke_brand = 1 AND bm.sentiment IS NOT NULL \
         GROUP BY r.provider, bm.sentiment",
    )
    .bind(run_id)
    .fetch_all(pool)
    .await?;

    let citations = sqlx::query_as::<_, CitationTallyRow>(
        "SELECT r.provider, \
             COUNT(DISTINCT c.response_id) AS responses_with_citations, \
             COUNT(*) AS total_citations, \
             SUM(CASE WHEN c.is_coke_domain = 1 THEN 1 ELSE 0 END) AS first_party_citations \
         FROM citations c \
         JOIN responses r ON c.response_id = r.response_id \
         WHERE r.run_id = ? \
         GROUP BY r.provider",
    )
    .bind(run_id)
    .fetch_all(pool)
    .await?;

    let mut tallies: HashMap<String, EngineTallies> = responses
        .iter()
        .map(|row| {
            (
                row.provider.clone(),
                EngineTallies {
                    total_responses: row.total,
                    avg_latency_ms: row.avg_latency_ms,
                    input_tokens: row.input_tokens.unwrap_or(0),
                    output_tokens: row.output_tokens.unwrap_or(0),
                    ..EngineTallies::default()
                },
            )
        })
        .collect();

    for row in analyses {
        if let Some(t) = tallies.get_mut(&row.provider) {
            t.visible = row.visible;
            t.recommended = row.recommended;
        }
    }
    for row in mentions {
        if let Some(t) = tallies.get_mut(&row.provider) {
            t.total_mentions = row.total_mentions;
            t.first_party_mentions = row.first_party_mentions;
            t.first_party_avg_position = row.avg_position;
        }
    }
    for row in sentiments {
        if let Some(t) = tallies.get_mut(&row.provider) {
            *t.sentiment_counts.entry(row.sentiment).or_insert(0) += row.count;
        }
    }
    for row in citations {
        if let Some(t) = tallies.get_mut(&row.provider) {
            t.responses_with_citations = row.responses_with_citations;
            t.total_citations = row.total_citations;
            t.first_party_citations = row.first_party_citations;
        }
    }

    // `responses` is already ordered by provider; keep that order.
    let overviews = responses
        .into_iter()
        .filter_map(|row| {
            tallies
                .remove(&row.provider)
                .map(|t| t.into_overview(row.provider))
        })
        .collect();

    Ok(overviews)
}
