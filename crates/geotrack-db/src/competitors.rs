//! Most-mentioned competitor brands for a run.

use geotrack_core::round_to;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::DbError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Competitor {
    pub brand: String,
    pub mention_count: i64,
    pub avg_position: f64,
    /// Sentiment of an arbitrary representative mention in the brand's group,
    /// `neutral` when that mention has none. Not a statistical mode.
    pub sentiment_mode: String,
    pub recommendation_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct CompetitorRow {
    brand: String,
    mention_count: i64,
    avg_position: Option<f64>,
    sentiment: Option<String>,
    recommendation_count: Option<i64>,
}

/// Returns at most `limit` competitor brands ranked by mention count, highest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_competitors(
    pool: &SqlitePool,
    run_id: &str,
    limit: i64,
) -> Result<Vec<Competitor>, DbError> {
    // `bm.sentiment` is a bare column: SQLite takes it from one row of the group.
    let rows = sqlx::query_as::<_, CompetitorRow>(
        "SELECT bm.brand, \
             COUNT(*) AS mention_count, \
             AVG(bm.position) AS avg_position, \
             bm.sentiment, \
             SUM(bm.is_recommended) AS recommendation_count \
         FROM brand_mentions bm \
         JOIN responses r ON bm.response_id = r.response_id \
         WHERE r.run_id = ? AND bm.is_coke_brand = 0 \
         GROUP BY bm.brand \
         ORDER BY mention_count DESC \
         LIMIT ?",
    )
    .bind(run_id)
    .bind(limit.max(0))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Competitor {
            brand: row.brand,
            mention_count: row.mention_count,
            avg_position: row.avg_position.map_or(0.0, |p| round_to(p, 1)),
            sentiment_mode: row
                .sentiment
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "neutral".to_string()),
            recommendation_count: row.recommendation_count.unwrap_or(0),
        })
        .collect())
}
