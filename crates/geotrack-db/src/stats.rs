//! Whole-database row counts.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::{runs::latest_run_any_status, DbError, RunRow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ProviderCount {
    pub provider: String,
    pub responses: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseStats {
    pub runs: i64,
    pub responses: i64,
    pub citations: i64,
    pub brand_mentions: i64,
    pub analyses: i64,
    pub by_provider: Vec<ProviderCount>,
    pub latest_run: Option<RunRow>,
}

#[derive(Debug, sqlx::FromRow)]
struct CountsRow {
    runs: i64,
    responses: i64,
    citations: i64,
    brand_mentions: i64,
    analyses: i64,
}

/// Counts rows in every relation, across all runs.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn database_stats(pool: &SqlitePool) -> Result<DatabaseStats, DbError> {
    let counts = sqlx::query_as::<_, CountsRow>(
        "SELECT \
             (SELECT COUNT(*) FROM runs) AS runs, \
             (SELECT COUNT(*) FROM responses) AS responses, \
             (SELECT COUNT(*) FROM citations) AS citations, \
             (SELECT COUNT(*) FROM brand_mentions) AS brand_mentions, \
             (SELECT COUNT(*) FROM analyses) AS analyses",
    )
    .fetch_one(pool)
    .await?;

    let by_provider = sqlx::query_as::<_, ProviderCount>(
        "SELECT provider, COUNT(*) AS responses \
         FROM responses \
         GROUP BY provider \
         ORDER BY provider",
    )
    .fetch_all(pool)
    .await?;

    Ok(DatabaseStats {
        runs: counts.runs,
        responses: counts.responses,
        citations: counts.citations,
        brand_mentions: counts.brand_mentions,
        analyses: counts.analyses,
        by_provider,
        latest_run: latest_run_any_status(pool).await?,
    })
}
