//! Cited-domain ranking and first-party citation share.

use geotrack_core::percent_one_decimal;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::DbError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationDomain {
    pub domain: String,
    pub count: i64,
    /// True when any citation of this domain in the run was flagged first-party.
    #[serde(rename = "is_coke_domain")]
    pub is_first_party: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitationShare {
    #[serde(rename = "coke")]
    pub first_party: i64,
    pub total: i64,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitationSummary {
    pub domains: Vec<CitationDomain>,
    #[serde(rename = "coke_share")]
    pub first_party_share: CitationShare,
}

#[derive(Debug, sqlx::FromRow)]
struct DomainRow {
    domain: String,
    count: i64,
    is_first_party: Option<i64>,
}

#[derive(Debug, sqlx::FromRow)]
struct ShareRow {
    total: i64,
    first_party: i64,
}

/// Returns the `limit` most-cited domains plus run-wide first-party share.
///
/// Citations without a domain count toward the totals but are not ranked.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn get_citations(
    pool: &SqlitePool,
    run_id: &str,
    limit: i64,
) -> Result<CitationSummary, DbError> {
    let rows = sqlx::query_as::<_, DomainRow>(
        "SELECT c.domain, COUNT(*) AS count, MAX(c.is_coke_domain) AS is_first_party \
         FROM citations c \
         JOIN responses r ON c.response_id = r.response_id \
         WHERE r.run_id = ? AND c.domain IS NOT NULL \
         GROUP BY c.domain \
         ORDER BY count DESC \
         LIMIT ?",
    )
    .bind(run_id)
    .bind(limit.max(0))
    .fetch_all(pool)
    .await?;

    let share = sqlx::query_as::<_, ShareRow>(
        "SELECT COUNT(*) AS total, \
             COALESCE(SUM(CASE WHEN c.is_coke_domain = 1 THEN 1 ELSE 0 END), 0) AS first_party \
         FROM citations c \
         JOIN responses r ON c.response_id = r.response_id \
         WHERE r.run_id = ?",
    )
    .bind(run_id)
    .fetch_one(pool)
    .await?;

    Ok(CitationSummary {
        domains: rows
            .into_iter()
            .map(|row| CitationDomain {
                domain: row.domain,
                count: row.count,
                is_first_party: row.is_first_party == Some(1),
            })
            .collect(),
        first_party_share: CitationShare {
            first_party: share.first_party,
            total: share.total,
            pct: percent_one_decimal(share.first_party, share.total),
        },
    })
}
