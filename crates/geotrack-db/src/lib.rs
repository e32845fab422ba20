//! Read-only access to the GEO tracker SQLite store and the aggregate
//! queries the dashboard reports from.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{path::Path, time::Duration};
use thiserror::Error;

pub mod citations;
pub mod competitors;
pub mod costs;
pub mod export;
pub mod overview;
pub mod prompts;
pub mod responses;
pub mod runs;
pub mod stats;

pub use citations::{get_citations, CitationDomain, CitationShare, CitationSummary};
pub use competitors::{get_competitors, Competitor};
pub use costs::{get_costs, summarize_costs, CostEntry, CostSummary, ModelUsage};
pub use export::{export_rows, ExportRow};
pub use overview::{get_engine_overview, EngineOverview, EngineTallies};
pub use prompts::{get_prompt_data, list_weakest_prompts, PromptData, WeakPrompt};
pub use responses::{decode_brand_list, get_responses, ResponseDetail};
pub use runs::{get_run, latest_run_id, list_completed_runs, RunRow};
pub use stats::{database_stats, DatabaseStats, ProviderCount};

const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// 1 when the joined analysis `a` lists at least one first-party brand, else 0.
///
/// Text that is not valid JSON counts as an empty list, matching
/// [`decode_brand_list`]; the inner `CASE` keeps `json_array_length` off invalid input.
pub(crate) const VISIBLE_FLAG_SQL: &str = "CASE WHEN \
     (CASE WHEN json_valid(a.coke_brands_found) THEN json_array_length(a.coke_brands_found) ELSE 0 END) > 0 \
     THEN 1 ELSE 0 END";

/// Default number of competitor brands returned by [`get_competitors`].
pub const DEFAULT_COMPETITOR_LIMIT: i64 = 10;
/// Default number of domains ranked by [`get_citations`].
pub const DEFAULT_CITATION_DOMAIN_LIMIT: i64 = 15;
/// Default number of prompts returned by [`list_weakest_prompts`].
pub const DEFAULT_WEAK_PROMPT_LIMIT: i64 = 5;

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &geotrack_core::AppConfig) -> Self {
        Self {
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database file not found: {0}")]
    MissingDatabase(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Open the store read-only behind a single long-lived connection.
///
/// The connection is established eagerly so a missing or unreadable file
/// fails here rather than on the first query. It is never recycled: no idle
/// timeout, no max lifetime.
///
/// # Errors
///
/// Returns [`DbError::MissingDatabase`] if `path` does not exist, or
/// [`DbError::Sqlx`] if the connection cannot be established.
pub async fn connect_pool(path: &Path, config: PoolConfig) -> Result<SqlitePool, DbError> {
    if !path.exists() {
        return Err(DbError::MissingDatabase(path.display().to_string()));
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true)
        .create_if_missing(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await?;

    tracing::debug!(path = %path.display(), "opened read-only database");
    Ok(pool)
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// Run a full health check: ping the pool and return a typed error on failure.
///
/// # Errors
///
/// Returns [`DbError`] if the ping fails.
pub async fn health_check(pool: &SqlitePool) -> Result<(), DbError> {
    ping(pool).await?;
    Ok(())
}
