//! Run listing and lookup.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::DbError;

/// A row from the `runs` table. Timestamps are kept in their stored ISO-8601 form.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct RunRow {
    pub run_id: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub prompt_count: Option<i64>,
    pub provider_count: Option<i64>,
    pub repeats: Option<i64>,
    pub status: String,
}

const RUN_COLUMNS: &str = "run_id, started_at, finished_at, prompt_count, provider_count, \
                           repeats, COALESCE(status, 'running') AS status";

/// Returns every completed run, most recently started first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_completed_runs(pool: &SqlitePool) -> Result<Vec<RunRow>, DbError> {
    let rows = sqlx::query_as::<_, RunRow>(&format!(
        "SELECT {RUN_COLUMNS} FROM runs \
         WHERE status = 'completed' \
         ORDER BY started_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the id of the most recently started completed run, if any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_run_id(pool: &SqlitePool) -> Result<Option<String>, DbError> {
    let run_id = sqlx::query_scalar::<_, String>(
        "SELECT run_id FROM runs \
         WHERE status = 'completed' \
         ORDER BY started_at DESC \
         LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(run_id)
}

/// Looks up a single run of any status.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_run(pool: &SqlitePool, run_id: &str) -> Result<Option<RunRow>, DbError> {
    let row = sqlx::query_as::<_, RunRow>(&format!(
        "SELECT {RUN_COLUMNS} FROM runs WHERE run_id = ?"
    ))
    .bind(run_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Most recently started run regardless of status.
pub(crate) async fn latest_run_any_status(pool: &SqlitePool) -> Result<Option<RunRow>, DbError> {
    let row = sqlx::query_as::<_, RunRow>(&format!(
        "SELECT {RUN_COLUMNS} FROM runs ORDER BY started_at DESC LIMIT 1"
    ))
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
