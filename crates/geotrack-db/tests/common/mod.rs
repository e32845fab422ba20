//! In-memory SQLite fixtures shared by the integration tests.

#![allow(dead_code)]

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

const SCHEMA: &str = include_str!("../fixtures/schema.sql");

/// A fresh in-memory database with the ingestion schema applied.
///
/// The pool holds exactly one connection for its whole life, since each
/// in-memory SQLite connection is its own database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");

    for statement in SCHEMA
        .split(';')
        .map(str::trim)
        .filter(|s| s.lines().any(|l| !l.trim().is_empty() && !l.trim().starts_with("--")))
    {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .unwrap_or_else(|e| panic!("schema statement failed: {e}\n{statement}"));
    }

    pool
}

pub async fn insert_run(pool: &SqlitePool, run_id: &str, started_at: &str, status: &str) {
    sqlx::query(
        "INSERT INTO runs (run_id, started_at, finished_at, prompt_count, provider_count, repeats, status) \
         VALUES (?, ?, ?, 2, 2, 3, ?)",
    )
    .bind(run_id)
    .bind(started_at)
    .bind((status == "completed").then_some(started_at))
    .bind(status)
    .execute(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_run failed for '{run_id}': {e}"));
}

/// Response row; `tokens` is `(input, output)`.
pub struct NewResponse<'a> {
    pub response_id: &'a str,
    pub run_id: &'a str,
    pub prompt_id: &'a str,
    pub provider: &'a str,
    pub model: &'a str,
    pub repeat_num: i64,
    pub latency_ms: Option<i64>,
    pub tokens: Option<(i64, i64)>,
}

pub async fn insert_response(pool: &SqlitePool, r: &NewResponse<'_>) {
    sqlx::query(
        "INSERT INTO responses \
         (response_id, run_id, prompt_id, prompt_text, provider, model, raw_text, \
          latency_ms, input_tokens, output_tokens, repeat_num, timestamp) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, '2026-02-10T10:05:00')",
    )
    .bind(r.response_id)
    .bind(r.run_id)
    .bind(r.prompt_id)
    .bind(format!("Prompt text for {}", r.prompt_id))
    .bind(r.provider)
    .bind(r.model)
    .bind(format!("Answer {}", r.response_id))
    .bind(r.latency_ms)
    .bind(r.tokens.map(|t| t.0))
    .bind(r.tokens.map(|t| t.1))
    .bind(r.repeat_num)
    .execute(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_response failed for '{}': {e}", r.response_id));
}

pub async fn insert_analysis(
    pool: &SqlitePool,
    response_id: &str,
    first_party: &str,
    competitors: &str,
    primary: bool,
) {
    sqlx::query(
        "INSERT INTO analyses \
         (response_id, coke_brands_found, competitor_brands_found, response_type, \
          coke_is_primary_recommendation, coke_domains_cited) \
         VALUES (?, ?, ?, 'recommendation', ?, '[]')",
    )
    .bind(response_id)
    .bind(first_party)
    .bind(competitors)
    .bind(i64::from(primary))
    .execute(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_analysis failed for '{response_id}': {e}"));
}

pub async fn insert_mention(
    pool: &SqlitePool,
    response_id: &str,
    brand: &str,
    position: i64,
    sentiment: Option<&str>,
    recommended: bool,
    first_party: bool,
) {
    sqlx::query(
        "INSERT INTO brand_mentions \
         (response_id, brand, position, sentiment, is_recommended, context, is_coke_brand) \
         VALUES (?, ?, ?, ?, ?, '', ?)",
    )
    .bind(response_id)
    .bind(brand)
    .bind(position)
    .bind(sentiment)
    .bind(i64::from(recommended))
    .bind(i64::from(first_party))
    .execute(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_mention failed for '{response_id}': {e}"));
}

pub async fn insert_citation(
    pool: &SqlitePool,
    response_id: &str,
    domain: Option<&str>,
    first_party: bool,
) {
    sqlx::query(
        "INSERT INTO citations (response_id, url, domain, is_coke_domain) VALUES (?, ?, ?, ?)",
    )
    .bind(response_id)
    .bind(format!("https://{}/page", domain.unwrap_or("unknown")))
    .bind(domain)
    .bind(i64::from(first_party))
    .execute(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_citation failed for '{response_id}': {e}"));
}

/// Seeds run `r1` (latest completed) with two engines:
///
/// - `openai`/`gpt-5`: 10 responses (`o0`..`o9`), all analysed. `o0`..`o3`
///   mention a first-party brand at positions 1..4 (sentiments
///   positive x3, neutral x1), `o0` and `o1` are primary recommendations,
///   `o0`..`o5` carry citations. Prompt `p1` covers `o0`..`o2`, `p2` the rest.
/// - `gemini`: 3 responses on `p1`, only `g0` analysed, no tokens recorded.
///
/// Also seeds completed runs `r0` and `r2` (older) and a running run `r3`.
pub async fn seed_reference_runs(pool: &SqlitePool) {
    insert_run(pool, "r0", "2026-02-01T09:00:00", "completed").await;
    insert_run(pool, "r1", "2026-02-10T10:00:00", "completed").await;
    insert_run(pool, "r2", "2026-01-15T08:00:00", "completed").await;
    insert_run(pool, "r3", "2026-02-12T07:00:00", "running").await;

    for i in 0..10_i64 {
        let id = format!("o{i}");
        let prompt = if i < 3 { "p1" } else { "p2" };
        let repeat_num = if i < 3 { 3 - i } else { i - 2 };
        insert_response(
            pool,
            &NewResponse {
                response_id: &id,
                run_id: "r1",
                prompt_id: prompt,
                provider: "openai",
                model: "gpt-5",
                repeat_num,
                latency_ms: Some(1_000 + i * 100),
                tokens: Some((1_000, 500)),
            },
        )
        .await;

        let first_party = if i < 4 { "[\"coca_cola\"]" } else { "[]" };
        insert_analysis(pool, &id, first_party, "[\"pepsi\"]", i < 2).await;
    }

    let sentiments = ["positive", "positive", "positive", "neutral"];
    for (i, sentiment) in sentiments.into_iter().enumerate() {
        let position = i64::try_from(i).expect("small index") + 1;
        insert_mention(pool, &format!("o{i}"), "Coca-Cola", position, Some(sentiment), i == 0, true)
            .await;
    }
    insert_mention(pool, "o4", "Pepsi", 1, Some("positive"), true, false).await;
    insert_mention(pool, "o5", "Pepsi", 2, Some("positive"), false, false).await;
    insert_mention(pool, "o6", "Pepsi", 2, Some("positive"), false, false).await;
    insert_mention(pool, "o7", "Campa Cola", 3, None, false, false).await;

    insert_citation(pool, "o0", Some("coca-cola.com"), true).await;
    insert_citation(pool, "o0", Some("wikipedia.org"), false).await;
    insert_citation(pool, "o1", Some("wikipedia.org"), false).await;
    insert_citation(pool, "o2", Some("coca-cola.com"), false).await;
    insert_citation(pool, "o3", Some("reddit.com"), false).await;
    insert_citation(pool, "o4", Some("wikipedia.org"), false).await;
    insert_citation(pool, "o5", None, false).await;

    for i in 0..3_i64 {
        insert_response(
            pool,
            &NewResponse {
                response_id: &format!("g{i}"),
                run_id: "r1",
                prompt_id: "p1",
                provider: "gemini",
                model: "gemini-3-flash-preview",
                repeat_num: i + 1,
                latency_ms: None,
                tokens: None,
            },
        )
        .await;
    }
    insert_analysis(pool, "g0", "[]", "not a json list", false).await;
}
