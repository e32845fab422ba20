//! Read-only report commands.
//!
//! Called from `main` once the pool is open. Each handler resolves the run
//! (explicit `--run`, else the latest completed one) and prints fixed-width
//! tables to stdout.

use geotrack_core::{engine_display_name, AppConfig};
use geotrack_db::{
    CitationSummary, Competitor, CostSummary, EngineOverview, RunRow, WeakPrompt,
    DEFAULT_CITATION_DOMAIN_LIMIT, DEFAULT_WEAK_PROMPT_LIMIT,
};
use sqlx::SqlitePool;

const NO_RUNS_HINT: &str = "no completed runs found; run the GEO tracker collection first";
const PROMPT_TEXT_WIDTH: usize = 60;

/// Cuts `text` to `max` characters, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "\u{2014}".to_string(), |v| v.to_string())
}

/// `--run` if given and non-blank, else the latest completed run.
async fn resolve_run(pool: &SqlitePool, run: Option<&str>) -> anyhow::Result<Option<String>> {
    if let Some(run) = run.map(str::trim).filter(|r| !r.is_empty()) {
        return Ok(Some(run.to_string()));
    }
    Ok(geotrack_db::latest_run_id(pool).await?)
}

/// Lists completed runs, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_runs(pool: &SqlitePool) -> anyhow::Result<()> {
    let runs = geotrack_db::list_completed_runs(pool).await?;
    if runs.is_empty() {
        println!("{NO_RUNS_HINT}");
        return Ok(());
    }

    println!(
        "{:<22}{:<22}{:<22}{:<9}{:<11}REPEATS",
        "RUN", "STARTED", "FINISHED", "PROMPTS", "PROVIDERS"
    );
    for run in &runs {
        println!("{}", format_run_row(run));
    }
    Ok(())
}

fn format_run_row(run: &RunRow) -> String {
    format!(
        "{:<22}{:<22}{:<22}{:<9}{:<11}{}",
        run.run_id,
        run.started_at,
        fmt_opt(run.finished_at.as_deref()),
        fmt_opt(run.prompt_count),
        fmt_opt(run.provider_count),
        fmt_opt(run.repeats),
    )
}

/// Prints the engine table, top competitors, top cited domains and weakest
/// prompts for one run.
///
/// `provider` narrows the engine table only; the other sections cover the
/// whole run.
///
/// # Errors
///
/// Returns an error if a database query fails.
pub(crate) async fn run_report(
    pool: &SqlitePool,
    config: &AppConfig,
    run: Option<&str>,
    provider: Option<&str>,
) -> anyhow::Result<()> {
    let Some(run_id) = resolve_run(pool, run).await? else {
        println!("{NO_RUNS_HINT}");
        return Ok(());
    };

    let mut engines = geotrack_db::get_engine_overview(pool, &run_id).await?;
    if let Some(provider) = provider {
        engines.retain(|e| e.provider == provider);
    }
    let competitors = geotrack_db::get_competitors(pool, &run_id, config.competitor_limit).await?;
    let citations =
        geotrack_db::get_citations(pool, &run_id, DEFAULT_CITATION_DOMAIN_LIMIT).await?;
    let weakest =
        geotrack_db::list_weakest_prompts(pool, &run_id, DEFAULT_WEAK_PROMPT_LIMIT).await?;

    println!("Run: {run_id}");
    println!();
    print_engines(&engines, provider);
    println!();
    print_competitors(&competitors);
    println!();
    print_citations(&citations);
    println!();
    print_weakest(&weakest);
    Ok(())
}

fn print_engines(engines: &[EngineOverview], provider: Option<&str>) {
    if engines.is_empty() {
        match provider {
            Some(p) => println!("no responses from {} in this run", engine_display_name(p)),
            None => println!("no responses in this run"),
        }
        return;
    }

    println!(
        "{:<24}{:>10}{:>8}{:>8}{:>8}{:>9}{:>8}{:>12}",
        "ENGINE", "RESPONSES", "VIS%", "SOV%", "REC%", "AVG POS", "CITE%", "LATENCY MS"
    );
    for engine in engines {
        println!("{}", format_engine_row(engine));
    }
}

fn format_engine_row(e: &EngineOverview) -> String {
    format!(
        "{:<24}{:>10}{:>8.1}{:>8.1}{:>8.1}{:>9}{:>8.1}{:>12}",
        truncate(&e.display_name, 22),
        e.total_responses,
        e.visibility,
        e.sov,
        e.rec_rate,
        e.avg_position
            .map_or_else(|| "\u{2014}".to_string(), |p| format!("{p:.1}")),
        e.citation_rate,
        e.avg_latency_ms,
    )
}

fn print_competitors(competitors: &[Competitor]) {
    println!("Top competitors");
    if competitors.is_empty() {
        println!("  none mentioned");
        return;
    }
    println!(
        "{:<24}{:>10}{:>9}  {:<11}{:>5}",
        "BRAND", "MENTIONS", "AVG POS", "SENTIMENT", "REC"
    );
    for c in competitors {
        println!(
            "{:<24}{:>10}{:>9.1}  {:<11}{:>5}",
            truncate(&c.brand, 22),
            c.mention_count,
            c.avg_position,
            c.sentiment_mode,
            c.recommendation_count
        );
    }
}

fn print_citations(summary: &CitationSummary) {
    let share = &summary.first_party_share;
    println!(
        "Top cited domains (first-party share {}/{} = {:.1}%)",
        share.first_party, share.total, share.pct
    );
    if summary.domains.is_empty() {
        println!("  no citations");
        return;
    }
    println!("{:<40}{:>7}  FIRST-PARTY", "DOMAIN", "COUNT");
    for d in &summary.domains {
        println!(
            "{:<40}{:>7}  {}",
            truncate(&d.domain, 38),
            d.count,
            if d.is_first_party { "yes" } else { "" }
        );
    }
}

fn print_weakest(prompts: &[WeakPrompt]) {
    println!("Weakest prompts");
    if prompts.is_empty() {
        println!("  no analysed responses");
        return;
    }
    println!("{:<12}{:>7}{:>7}{:>7}  TEXT", "PROMPT", "TOTAL", "VIS%", "REC%");
    for p in prompts {
        println!(
            "{:<12}{:>7}{:>7}{:>7}  {}",
            p.prompt_id,
            p.total,
            p.visibility,
            p.recommendation,
            truncate(&p.prompt_text, PROMPT_TEXT_WIDTH)
        );
    }
}

/// Prints estimated spend per (provider, model) and the run total.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_costs(pool: &SqlitePool, run: Option<&str>) -> anyhow::Result<()> {
    let Some(run_id) = resolve_run(pool, run).await? else {
        println!("{NO_RUNS_HINT}");
        return Ok(());
    };

    let summary = geotrack_db::get_costs(pool, &run_id).await?;
    println!("Run: {run_id}");
    print!("{}", format_costs(&summary)?);
    Ok(())
}

fn format_costs(summary: &CostSummary) -> Result<String, std::fmt::Error> {
    use std::fmt::Write as _;

    if summary.costs.is_empty() {
        return Ok("no responses in this run\n".to_string());
    }

    let mut out = String::new();
    writeln!(
        out,
        "{:<12}{:<26}{:>9}{:>12}{:>12}{:>11}",
        "PROVIDER", "MODEL", "QUERIES", "IN TOKENS", "OUT TOKENS", "COST USD"
    )?;
    for c in &summary.costs {
        writeln!(
            out,
            "{:<12}{:<26}{:>9}{:>12}{:>12}{:>11.4}",
            c.provider, c.model, c.queries, c.input_tokens, c.output_tokens, c.total_cost
        )?;
    }
    writeln!(out, "{:<80}{:>11.4}", "TOTAL", summary.total)?;
    Ok(out)
}

/// Prints row counts for every table and the most recent run of any status.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_db_stats(pool: &SqlitePool) -> anyhow::Result<()> {
    let stats = geotrack_db::database_stats(pool).await?;

    println!("{:<16}{:>10}", "runs", stats.runs);
    println!("{:<16}{:>10}", "responses", stats.responses);
    println!("{:<16}{:>10}", "analyses", stats.analyses);
    println!("{:<16}{:>10}", "brand_mentions", stats.brand_mentions);
    println!("{:<16}{:>10}", "citations", stats.citations);

    if !stats.by_provider.is_empty() {
        println!();
        println!("{:<24}{:>10}", "PROVIDER", "RESPONSES");
        for p in &stats.by_provider {
            println!("{:<24}{:>10}", engine_display_name(&p.provider), p.responses);
        }
    }

    println!();
    match &stats.latest_run {
        Some(run) => println!("latest run: {} ({})", run.run_id, run.status),
        None => println!("latest run: none"),
    }
    Ok(())
}
