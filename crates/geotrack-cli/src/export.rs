//! CSV export of per-response rows.

use std::{io::Write, path::Path};

use geotrack_db::ExportRow;
use sqlx::SqlitePool;

/// Writes the header and one record per row.
///
/// The header is written even when `rows` is empty.
fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> anyhow::Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(ExportRow::COLUMNS)?;
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Exports the responses of `run` (or every run) to `output`.
///
/// # Errors
///
/// Returns an error if the query fails or the file cannot be written.
pub(crate) async fn run_export(
    pool: &SqlitePool,
    run: Option<&str>,
    output: &Path,
) -> anyhow::Result<()> {
    let run = run.map(str::trim).filter(|r| !r.is_empty());
    let rows = geotrack_db::export_rows(pool, run).await?;

    let file = std::fs::File::create(output)?;
    write_csv(&rows, file)?;

    println!("exported {} rows to {}", rows.len(), output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ExportRow {
        ExportRow {
            run_id: "r1".to_string(),
            prompt_id: "p1".to_string(),
            prompt_text: "Best cola, for a party?".to_string(),
            provider: "openai".to_string(),
            model: "gpt-5".to_string(),
            latency_ms: Some(1200),
            input_tokens: Some(1000),
            output_tokens: None,
            repeat_num: Some(1),
            first_party_brands: Some("[\"coca_cola\"]".to_string()),
            competitor_brands: None,
            response_type: Some("recommendation".to_string()),
            is_primary_recommendation: Some(1),
            citation_count: 2,
            first_party_citation_count: 1,
        }
    }

    fn render(rows: &[ExportRow]) -> String {
        let mut buf = Vec::new();
        write_csv(rows, &mut buf).expect("write csv");
        String::from_utf8(buf).expect("utf-8 csv")
    }

    #[test]
    fn empty_export_still_has_header() {
        assert_eq!(render(&[]), format!("{}\n", ExportRow::COLUMNS.join(",")));
    }

    #[test]
    fn record_quotes_commas_and_leaves_missing_values_blank() {
        let out = render(&[row()]);
        let record = out.lines().nth(1).expect("record line");
        assert_eq!(
            record,
            "r1,p1,\"Best cola, for a party?\",openai,gpt-5,1200,1000,,1,\
             \"[\"\"coca_cola\"\"]\",,recommendation,1,2,1"
        );
    }

    #[test]
    fn header_matches_record_width() {
        let out = render(&[row()]);
        let widths: Vec<usize> = out.lines().map(|l| {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .from_reader(l.as_bytes());
            reader
                .records()
                .next()
                .expect("one record")
                .expect("valid record")
                .len()
        }).collect();
        assert_eq!(widths, vec![15, 15]);
    }
}
