use crate::analytics::corpus::Corpus;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::model::corpus_to_rows;
use crate::export::range::parse_range;
use crate::export::{ExportFormat, csv, json};
use crate::ui::messages::{success, warning};
use std::path::Path;

/// Export the (optionally windowed) corpus to a flat file.
pub fn run_export(
    pool: &mut DbPool,
    format: ExportFormat,
    file: &str,
    range: Option<&String>,
    force: bool,
) -> AppResult<()> {
    if Path::new(file).exists() && !force {
        return Err(AppError::Export(format!(
            "file '{}' already exists (use --force to overwrite)",
            file
        )));
    }

    let window = range.map(|r| parse_range(r)).transpose()?;
    let corpus = Corpus::load(&pool.conn, window)?;
    let rows = corpus_to_rows(&corpus);

    match format {
        ExportFormat::Csv => csv::write_csv(file, &rows)?,
        ExportFormat::Json => json::write_json(file, &rows)?,
    }

    if corpus.skipped > 0 {
        warning(format!(
            "{} malformed record(s) were skipped during export",
            corpus.skipped
        ));
    }

    ttlog(
        &pool.conn,
        "export",
        file,
        &format!("{} row(s) exported", rows.len()),
    )?;

    success(format!("Exported {} row(s) to {}.", rows.len(), file));
    Ok(())
}
