use crate::errors::{AppError, AppResult};
use crate::export::model::PatrolRow;
use std::fs::File;
use std::io::BufWriter;

/// Write the flat patrol rows as a JSON array.
pub fn write_json(path: &str, rows: &[PatrolRow]) -> AppResult<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, rows)
        .map_err(|e| AppError::Export(format!("cannot write JSON: {}", e)))?;

    Ok(())
}
