use crate::export::model::{PatrolRow, get_headers, row_to_record};
use csv::Writer;

/// Write the flat patrol rows as CSV.
pub fn write_csv(path: &str, rows: &[PatrolRow]) -> std::io::Result<()> {
    let mut wtr = Writer::from_path(path)?;

    wtr.write_record(get_headers())?;

    for row in rows {
        wtr.write_record(row_to_record(row))?;
    }

    wtr.flush()?;
    Ok(())
}
