//! Output formatting and persistence for rendered views.
//!
//! Supports JSON to stdout or a file, and CSV export of the monthly table.

use anyhow::Result;
use tracing::{debug, info};

use crate::aggregation::MonthlyAggregate;
use crate::present::table::{TABLE_HEADERS, table_rows};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Writes `value` as pretty-printed JSON to `path`, or to stdout when no
/// path is given.
pub fn write_json(path: Option<&Path>, value: &impl Serialize) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let mut file = File::create(path)?;
            serde_json::to_writer_pretty(&mut file, value)?;
            file.write_all(b"\n")?;
            info!(path = %path.display(), "JSON written");
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, value)?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Writes every monthly row, sorted and formatted like the sample table,
/// as CSV with the table headers. Returns the number of data rows.
pub fn export_table_csv(path: &Path, rows: &[MonthlyAggregate]) -> Result<usize> {
    debug!(path = %path.display(), rows = rows.len(), "Exporting table CSV");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(TABLE_HEADERS)?;
    let formatted = table_rows(rows);
    for row in &formatted {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;

    Ok(formatted.len())
}
