//! CSV export of habit history.
//!
//! The CSV is written to a temp file in the target directory, synced, and
//! renamed into place so readers never see a half-written export.

use crate::{Error, HabitEntry, Result};
use std::path::Path;
use tempfile::NamedTempFile;

const HEADER: [&str; 5] = ["id", "name", "date", "status", "category"];

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    id: u64,
    name: &'a str,
    date: String,
    status: &'a str,
    category: &'a str,
}

impl<'a> From<&'a HabitEntry> for CsvRow<'a> {
    fn from(entry: &'a HabitEntry) -> Self {
        CsvRow {
            id: entry.id,
            name: &entry.name,
            date: entry.date.format("%Y-%m-%d").to_string(),
            status: &entry.status,
            category: &entry.category,
        }
    }
}

/// Write entries to `csv_path` with a header row, replacing any existing file
///
/// Returns the number of rows written.
pub fn export_csv(entries: &[HabitEntry], csv_path: &Path) -> Result<usize> {
    let parent = match csv_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(temp.as_file());

        // Written explicitly so an empty export still has a header
        writer.write_record(HEADER)?;

        for entry in entries {
            writer.serialize(CsvRow::from(entry))?;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    temp.persist(csv_path).map_err(|e| Error::Storage(e.error))?;

    tracing::info!("Exported {} habit entries to {:?}", entries.len(), csv_path);
    Ok(entries.len())
}
