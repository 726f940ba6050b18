//! Tabular export of normalized records.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use harvest_core::Record;

use crate::error::ScraperError;
use crate::schema::Schema;

/// Sink for the final table. Only invoked with at least one record.
pub trait Exporter {
    /// Writes one header row (the schema) and one row per record.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Export`] if the destination cannot be written.
    fn export(&mut self, schema: &Schema, records: &[Record]) -> Result<(), ScraperError>;
}

/// Writes a UTF-8, comma-delimited CSV file.
#[derive(Debug, Clone)]
pub struct CsvFileExporter {
    path: PathBuf,
}

impl CsvFileExporter {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, schema: &Schema, records: &[Record]) -> Result<(), csv::Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        write_csv(file, schema, records)
    }
}

impl Exporter for CsvFileExporter {
    fn export(&mut self, schema: &Schema, records: &[Record]) -> Result<(), ScraperError> {
        self.write(schema, records)
            .map_err(|source| ScraperError::Export {
                path: self.path.display().to_string(),
                source,
            })?;
        tracing::info!(
            path = %self.path.display(),
            rows = records.len(),
            columns = schema.len(),
            "wrote CSV export"
        );
        Ok(())
    }
}

/// Serializes `records` in `schema` column order to any writer.
///
/// # Errors
///
/// Returns `csv::Error` on I/O failure.
pub fn write_csv<W: io::Write>(
    writer: W,
    schema: &Schema,
    records: &[Record],
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(schema.columns())?;
    for record in records {
        wtr.write_record(schema.project(record))?;
    }
    wtr.flush()?;
    Ok(())
}
