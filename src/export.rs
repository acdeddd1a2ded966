//! CSV export of extracted records

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tempfile::NamedTempFile;
use tracing::{error, info, info_span, Span};

use crate::error::{ScrapeError, ScrapeResult};
use crate::extractors::{Record, COLUMNS};

const FILE_PREFIX: &str = "products_";
const FILE_EXTENSION: &str = "csv";

/// File name used when no destination is given, e.g. `products_20240115_093000.csv`
pub fn default_file_name(now: DateTime<Local>) -> String {
    format!("{}{}.{}", FILE_PREFIX, now.format("%Y%m%d_%H%M%S"), FILE_EXTENSION)
}

/// Writes records as `name,price,rating` CSV
#[derive(Debug, Clone)]
pub struct CsvExporter {
    /// Directory for generated file names; relative to the working directory when unset
    output_dir: Option<PathBuf>,
    span: Span,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self {
            output_dir: None,
            span: info_span!("export"),
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Write `records` to `destination`, or to a timestamped file.
    ///
    /// An empty slice still produces a header-only file. Rows go to a
    /// uniquely named temporary file beside the destination which is then
    /// renamed into place, so a failed export leaves nothing behind.
    /// Returns the path written.
    pub fn export(&self, records: &[Record], destination: Option<&Path>) -> ScrapeResult<PathBuf> {
        let _entered = self.span.enter();
        let path = self.resolve_path(destination);

        match write_atomically(&path, records) {
            Ok(()) => {
                info!("Data exported successfully to {}", path.display());
                info!("Total products exported: {}", records.len());
                Ok(path)
            }
            Err(e) => {
                error!("Error exporting to {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    fn resolve_path(&self, destination: Option<&Path>) -> PathBuf {
        match destination {
            Some(path) => path.to_path_buf(),
            None => {
                let name = default_file_name(Local::now());
                match &self.output_dir {
                    Some(dir) => dir.join(name),
                    None => PathBuf::from(name),
                }
            }
        }
    }
}

fn write_atomically(path: &Path, records: &[Record]) -> ScrapeResult<()> {
    if path.file_name().is_none() {
        return Err(ScrapeError::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "destination has no file name"),
        ));
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // removed on drop unless persisted
    let mut staging = NamedTempFile::new_in(dir).map_err(|e| ScrapeError::io(path, e))?;
    write_rows(&mut staging, path, records)?;
    staging
        .persist(path)
        .map_err(|e| ScrapeError::io(path, e.error))?;

    Ok(())
}

fn write_rows<W: io::Write>(out: W, path: &Path, records: &[Record]) -> ScrapeResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(COLUMNS).map_err(|e| csv_error(path, e))?;
    for record in records {
        writer
            .write_record(record.values())
            .map_err(|e| csv_error(path, e))?;
    }
    writer.flush().map_err(|e| ScrapeError::io(path, e))?;

    Ok(())
}

/// I/O failures inside the CSV writer are reported against the destination
fn csv_error(path: &Path, err: csv::Error) -> ScrapeError {
    match err.kind() {
        csv::ErrorKind::Io(source) => {
            ScrapeError::io(path, io::Error::new(source.kind(), source.to_string()))
        }
        _ => ScrapeError::Csv(err),
    }
}
