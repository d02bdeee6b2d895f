use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use mime::Mime;

use super::domain::ApplicationRecord;

pub const CSV_HEADER: &str = "Date,Company,Role,Match Score,Status,Follow-up,Salary,Tags,Link,Notes";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV buffer: {0}")]
    Io(#[from] io::Error),
}

/// A ready-to-download CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub mime: Mime,
    pub bytes: Vec<u8>,
}

impl CsvExport {
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

pub fn export_filename(export_date: NaiveDate) -> String {
    format!("job-applications-{}.csv", export_date.format("%Y-%m-%d"))
}

/// Serialize `records` in their current order. Returns `None` for an empty list.
///
/// Every field is quoted; embedded quotes are doubled.
pub fn export_csv(
    records: &[ApplicationRecord],
    export_date: NaiveDate,
) -> Result<Option<CsvExport>, ExportError> {
    if records.is_empty() {
        return Ok(None);
    }

    let mut bytes = Vec::with_capacity(CSV_HEADER.len() + 1 + records.len() * 96);
    bytes.extend_from_slice(CSV_HEADER.as_bytes());
    bytes.push(b'\n');

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(bytes);

    for record in records {
        writer.write_record(row(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;

    Ok(Some(CsvExport {
        filename: export_filename(export_date),
        mime: mime::TEXT_CSV,
        bytes,
    }))
}

fn row(record: &ApplicationRecord) -> [String; 10] {
    let optional = |value: &Option<String>| value.clone().unwrap_or_default();
    [
        record.date.format("%Y-%m-%d").to_string(),
        record.company.clone(),
        record.role.clone(),
        record.match_score.to_string(),
        record.status.label().to_string(),
        record
            .followup
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        optional(&record.salary),
        optional(&record.tags),
        optional(&record.link),
        optional(&record.notes),
    ]
}

/// Where a finished export is handed off (a browser download, a directory, ...).
pub trait ExportSink {
    fn deliver(&self, export: &CsvExport) -> io::Result<PathBuf>;
}

/// Writes exports into a directory, replacing a same-named file.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&self, export: &CsvExport) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&export.filename);
        fs::write(&path, &export.bytes)?;
        Ok(path)
    }
}
