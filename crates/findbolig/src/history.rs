//! The CSV file that accumulates one row of placements per run.
//!
//! Buildings come and go from a waitlist, so the header is the union of every
//! column ever written. The file is rewritten in full on each append.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::types::HistoryRow;

pub const DATE_COLUMN: &str = "date";

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Failed to read history file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Failed to write history file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Failed to flush history file {path}: {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Numeric column names (building ids) in numeric order, anything else after
/// them in lexicographic order.
fn compare_columns(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    columns: BTreeSet<String>,
    rows: Vec<HistoryRow>,
}

impl History {
    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    /// `date` followed by every other column in deterministic order.
    pub fn header(&self) -> Vec<&str> {
        let mut others: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        others.sort_by(|a, b| compare_columns(a, b));

        std::iter::once(DATE_COLUMN).chain(others).collect()
    }

    pub fn push(&mut self, mut row: HistoryRow, date: NaiveDate) {
        row.remove(DATE_COLUMN);
        self.columns.extend(row.keys().cloned());
        row.insert(DATE_COLUMN.to_string(), date.format("%Y-%m-%d").to_string());
        self.rows.push(row);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A file that cannot be opened counts as an empty history.
    pub fn read(&self) -> Result<History, HistoryError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                log::info!(
                    "There was no existing data in {}: {}",
                    self.path.display(),
                    e
                );
                return Ok(History::default());
            }
        };

        let read_error = |source| HistoryError::Read {
            path: self.path.clone(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        let headers = reader.headers().map_err(read_error)?.clone();

        let mut history = History::default();
        history.columns.extend(
            headers
                .iter()
                .filter(|name| *name != DATE_COLUMN)
                .map(str::to_string),
        );

        for record in reader.records() {
            let record = record.map_err(read_error)?;
            if record.len() > headers.len() {
                log::warn!(
                    "Dropping {} cell(s) beyond the header on line {}",
                    record.len() - headers.len(),
                    record.position().map_or(0, |p| p.line())
                );
            }
            let row: HistoryRow = headers
                .iter()
                .zip(record.iter())
                .map(|(column, value)| (column.to_string(), value.to_string()))
                .collect();
            history.rows.push(row);
        }

        log::debug!(
            "Read {} row(s) with {} building column(s) from {}",
            history.rows.len(),
            history.columns.len(),
            self.path.display()
        );
        Ok(history)
    }

    /// Adds `row` stamped with `date` and rewrites the whole file. Returns
    /// the history as written.
    pub fn append(&self, row: HistoryRow, date: NaiveDate) -> Result<History, HistoryError> {
        let mut history = self.read()?;
        history.push(row, date);
        self.write(&history)?;

        log::info!(
            "Wrote {} row(s) to {}",
            history.rows.len(),
            self.path.display()
        );
        Ok(history)
    }

    fn write(&self, history: &History) -> Result<(), HistoryError> {
        let write_error = |source| HistoryError::Write {
            path: self.path.clone(),
            source,
        };

        let header = history.header();
        let mut writer = csv::Writer::from_path(&self.path).map_err(write_error)?;
        writer.write_record(&header).map_err(write_error)?;

        for row in &history.rows {
            writer
                .write_record(
                    header
                        .iter()
                        .map(|column| row.get(*column).map_or("", String::as_str)),
                )
                .map_err(write_error)?;
        }

        writer.flush().map_err(|source| HistoryError::Flush {
            path: self.path.clone(),
            source,
        })
    }
}
