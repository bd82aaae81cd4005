use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Header row plus string cells of a CSV file.
///
/// Every row is padded or truncated to the header width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Position of the column named `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// All values of the column named `name`, in row order.
    pub fn column_values(&self, name: &str) -> Option<Vec<String>> {
        let idx = self.column(name)?;
        Some(self.rows.iter().map(|row| row[idx].clone()).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let table = read_csv_reader(file).map_err(|e| IngestError::csv(path, e))?;
    debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "read csv table"
    );
    Ok(table)
}

/// Parse CSV text from any reader. Blank lines are skipped.
pub fn read_csv_reader<R: Read>(reader: R) -> std::result::Result<CsvTable, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let row = (0..headers.len())
            .map(|idx| normalize_cell(record.get(idx).unwrap_or("")))
            .collect();
        rows.push(row);
    }
    Ok(CsvTable { headers, rows })
}
