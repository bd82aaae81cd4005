//! Core and study specification files.

use std::path::Path;

use iss_model::LabelSet;
use tracing::{debug, info};

use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::{IngestError, Result};

pub const VARIABLE_COLUMN: &str = "variable";
pub const LABEL_COLUMN: &str = "label";

/// Which side of the alignment a specification file is loaded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecRole {
    /// Every entry becomes a mapping table row, blank variables included.
    Core,
    /// Entries without a variable are dropped so no label maps to nothing.
    Study,
}

/// Build a label set from a parsed specification table.
///
/// # Errors
///
/// Returns [`IngestError::MissingRequiredColumn`] when the table lacks a
/// `variable` or `label` column.
pub fn label_set_from_table(name: &str, table: &CsvTable, role: SpecRole) -> Result<LabelSet> {
    let required = |column: &str| {
        table
            .column(column)
            .ok_or_else(|| IngestError::MissingRequiredColumn {
                dataset: name.to_string(),
                column: column.to_string(),
            })
    };
    let variable_idx = required(VARIABLE_COLUMN)?;
    let label_idx = required(LABEL_COLUMN)?;

    let mut set = LabelSet::new(name);
    let mut dropped = 0usize;
    for row in &table.rows {
        let variable = &row[variable_idx];
        if variable.is_empty() && role == SpecRole::Study {
            dropped += 1;
            continue;
        }
        set.push(row[label_idx].clone(), variable.clone());
    }
    if dropped > 0 {
        debug!(dataset = name, dropped, "dropped rows without a variable");
    }
    Ok(set)
}

/// Read a specification CSV with `variable` and `label` columns.
pub fn read_label_set(path: &Path, name: &str, role: SpecRole) -> Result<LabelSet> {
    let table = read_csv_table(path)?;
    let set = label_set_from_table(name, &table, role)?;
    info!(
        dataset = name,
        path = %path.display(),
        entries = set.len(),
        "loaded specification"
    );
    Ok(set)
}
