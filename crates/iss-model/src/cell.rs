//! Display classification of mapping table cells.
//!
//! The display layer picks a colour per class; nothing here feeds back into
//! matching.

use serde::{Deserialize, Serialize};

use crate::{DERIVATION_COLUMN, MAIN_LABEL_COLUMN, MAIN_VARIABLE_COLUMN, MappingRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellClass {
    /// Core variable or core label column.
    Key,
    /// Derivation column.
    Derivation,
    /// Matched variable equals the core variable name.
    Ok,
    /// No match.
    Empty,
    /// The row's label was edited since it was loaded.
    Changed,
    /// Matched to a differently named variable.
    Default,
}

impl CellClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Derivation => "derivation",
            Self::Ok => "ok",
            Self::Empty => "empty",
            Self::Changed => "changed",
            Self::Default => "default",
        }
    }
}

/// Classify `value` shown in `column` of `row`.
///
/// `column` is a study identifier for match cells. The fixed columns classify
/// by column alone.
pub fn classify(row: &MappingRow, column: &str, value: &str) -> CellClass {
    if column == MAIN_VARIABLE_COLUMN || column == MAIN_LABEL_COLUMN {
        CellClass::Key
    } else if column == DERIVATION_COLUMN {
        CellClass::Derivation
    } else if value.trim().is_empty() {
        CellClass::Empty
    } else if row.label_changed() {
        CellClass::Changed
    } else if value == row.main_variable() {
        CellClass::Ok
    } else {
        CellClass::Default
    }
}
