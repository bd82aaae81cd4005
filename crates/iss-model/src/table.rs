//! The mapping table: one row per core variable, one match cell per study.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{LabelSet, ModelError, Result, StudyId};

pub const MAIN_VARIABLE_COLUMN: &str = "Main Variable";
pub const MAIN_LABEL_COLUMN: &str = "Main Label";
pub const DERIVATION_COLUMN: &str = "Derivation";

/// One canonical variable and its matched study variables.
///
/// `matches` is positional: entry `i` belongs to the `i`-th study of the
/// owning [`MappingTable`]. An empty string means "no match".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRow {
    main_variable: String,
    main_label: String,
    original_label: String,
    matches: Vec<String>,
    derivation: Option<String>,
}

impl MappingRow {
    fn new(main_variable: String, main_label: String, study_count: usize) -> Self {
        Self {
            main_variable,
            original_label: main_label.clone(),
            main_label,
            matches: vec![String::new(); study_count],
            derivation: None,
        }
    }

    pub fn main_variable(&self) -> &str {
        &self.main_variable
    }

    pub fn main_label(&self) -> &str {
        &self.main_label
    }

    pub fn set_main_label(&mut self, label: impl Into<String>) {
        self.main_label = label.into();
    }

    /// Whether the label differs (ignoring surrounding whitespace) from the
    /// label the row was created with.
    pub fn label_changed(&self) -> bool {
        self.main_label.trim() != self.original_label.trim()
    }

    /// Match cells in study registration order.
    pub fn matches(&self) -> &[String] {
        &self.matches
    }

    pub fn match_at(&self, study_position: usize) -> Option<&str> {
        self.matches.get(study_position).map(String::as_str)
    }

    /// Overwrite the match cell of the study at `study_position`.
    ///
    /// Returns `false` when the position is not a registered study.
    pub fn set_match_at(&mut self, study_position: usize, value: impl Into<String>) -> bool {
        match self.matches.get_mut(study_position) {
            Some(cell) => {
                *cell = value.into();
                true
            }
            None => false,
        }
    }

    pub fn derivation(&self) -> Option<&str> {
        self.derivation.as_deref()
    }

    pub fn set_derivation(&mut self, derivation: Option<String>) {
        self.derivation = derivation;
    }
}

/// Ordered rows of canonical variables aligned against a fixed set of studies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingTable {
    studies: Vec<StudyId>,
    rows: Vec<MappingRow>,
    has_derivation: bool,
}

impl MappingTable {
    /// Create an unmatched table with one row per core entry.
    ///
    /// Rows are addressed by position, so a core variable may appear on more
    /// than one row.
    ///
    /// # Errors
    ///
    /// Fails when a study is registered twice.
    pub fn new(core: &LabelSet, studies: Vec<StudyId>) -> Result<Self> {
        let mut seen_studies = HashSet::new();
        for study in &studies {
            if !seen_studies.insert(study.as_str()) {
                return Err(ModelError::DuplicateStudy(study.to_string()));
            }
        }
        let rows = core
            .entries()
            .iter()
            .map(|entry| {
                MappingRow::new(entry.variable.clone(), entry.label.clone(), studies.len())
            })
            .collect();
        Ok(Self {
            studies,
            rows,
            has_derivation: false,
        })
    }

    pub fn studies(&self) -> &[StudyId] {
        &self.studies
    }

    pub fn study_position(&self, study: &str) -> Option<usize> {
        self.studies.iter().position(|s| s.as_str() == study)
    }

    pub fn rows(&self) -> &[MappingRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&MappingRow> {
        self.rows.get(index)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut MappingRow> {
        self.rows.get_mut(index)
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut MappingRow> {
        self.rows.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Matched variable for `study` on row `index`.
    pub fn get_match(&self, index: usize, study: &str) -> Option<&str> {
        let pos = self.study_position(study)?;
        self.rows.get(index)?.match_at(pos)
    }

    /// Write a match cell directly.
    ///
    /// # Errors
    ///
    /// Fails when the row or study does not exist.
    pub fn set_match(&mut self, index: usize, study: &str, value: impl Into<String>) -> Result<()> {
        let pos = self
            .study_position(study)
            .ok_or_else(|| ModelError::UnknownStudy(study.to_string()))?;
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(ModelError::RowOutOfRange { index, len })?;
        row.set_match_at(pos, value);
        Ok(())
    }

    /// Whether the derivation column is part of the table.
    pub fn has_derivation(&self) -> bool {
        self.has_derivation
    }

    pub fn set_has_derivation(&mut self, present: bool) {
        self.has_derivation = present;
    }

    /// Column names in export order.
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.studies.len() + 3);
        header.push(MAIN_VARIABLE_COLUMN.to_string());
        header.push(MAIN_LABEL_COLUMN.to_string());
        header.extend(self.studies.iter().map(ToString::to_string));
        if self.has_derivation {
            header.push(DERIVATION_COLUMN.to_string());
        }
        header
    }

    /// Row cells in export order, aligned with [`Self::header`].
    pub fn records(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.rows.iter().map(move |row| {
            let mut record = Vec::with_capacity(row.matches.len() + 3);
            record.push(row.main_variable());
            record.push(row.main_label());
            record.extend(row.matches.iter().map(String::as_str));
            if self.has_derivation {
                record.push(row.derivation().unwrap_or(""));
            }
            record
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn studies(names: &[&str]) -> Vec<StudyId> {
        names.iter().map(|n| StudyId::new(*n).unwrap()).collect()
    }

    fn core() -> LabelSet {
        LabelSet::from_pairs("core", [("Age", "AGE"), ("Sex", "SEX")])
    }

    #[test]
    fn new_table_has_empty_cells_for_every_study() {
        let table = MappingTable::new(&core(), studies(&["Study1", "Study2"])).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.row(0).unwrap().matches(), ["", ""]);
        assert_eq!(table.get_match(1, "Study2"), Some(""));
        assert!(!table.has_derivation());
    }

    #[test]
    fn duplicate_study_is_rejected() {
        let err = MappingTable::new(&core(), studies(&["Study1", "Study1"])).unwrap_err();
        assert_eq!(err, ModelError::DuplicateStudy("Study1".to_string()));
    }

    #[test]
    fn repeated_core_variable_keeps_every_row() {
        let core = LabelSet::from_pairs(
            "core",
            [
                ("Unique Subject Identifier", "USUBJID"),
                ("Age", "AGE"),
                ("Unique Subject Identifier", "USUBJID"),
            ],
        );
        let mut table = MappingTable::new(&core, studies(&["Study1"])).unwrap();
        assert_eq!(table.len(), 3);
        table.set_match(2, "Study1", "SUBJ").unwrap();
        assert_eq!(table.get_match(0, "Study1"), Some(""));
        assert_eq!(table.get_match(2, "Study1"), Some("SUBJ"));
        assert_eq!(table.row(2).unwrap().main_variable(), "USUBJID");
    }

    #[test]
    fn blank_core_variable_keeps_its_row() {
        let mut core = LabelSet::new("core");
        core.push("Age", "");
        core.push("Sex", "SEX");
        let table = MappingTable::new(&core, studies(&["Study1"])).unwrap();
        let first: Vec<&str> = table.records().next().unwrap();
        assert_eq!(first, ["", "Age", ""]);
    }

    #[test]
    fn set_match_reports_unknown_targets() {
        let mut table = MappingTable::new(&core(), studies(&["Study1"])).unwrap();
        table.set_match(0, "Study1", "AGE").unwrap();
        assert_eq!(table.get_match(0, "Study1"), Some("AGE"));
        assert_eq!(
            table.set_match(0, "Study9", "X"),
            Err(ModelError::UnknownStudy("Study9".to_string()))
        );
        assert_eq!(
            table.set_match(5, "Study1", "X"),
            Err(ModelError::RowOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn label_changed_ignores_surrounding_whitespace() {
        let mut table = MappingTable::new(&core(), studies(&["Study1"])).unwrap();
        let row = table.row_mut(0).unwrap();
        row.set_main_label("  Age ");
        assert!(!row.label_changed());
        row.set_main_label("Age in years");
        assert!(row.label_changed());
    }

    #[test]
    fn header_includes_derivation_only_when_present() {
        let mut table = MappingTable::new(&core(), studies(&["Study1", "Study2"])).unwrap();
        assert_eq!(
            table.header(),
            ["Main Variable", "Main Label", "Study1", "Study2"]
        );
        table.set_has_derivation(true);
        assert_eq!(table.header().last().map(String::as_str), Some("Derivation"));
        let first: Vec<&str> = table.records().next().unwrap();
        assert_eq!(first, ["AGE", "Age", "", "", ""]);
    }
}
