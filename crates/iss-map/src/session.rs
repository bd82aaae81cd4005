//! Mapping session state for interactive alignment workflows.
//!
//! A [`MappingSession`] owns the [`MappingTable`] of one upload together with
//! the study reference listings and the baseline labels used to detect edits.
//! Edits are handled in two explicit steps: [`MappingSession::detect_changes`]
//! lists the edited rows, [`MappingSession::rematch`] re-scores them.

use iss_model::{
    DERIVATION_COLUMN, LabelIndex, LabelSet, MAIN_LABEL_COLUMN, MAIN_VARIABLE_COLUMN,
    MappingTable, StudyId,
};
use tracing::{debug, info, info_span, trace};

use crate::derive::synthesize;
use crate::error::Result;
use crate::score::SimilarityScorer;
use crate::select::{MatchOptions, MatchSelector};

/// Label listing of one registered study.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyReference {
    pub id: StudyId,
    pub index: LabelIndex,
}

#[derive(Debug, Clone)]
pub struct MappingSession {
    table: MappingTable,
    studies: Vec<StudyReference>,
    /// Label of each row when it was last matched.
    baseline: Vec<String>,
    scorer: SimilarityScorer,
    selector: MatchSelector,
}

impl MappingSession {
    /// Build the table and run the bulk match for every study.
    ///
    /// # Errors
    ///
    /// Fails on an out-of-range threshold or a study registered twice.
    pub fn new(
        core: &LabelSet,
        studies: Vec<(StudyId, LabelSet)>,
        options: MatchOptions,
    ) -> Result<Self> {
        let selector = options.selector()?;
        let ids = studies.iter().map(|(id, _)| id.clone()).collect();
        let table = MappingTable::new(core, ids)?;
        let studies = studies
            .into_iter()
            .map(|(id, set)| StudyReference {
                id,
                index: set.index(),
            })
            .collect();
        let baseline = table.rows().iter().map(|r| r.main_label().to_string()).collect();

        let mut session = Self {
            table,
            studies,
            baseline,
            scorer: options.scorer(),
            selector,
        };
        session.bulk_match();
        Ok(session)
    }

    /// Score all rows against each study with one vector space per study,
    /// fitted on every core label plus that study's labels.
    fn bulk_match(&mut self) {
        let labels: Vec<String> = self
            .table
            .rows()
            .iter()
            .map(|r| r.main_label().to_string())
            .collect();
        for (position, study) in self.studies.iter().enumerate() {
            let span = info_span!("bulk_match", study = %study.id);
            let _guard = span.enter();
            let scores = self.scorer.score_batch(&labels, study.index.labels());
            let mut accepted = 0usize;
            for (row_idx, row_scores) in scores.iter().enumerate() {
                let matched = self
                    .selector
                    .select_variable(row_scores, &study.index)
                    .unwrap_or_default();
                if !matched.is_empty() {
                    accepted += 1;
                }
                if let Some(row) = self.table.row_mut(row_idx) {
                    row.set_match_at(position, matched);
                }
            }
            info!(
                rows = labels.len(),
                candidates = study.index.len(),
                accepted,
                "matched study"
            );
        }
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    pub fn into_table(self) -> MappingTable {
        self.table
    }

    pub fn baseline(&self) -> &[String] {
        &self.baseline
    }

    pub fn threshold(&self) -> f64 {
        self.selector.threshold()
    }

    pub fn studies(&self) -> &[StudyReference] {
        &self.studies
    }

    /// Read-only label listing of `study`.
    pub fn reference(&self, study: &str) -> Option<&LabelIndex> {
        self.studies
            .iter()
            .find(|s| s.id.as_str() == study)
            .map(|s| &s.index)
    }

    /// Replace the label of one row without rematching it.
    ///
    /// # Errors
    ///
    /// Fails when `row` is out of range.
    pub fn edit_label(&mut self, row: usize, label: impl Into<String>) -> Result<()> {
        let len = self.table.len();
        let target = self
            .table
            .row_mut(row)
            .ok_or(iss_model::ModelError::RowOutOfRange { index: row, len })?;
        target.set_main_label(label);
        Ok(())
    }

    /// Copy labels onto rows by position. Extra labels are ignored.
    ///
    /// Returns the number of rows written.
    pub fn apply_labels<S: AsRef<str>>(&mut self, labels: &[S]) -> usize {
        let mut applied = 0;
        for (row, label) in self.table.rows_mut().zip(labels) {
            row.set_main_label(label.as_ref());
            applied += 1;
        }
        applied
    }

    /// Manually override one match cell. The override holds until the row's
    /// label is edited and rematched.
    ///
    /// # Errors
    ///
    /// Fails when the row or study does not exist.
    pub fn set_match(&mut self, row: usize, study: &str, value: impl Into<String>) -> Result<()> {
        self.table.set_match(row, study, value)?;
        Ok(())
    }

    /// Rows whose label differs from its baseline, ignoring surrounding
    /// whitespace.
    pub fn detect_changes(&self) -> Vec<usize> {
        self.table
            .rows()
            .iter()
            .zip(&self.baseline)
            .enumerate()
            .filter(|(_, (row, baseline))| row.main_label().trim() != baseline.trim())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Re-score the given rows against every study and overwrite their match
    /// cells. Each row is scored in its own vector space fitted on its label
    /// plus the study labels. Indices past the end of the table are skipped.
    ///
    /// Returns the number of rows rematched.
    pub fn rematch(&mut self, rows: &[usize]) -> usize {
        let mut rematched = 0;
        for &idx in rows {
            let Some(row) = self.table.row_mut(idx) else {
                debug!(row = idx, "skipping rematch of missing row");
                continue;
            };
            let span = info_span!("rematch", row = idx, variable = %row.main_variable());
            let _guard = span.enter();
            let label = row.main_label().to_string();
            trace!(label = %label, "rematching row");
            for (position, study) in self.studies.iter().enumerate() {
                let scores = self.scorer.score(&label, study.index.labels());
                let matched = self
                    .selector
                    .select_variable(&scores, &study.index)
                    .unwrap_or_default();
                debug!(study = %study.id, matched, "rematched study");
                row.set_match_at(position, matched);
            }
            if let Some(baseline) = self.baseline.get_mut(idx) {
                *baseline = label;
            }
            rematched += 1;
        }
        rematched
    }

    /// Detect edited rows and rematch them. Returns the rematched indices.
    pub fn apply_edits(&mut self) -> Vec<usize> {
        let changed = self.detect_changes();
        if !changed.is_empty() {
            info!(rows = changed.len(), "rematching edited labels");
            self.rematch(&changed);
        }
        changed
    }

    /// Compile the derivation column from the current matches.
    pub fn synthesize(&mut self) {
        synthesize(&mut self.table);
    }

    /// Copy study and derivation columns of a previously exported table onto
    /// this session by row position.
    ///
    /// Only columns named like a registered study, plus `Derivation`, are
    /// copied; the core variable and label columns never are. Rows missing
    /// from `rows` get empty cells in the copied columns.
    ///
    /// Returns the names of the merged columns.
    pub fn merge_resume(&mut self, headers: &[String], rows: &[Vec<String>]) -> Vec<String> {
        let mut merged = Vec::new();
        for (col_idx, header) in headers.iter().enumerate() {
            if header == MAIN_VARIABLE_COLUMN || header == MAIN_LABEL_COLUMN {
                continue;
            }
            let cell = |row_idx: usize| -> String {
                rows.get(row_idx)
                    .and_then(|r| r.get(col_idx))
                    .cloned()
                    .unwrap_or_default()
            };
            if header == DERIVATION_COLUMN {
                for (row_idx, row) in self.table.rows_mut().enumerate() {
                    row.set_derivation(Some(cell(row_idx)));
                }
                self.table.set_has_derivation(true);
                merged.push(header.clone());
            } else if let Some(position) = self.table.study_position(header) {
                for (row_idx, row) in self.table.rows_mut().enumerate() {
                    row.set_match_at(position, cell(row_idx));
                }
                merged.push(header.clone());
            }
        }
        info!(columns = ?merged, "merged resumed columns");
        merged
    }
}
