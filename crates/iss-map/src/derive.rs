//! Derivation synthesis.
//!
//! A derivation selects, per study identifier, the study variable matched for
//! a core row, e.g. `if (studyid = 'Study1' then AGE) or (studyid = 'Study2' then AGEYRS)`.

use iss_model::{MappingRow, MappingTable, StudyId};
use tracing::debug;

/// Compile the derivation of one row.
///
/// Studies are visited in registration order and studies without a match are
/// left out. A row without any match yields an empty string.
pub fn derivation_for(row: &MappingRow, studies: &[StudyId]) -> String {
    let clauses: Vec<String> = studies
        .iter()
        .zip(row.matches())
        .filter_map(|(study, value)| {
            let value = value.trim();
            (!value.is_empty()).then(|| format!("(studyid = '{study}' then {value})"))
        })
        .collect();
    if clauses.is_empty() {
        String::new()
    } else {
        format!("if {}", clauses.join(" or "))
    }
}

/// Fill the derivation column of every row from the current matches.
pub fn synthesize(table: &mut MappingTable) {
    let studies = table.studies().to_vec();
    let mut derived = 0usize;
    for row in table.rows_mut() {
        let derivation = derivation_for(row, &studies);
        if !derivation.is_empty() {
            derived += 1;
        }
        row.set_derivation(Some(derivation));
    }
    table.set_has_derivation(true);
    debug!(rows = table.len(), derived, "synthesized derivations");
}
