//! Upload-to-export workflow: intake, bulk match, resume, edits, derivation.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use iss_ingest::{SpecRole, read_csv_table, read_label_set};
use iss_map::{MappingSession, MatchOptions};
use iss_model::{CellClass, LabelSet, MAIN_LABEL_COLUMN, MappingTable, StudyId, classify};
use serde::Serialize;
use tracing::{info, info_span, warn};

/// A study specification file with an optional explicit name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySource {
    pub name: Option<String>,
    pub path: PathBuf,
}

impl FromStr for StudySource {
    type Err = String;

    /// Parse `NAME=PATH` or `PATH`. A prefix holding a path separator is part
    /// of the path, so `data/run=2/study.csv` stays a plain path.
    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let named = raw
            .split_once('=')
            .filter(|(name, _)| !name.contains(['/', '\\']));
        match named {
            Some((name, path)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(format!("missing study name in '{raw}'"));
                }
                if path.trim().is_empty() {
                    return Err(format!("missing file path in '{raw}'"));
                }
                Ok(Self {
                    name: Some(name.to_string()),
                    path: PathBuf::from(path),
                })
            }
            None => Ok(Self {
                name: None,
                path: PathBuf::from(raw),
            }),
        }
    }
}

/// Inputs of one mapping run.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub core: PathBuf,
    pub studies: Vec<StudySource>,
    /// Previously exported table whose study and derivation columns are reused.
    pub resume: Option<PathBuf>,
    /// Exported table with edited labels and manual overrides.
    pub edits: Option<PathBuf>,
    pub derive: bool,
    pub options: MatchOptions,
}

/// What a run did, for the summary printout.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub rows: usize,
    pub resumed_columns: Vec<String>,
    pub rematched_rows: Vec<usize>,
    pub derivation: bool,
    pub studies: Vec<StudyCoverage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudyCoverage {
    pub study: String,
    pub candidates: usize,
    pub matched: usize,
    pub same_name: usize,
    pub empty: usize,
}

/// Read all study files, naming unnamed ones `Study1`, `Study2`, ... by position.
///
/// Any failure aborts the whole intake.
pub fn load_studies(sources: &[StudySource]) -> Result<Vec<(StudyId, LabelSet)>> {
    let mut studies = Vec::with_capacity(sources.len());
    for (position, source) in sources.iter().enumerate() {
        let id = match &source.name {
            Some(name) => StudyId::new(name.clone())?,
            None => StudyId::numbered(position),
        };
        let set = read_label_set(&source.path, id.as_str(), SpecRole::Study)
            .with_context(|| format!("load study {id} from {}", source.path.display()))?;
        studies.push((id, set));
    }
    Ok(studies)
}

/// Run intake and matching for `request`.
///
/// Nothing is built unless every input file passes intake.
pub fn build_session(request: &MatchRequest) -> Result<(MappingSession, RunReport)> {
    if request.studies.is_empty() {
        bail!("at least one study specification is required");
    }
    let span = info_span!("intake", core = %request.core.display());
    let (core, studies) = span.in_scope(|| -> Result<_> {
        let core = read_label_set(&request.core, "Core Specs", SpecRole::Core)
            .with_context(|| format!("load core specs from {}", request.core.display()))?;
        let studies = load_studies(&request.studies)?;
        Ok((core, studies))
    })?;

    let mut session = MappingSession::new(&core, studies, request.options)
        .context("build mapping table")?;
    let mut report = RunReport::default();

    if let Some(path) = &request.resume {
        let previous =
            read_csv_table(path).with_context(|| format!("load resume table {}", path.display()))?;
        report.resumed_columns = session.merge_resume(&previous.headers, &previous.rows);
    }

    if let Some(path) = &request.edits {
        report.rematched_rows = apply_edit_file(&mut session, path)?;
    }

    if request.derive {
        session.synthesize();
    }

    report.rows = session.table().len();
    report.derivation = session.table().has_derivation();
    report.studies = coverage(&session);
    info!(
        rows = report.rows,
        rematched = report.rematched_rows.len(),
        derivation = report.derivation,
        "mapping run complete"
    );
    Ok((session, report))
}

/// Merge overrides from an edited export, then rematch rows whose label changed.
fn apply_edit_file(session: &mut MappingSession, path: &Path) -> Result<Vec<usize>> {
    let edited =
        read_csv_table(path).with_context(|| format!("load edited table {}", path.display()))?;
    session.merge_resume(&edited.headers, &edited.rows);
    match edited.column_values(MAIN_LABEL_COLUMN) {
        Some(labels) => {
            if labels.len() != session.table().len() {
                warn!(
                    edited = labels.len(),
                    rows = session.table().len(),
                    "edited table row count differs from core specs"
                );
            }
            session.apply_labels(&labels);
            Ok(session.apply_edits())
        }
        None => {
            warn!(path = %path.display(), "edited table has no label column, nothing to rematch");
            Ok(Vec::new())
        }
    }
}

/// Per-study match counts of the current table.
pub fn coverage(session: &MappingSession) -> Vec<StudyCoverage> {
    let table: &MappingTable = session.table();
    session
        .studies()
        .iter()
        .enumerate()
        .map(|(position, study)| {
            let mut entry = StudyCoverage {
                study: study.id.to_string(),
                candidates: study.index.len(),
                matched: 0,
                same_name: 0,
                empty: 0,
            };
            for row in table.rows() {
                let value = row.match_at(position).unwrap_or_default();
                match classify(row, study.id.as_str(), value) {
                    CellClass::Empty => entry.empty += 1,
                    CellClass::Ok => {
                        entry.matched += 1;
                        entry.same_name += 1;
                    }
                    CellClass::Changed | CellClass::Default => entry.matched += 1,
                    CellClass::Key | CellClass::Derivation => {}
                }
            }
            entry
        })
        .collect()
}
