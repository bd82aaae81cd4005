//! Integration tests for the mapping workflow.

use std::fs;
use std::path::{Path, PathBuf};

use iss_cli::workflow::{MatchRequest, StudySource, build_session, load_studies};
use iss_ingest::{read_csv_table, write_mapping_table_file};
use iss_map::MatchOptions;

const CORE: &str = "variable,label\n\
                    AGE,Age\n\
                    SEX,Sex\n\
                    SUBJID,Subject Identifier for the Study\n";
const STUDY1: &str = "variable,label\n\
                      AGE,Age in years\n\
                      SEX,Gender\n\
                      SUBJID,Subject Identifier\n";
const STUDY2: &str = "variable,label\n\
                      AGEYRS,Age at consent\n\
                      SUBJNO,Subject number\n";

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn source(path: PathBuf) -> StudySource {
    StudySource { name: None, path }
}

fn request(dir: &Path) -> MatchRequest {
    MatchRequest {
        core: write(dir, "core.csv", CORE),
        studies: vec![
            source(write(dir, "study1.csv", STUDY1)),
            source(write(dir, "study2.csv", STUDY2)),
        ],
        resume: None,
        edits: None,
        derive: false,
        options: MatchOptions::default(),
    }
}

#[test]
fn unnamed_studies_are_numbered_by_position() {
    let dir = tempfile::tempdir().unwrap();
    let studies = load_studies(&[
        source(write(dir.path(), "a.csv", STUDY1)),
        StudySource {
            name: Some("Pivotal".to_string()),
            path: write(dir.path(), "b.csv", STUDY2),
        },
        source(write(dir.path(), "c.csv", STUDY2)),
    ])
    .unwrap();
    let names: Vec<_> = studies.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(names, ["Study1", "Pivotal", "Study3"]);
}

#[test]
fn bulk_run_reports_coverage_per_study() {
    let dir = tempfile::tempdir().unwrap();
    let (session, report) = build_session(&request(dir.path())).unwrap();

    assert_eq!(session.table().get_match(0, "Study1"), Some("AGE"));
    assert_eq!(session.table().get_match(0, "Study2"), Some("AGEYRS"));
    assert_eq!(report.rows, 3);
    assert!(!report.derivation);

    let study1 = &report.studies[0];
    assert_eq!(study1.study, "Study1");
    assert_eq!(study1.candidates, 3);
    assert_eq!((study1.matched, study1.same_name, study1.empty), (2, 2, 1));
    let study2 = &report.studies[1];
    assert_eq!((study2.matched, study2.same_name, study2.empty), (1, 0, 2));
}

#[test]
fn derive_adds_the_derivation_column() {
    let dir = tempfile::tempdir().unwrap();
    let mut request = request(dir.path());
    request.derive = true;
    let (session, report) = build_session(&request).unwrap();

    assert!(report.derivation);
    let table = session.table();
    assert_eq!(
        table.row(0).unwrap().derivation(),
        Some("if (studyid = 'Study1' then AGE) or (studyid = 'Study2' then AGEYRS)")
    );
    assert_eq!(table.row(1).unwrap().derivation(), Some(""));
    assert_eq!(table.header().last().map(String::as_str), Some("Derivation"));
}

#[test]
fn repeated_core_variable_keeps_one_row_per_entry() {
    let dir = tempfile::tempdir().unwrap();
    let mut request = request(dir.path());
    request.core = write(
        dir.path(),
        "core_repeated.csv",
        "variable,label\n\
         USUBJID,Unique Subject Identifier\n\
         AGE,Age\n\
         USUBJID,Unique Subject Identifier\n",
    );

    let (session, report) = build_session(&request).unwrap();

    assert_eq!(report.rows, 3);
    let variables: Vec<_> = session
        .table()
        .rows()
        .iter()
        .map(iss_model::MappingRow::main_variable)
        .collect();
    assert_eq!(variables, ["USUBJID", "AGE", "USUBJID"]);
    assert_eq!(session.table().get_match(1, "Study1"), Some("AGE"));
}

#[test]
fn core_row_without_variable_is_kept_and_matched() {
    let dir = tempfile::tempdir().unwrap();
    let mut request = request(dir.path());
    request.core = write(dir.path(), "core_blank.csv", "variable,label\n,Age\nSEX,Sex\n");

    let (session, report) = build_session(&request).unwrap();
    let table = session.table();

    assert_eq!(report.rows, 2);
    assert_eq!(table.row(0).unwrap().main_variable(), "");
    assert_eq!(table.get_match(0, "Study1"), Some("AGE"));
    assert_eq!(table.row(1).unwrap().main_variable(), "SEX");
}

#[test]
fn missing_label_column_aborts_before_matching() {
    let dir = tempfile::tempdir().unwrap();
    let mut request = request(dir.path());
    request.studies[1] = source(write(dir.path(), "broken.csv", "variable,name\nAGE,Age\n"));

    let err = build_session(&request).unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("Study2 must contain a 'label' column"), "{message}");
}

#[test]
fn resume_restores_study_cells_and_derivation() {
    let dir = tempfile::tempdir().unwrap();
    let previous = write(
        dir.path(),
        "previous.csv",
        "Main Variable,Main Label,Study1,Study2,Derivation\n\
         IGNORED,Ignored,AGE,MANUAL,custom\n\
         SEX,Sex,SEX,,\n",
    );
    let mut request = request(dir.path());
    request.resume = Some(previous);

    let (session, report) = build_session(&request).unwrap();
    let table = session.table();

    assert_eq!(report.resumed_columns, ["Study1", "Study2", "Derivation"]);
    assert_eq!(table.row(0).unwrap().main_variable(), "AGE");
    assert_eq!(table.get_match(0, "Study2"), Some("MANUAL"));
    assert_eq!(table.get_match(1, "Study1"), Some("SEX"));
    assert_eq!(table.get_match(2, "Study1"), Some(""));
    assert_eq!(table.row(0).unwrap().derivation(), Some("custom"));
    assert!(table.has_derivation());
}

#[test]
fn edited_export_rematches_only_changed_labels() {
    let dir = tempfile::tempdir().unwrap();
    let (first, _) = build_session(&request(dir.path())).unwrap();
    let exported = dir.path().join("matched_result.csv");
    write_mapping_table_file(first.table(), &exported).unwrap();

    let text = fs::read_to_string(&exported)
        .unwrap()
        .replace("SEX,Sex,,", "SEX,Gender,,")
        .replace("AGE,Age,AGE,AGEYRS", "AGE,Age,AGE,MANUAL");
    let edits = write(dir.path(), "edited.csv", &text);

    let mut request = request(dir.path());
    request.edits = Some(edits);
    let (session, report) = build_session(&request).unwrap();
    let table = session.table();

    assert_eq!(report.rematched_rows, [1]);
    assert_eq!(table.row(1).unwrap().main_label(), "Gender");
    assert_eq!(table.get_match(1, "Study1"), Some("SEX"));
    assert_eq!(table.get_match(0, "Study2"), Some("MANUAL"));
}

#[test]
fn exported_run_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut request = request(dir.path());
    request.derive = true;
    let (session, _) = build_session(&request).unwrap();
    let path = dir.path().join("out.csv");
    write_mapping_table_file(session.table(), &path).unwrap();

    let table = read_csv_table(&path).unwrap();
    insta::assert_json_snapshot!(table.headers, @r#"
    [
      "Main Variable",
      "Main Label",
      "Study1",
      "Study2",
      "Derivation"
    ]
    "#);
    assert_eq!(table.column_values("Study1").unwrap(), ["AGE", "", "SUBJID"]);
}
