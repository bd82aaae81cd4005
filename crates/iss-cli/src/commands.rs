use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info_span;

use iss_cli::workflow::{MatchRequest, RunReport, build_session, load_studies};
use iss_ingest::write_mapping_table_file;
use iss_map::{MatchOptions, StopWords};

use crate::cli::{MatchArgs, ReferenceArgs};
use crate::summary::apply_table_style;

pub fn run_match(args: &MatchArgs) -> Result<RunReport> {
    let span = info_span!("match", output = %args.output.display());
    let _guard = span.enter();

    let stop_words = if args.keep_stop_words {
        StopWords::None
    } else {
        StopWords::English
    };
    let options = MatchOptions::default()
        .with_threshold(args.threshold)?
        .with_stop_words(stop_words);
    let request = MatchRequest {
        core: args.core.clone(),
        studies: args.studies.clone(),
        resume: args.resume.clone(),
        edits: args.edits.clone(),
        derive: args.derive,
        options,
    };

    let (session, report) = build_session(&request)?;
    write_mapping_table_file(session.table(), &args.output)
        .with_context(|| format!("write {}", args.output.display()))?;
    Ok(report)
}

pub fn run_reference(args: &ReferenceArgs) -> Result<()> {
    let studies = load_studies(&args.studies)?;
    for (id, set) in studies {
        let index = set.index();
        println!("{id} ({} labels)", index.len());
        let mut table = Table::new();
        table.set_header(vec!["Label", "Variable"]);
        apply_table_style(&mut table);
        for (label, variable) in index.iter() {
            table.add_row(vec![label, variable]);
        }
        println!("{table}");
    }
    Ok(())
}
