//! CLI argument definitions for the specification mapper.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use iss_map::DEFAULT_THRESHOLD;

use iss_cli::workflow::StudySource;

#[derive(Parser)]
#[command(
    name = "iss-mapper",
    version,
    about = "Align study variable specifications to a core specification",
    long_about = "Match every core label against each study specification by TF-IDF cosine \
                  similarity.\n\n\
                  Writes a mapping table with one column per study and, optionally, a \
                  Derivation column of conditional expressions keyed on study id."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Match a core specification against study specifications and export the table.
    Match(MatchArgs),

    /// List the label to variable reference of each study specification.
    Reference(ReferenceArgs),
}

#[derive(Parser)]
pub struct MatchArgs {
    /// Core specification CSV with `variable` and `label` columns.
    #[arg(long = "core", value_name = "FILE")]
    pub core: PathBuf,

    /// Study specification CSV, optionally named as NAME=FILE. Repeat per study.
    #[arg(long = "study", value_name = "[NAME=]FILE", required = true)]
    pub studies: Vec<StudySource>,

    /// Previously exported mapping table to resume from.
    #[arg(long = "resume", value_name = "FILE")]
    pub resume: Option<PathBuf>,

    /// Edited mapping table; changed labels are rematched, study cells are kept.
    #[arg(long = "edits", value_name = "FILE")]
    pub edits: Option<PathBuf>,

    /// Add the Derivation column.
    #[arg(long = "derive")]
    pub derive: bool,

    /// Output path for the mapping table.
    #[arg(long = "output", value_name = "FILE", default_value = "matched_result.csv")]
    pub output: PathBuf,

    /// Acceptance threshold; a candidate must score strictly above it.
    #[arg(long = "threshold", value_name = "SCORE", default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Keep English function words when building term vectors.
    #[arg(long = "keep-stop-words")]
    pub keep_stop_words: bool,

    /// Format of the coverage summary printed after export.
    #[arg(long = "summary-format", value_enum, default_value = "table")]
    pub summary_format: SummaryFormatArg,
}

#[derive(Parser)]
pub struct ReferenceArgs {
    /// Study specification CSV, optionally named as NAME=FILE. Repeat per study.
    #[arg(long = "study", value_name = "[NAME=]FILE", required = true)]
    pub studies: Vec<StudySource>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SummaryFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
