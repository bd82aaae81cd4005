//! Flat CSV exchange for the mapping engine.
//!
//! Reads core/study specification files into label sets, reads previously
//! exported tables for resume and label edits, and writes mapping tables.

pub mod csv_table;
pub mod error;
pub mod export;
pub mod spec_file;

pub use csv_table::{CsvTable, read_csv_reader, read_csv_table};
pub use error::{IngestError, Result};
pub use export::{mapping_table_to_csv, write_mapping_table, write_mapping_table_file};
pub use spec_file::{
    LABEL_COLUMN, SpecRole, VARIABLE_COLUMN, label_set_from_table, read_label_set,
};
