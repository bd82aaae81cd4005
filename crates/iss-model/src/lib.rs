//! Data model for aligning study variable specifications against a core
//! specification.
//!
//! A [`LabelSet`] holds the raw label/variable pairs of one dataset, a
//! [`MappingTable`] holds one [`MappingRow`] per core variable with one match
//! cell per registered study.

pub mod cell;
pub mod error;
pub mod ids;
pub mod label;
pub mod table;

pub use cell::{CellClass, classify};
pub use error::{ModelError, Result};
pub use ids::StudyId;
pub use label::{LabelEntry, LabelIndex, LabelSet};
pub use table::{
    DERIVATION_COLUMN, MAIN_LABEL_COLUMN, MAIN_VARIABLE_COLUMN, MappingRow, MappingTable,
};
