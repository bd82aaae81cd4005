//! Mapping table export.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use iss_model::MappingTable;
use tracing::info;

use crate::error::{IngestError, Result};

/// Write `table` as CSV: core variable and label, one column per study, then
/// `Derivation` when the table carries one.
pub fn write_mapping_table<W: Write>(table: &MappingTable, writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(table.header())?;
    for record in table.records() {
        writer.write_record(record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_mapping_table_file(table: &MappingTable, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| IngestError::io(path, e))?;
    write_mapping_table(table, file)?;
    info!(
        path = %path.display(),
        rows = table.len(),
        derivation = table.has_derivation(),
        "exported mapping table"
    );
    Ok(())
}

/// Render `table` as CSV text.
pub fn mapping_table_to_csv(table: &MappingTable) -> Result<String> {
    let mut buffer = Vec::new();
    write_mapping_table(table, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
