use std::path::Path;

use anyhow::Result;
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use iss_cli::workflow::{RunReport, StudyCoverage};

pub fn print_summary(report: &RunReport, output: &Path) {
    println!("Output: {}", output.display());
    if !report.resumed_columns.is_empty() {
        println!("Resumed columns: {}", report.resumed_columns.join(", "));
    }
    if !report.rematched_rows.is_empty() {
        println!("Rematched rows: {}", report.rematched_rows.len());
    }
    println!(
        "Derivation: {}",
        if report.derivation { "yes" } else { "no" }
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Study"),
        header_cell("Candidates"),
        header_cell("Matched"),
        header_cell("Same name"),
        header_cell("Empty"),
        header_cell("Coverage"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for study in &report.studies {
        table.add_row(vec![
            Cell::new(&study.study)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(study.candidates),
            count_cell(study.matched, Color::Green),
            count_cell(study.same_name, Color::Green),
            count_cell(study.empty, Color::Yellow),
            coverage_cell(study, report.rows),
        ]);
    }
    println!("{table}");
}

pub fn print_summary_json(report: &RunReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn coverage_cell(study: &StudyCoverage, rows: usize) -> Cell {
    if rows == 0 {
        return dim_cell("-");
    }
    #[allow(clippy::cast_precision_loss)]
    let percent = study.matched as f64 * 100.0 / rows as f64;
    Cell::new(format!("{percent:.1}%"))
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
