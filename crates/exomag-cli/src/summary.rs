//! Terminal rendering of run summaries and column listings.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use exomag_cli::types::RunSummary;
use exomag_model::TableVariant;
use exomag_transform::profile;

pub fn print_summary(result: &RunSummary) {
    println!("Mapping table: {}", result.variant);
    match &result.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run)"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Fetched"),
        header_cell("Excluded"),
        header_cell("Exported"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new(result.fetched),
        Cell::new(result.excluded),
        Cell::new(result.exported),
        Cell::new(result.columns),
    ]);
    println!("{table}");
}

pub fn print_columns() {
    for variant in [TableVariant::Inclusion, TableVariant::LabEntry] {
        let profile = profile(variant);
        println!("{variant} ({} columns)", profile.table.len());

        let mut table = Table::new();
        table.set_header(vec![
            header_cell("#"),
            header_cell("Destination"),
            header_cell("Source fields"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 0, CellAlignment::Right);
        for (index, mapping) in profile.table.mappings().iter().enumerate() {
            table.add_row(vec![
                Cell::new(index + 1),
                Cell::new(&mapping.destination),
                Cell::new(mapping.source_keys.join(", ")),
            ]);
        }
        println!("{table}");
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
