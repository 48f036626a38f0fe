use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use screener_cli::commands::FilterOutcome;
use screener_model::FilterResponse;

/// Print pass counts and per-rule rejections to stderr.
pub fn print_summary(outcome: &FilterOutcome) {
    match &outcome.response {
        FilterResponse::Success {
            original_count,
            filtered_count,
            ..
        } => {
            eprintln!("Records: {original_count} in, {filtered_count} kept");
        }
        FilterResponse::Error { error_message, .. } => {
            eprintln!(
                "Filter failed ({error_message}); {} records returned unfiltered",
                outcome.original_count()
            );
            return;
        }
    }
    if outcome.rule_stats.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Condition"),
        header_cell("Rejected"),
        header_cell("Faults"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for stats in &outcome.rule_stats {
        table.add_row(vec![
            Cell::new(&stats.rule_name),
            Cell::new(stats.condition),
            Cell::new(stats.rejected),
            Cell::new(stats.faults),
        ]);
    }
    eprintln!("{table}");
}

/// Two-column input/output table.
pub fn print_pairs<T: ToString>(left: &str, right: &str, rows: &[(String, T)]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell(left), header_cell(right)]);
    apply_table_style(&mut table);
    for (input, output) in rows {
        table.add_row(vec![input.clone(), output.to_string()]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
