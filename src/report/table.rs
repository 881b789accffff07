//! Aligned table rendering.

use super::Report;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

/// Render a report as a table. Terminal output wraps to the screen width
/// and colours the status column.
pub fn to_table(report: &Report, terminal: bool) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(if terminal {
        ContentArrangement::Dynamic
    } else {
        ContentArrangement::Disabled
    });
    table.set_header(report.columns());

    for row in report.rows() {
        table.add_row(row.iter().enumerate().map(|(i, value)| {
            if terminal && report.status_column() == Some(i) {
                Cell::new(status_colour(value))
            } else {
                Cell::new(value)
            }
        }));
    }

    table.to_string()
}

fn status_colour(value: &str) -> String {
    if value == "yes" {
        value.green().to_string()
    } else if value.starts_with("no") {
        value.yellow().to_string()
    } else {
        value.to_string()
    }
}
