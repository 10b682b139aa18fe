//! Output formatting helpers for CLI commands

use crate::degradation::MetricsSummary;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::path::Path;

/// Format a summary as a two-column table
///
/// `unit_life` is the (shortest, longest) max cycle over all units.
pub fn format_summary_table(
    source: &Path,
    summary: &MetricsSummary,
    unit_life: Option<(i64, i64)>,
) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Value"]);

    let slope = summary.mean_sensor_degradation_slope;
    let slope_str = format!("{:+.6}", slope);
    let slope_cell = if slope > 0.0 {
        slope_str.red().to_string()
    } else {
        slope_str.green().to_string()
    };

    table.add_row(vec![Cell::new("Rows"), Cell::new(summary.rows)]);
    table.add_row(vec![Cell::new("Units"), Cell::new(summary.units)]);
    table.add_row(vec![Cell::new("Sensors"), Cell::new(summary.num_sensors)]);
    table.add_row(vec![
        Cell::new("Mean RUL"),
        Cell::new(format!("{:.2}", summary.mean_rul)),
    ]);
    table.add_row(vec![
        Cell::new("Max RUL"),
        Cell::new(format!("{:.0}", summary.max_rul)),
    ]);
    table.add_row(vec![
        Cell::new("Min RUL"),
        Cell::new(format!("{:.0}", summary.min_rul)),
    ]);
    if let Some((shortest, longest)) = unit_life {
        table.add_row(vec![
            Cell::new("Unit life (cycles)"),
            Cell::new(format!("{} - {}", shortest, longest)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Mean sensor degradation slope"),
        Cell::new(slope_cell),
    ]);

    format!("{}\n{}", source.display().to_string().bold(), table)
}

/// Format a summary as pretty JSON
pub fn format_summary_json(summary: &MetricsSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}
