//! Summary command implementation

use crate::cli::output::{format_summary_json, format_summary_table};
use crate::cli::SummaryArgs;
use crate::dataset::DatasetSnapshot;
use crate::degradation::unit_lifespans;

/// Handle `engine-twin summary` command
///
/// Returns the rendered summary; an unavailable dataset is an error so the
/// binary exits non-zero.
pub fn handle_summary(args: &SummaryArgs) -> Result<String, Box<dyn std::error::Error>> {
    let snapshot = DatasetSnapshot::load(Some(&args.path));

    match snapshot.summary() {
        Some(summary) if args.json => Ok(format_summary_json(summary)?),
        Some(summary) => {
            let unit_life = snapshot.table().and_then(|table| {
                let lifespans = unit_lifespans(table);
                Some((*lifespans.values().min()?, *lifespans.values().max()?))
            });
            Ok(format_summary_table(&args.path, summary, unit_life))
        }
        None => Err(snapshot
            .reason()
            .unwrap_or("dataset unavailable")
            .to_string()
            .into()),
    }
}
