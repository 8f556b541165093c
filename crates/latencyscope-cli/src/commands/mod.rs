pub mod query;
pub mod regions;
pub mod serve;

use std::path::Path;

use latencyscope_core::TelemetryDataset;

/// Load the telemetry dataset or exit. No partial dataset is ever served.
pub fn load_dataset(path: &Path) -> TelemetryDataset {
    match TelemetryDataset::load(path) {
        Ok(dataset) => {
            if dataset.is_empty() {
                log::warn!("{} contains no telemetry records", path.display());
            }
            dataset
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
