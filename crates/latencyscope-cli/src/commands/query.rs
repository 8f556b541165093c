use std::path::Path;

use latencyscope_core::query;

pub fn run(data: &Path, regions: &[String], threshold_ms: i64) {
    let dataset = super::load_dataset(data);
    let report = query(&dataset, regions, threshold_ms as f64);
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: failed to encode report: {e}");
            std::process::exit(1);
        }
    }
}
