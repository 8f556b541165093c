use std::path::Path;

pub fn run(data: &Path) {
    let dataset = super::load_dataset(data);
    let regions = dataset.regions();

    println!(
        "{} region(s), {} record(s) in {}:\n",
        regions.len(),
        dataset.len(),
        data.display()
    );
    for summary in &regions {
        println!("  {:<25} {:>8}", summary.region, summary.records);
    }
    if regions.is_empty() {
        println!("  (none found)");
    }
}
