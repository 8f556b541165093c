use std::path::Path;
use std::sync::Arc;

pub fn run(data: &Path, host: &str, port: u16) {
    let dataset = Arc::new(super::load_dataset(data));

    let base = format!("http://{host}:{port}");

    println!("latencyscope server v{}", latencyscope_core::VERSION);
    println!("   {base}");
    println!(
        "   {} telemetry records across {} regions",
        dataset.len(),
        dataset.regions().len()
    );
    println!();
    println!("   Endpoints:");
    println!("     POST /latency-metrics  Per-region latency and uptime statistics");
    println!("     GET  /regions          Regions in the dataset with record counts");
    println!("     GET  /health           Health check");
    println!("     GET  /                 API index");
    println!();
    println!("   Example:");
    println!(
        "     curl -X POST {base}/latency-metrics -H 'content-type: application/json' \\"
    );
    println!("          -d '{{\"regions\": [\"us\", \"eu\"], \"threshold_ms\": 150}}'");
    println!();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(latencyscope_server::run_server(dataset, host, port)) {
        eprintln!("Error: server on {host}:{port} failed: {e}");
        std::process::exit(1);
    }
}
