//! CLI for latencyscope: per-region latency and uptime metrics over a telemetry file.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "latencyscope")]
#[command(about = "latencyscope: per-region latency and uptime metrics")]
#[command(version = latencyscope_core::VERSION)]
struct Cli {
    /// Telemetry dataset (JSON array of records)
    #[arg(long, global = true, env = "LATENCYSCOPE_DATA", default_value = "telemetry.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP metrics server
    Serve {
        /// Bind address
        #[arg(long, env = "LATENCYSCOPE_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port
        #[arg(long, env = "LATENCYSCOPE_PORT", default_value = "8000")]
        port: u16,
    },

    /// Compute metrics once and print them as JSON
    Query {
        /// Comma-separated region list, e.g. "us,eu"
        #[arg(long, value_delimiter = ',', required = true)]
        regions: Vec<String>,

        /// Latency above which a record counts as a breach
        #[arg(long, allow_negative_numbers = true)]
        threshold: i64,
    },

    /// List the regions present in the dataset
    Regions,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => commands::serve::run(&cli.data, &host, port),
        Commands::Query { regions, threshold } => {
            commands::query::run(&cli.data, &regions, threshold)
        }
        Commands::Regions => commands::regions::run(&cli.data),
    }
}
