//! # latencyscope-core
//!
//! Per-region latency and uptime statistics over a fixed telemetry dataset.
//!
//! ## Quick Start
//!
//! ```
//! use latencyscope_core::{TelemetryDataset, TelemetryRecord, query};
//!
//! let dataset = TelemetryDataset::new(vec![
//!     TelemetryRecord::new("us", 100.0, 99.5),
//!     TelemetryRecord::new("us", 300.0, 98.0),
//! ]);
//!
//! let report = query(&dataset, &["us", "eu"], 150.0);
//! let us = report.get("us").unwrap();
//! assert_eq!(us.avg_latency, Some(200.0));
//! assert_eq!(us.p95_latency, Some(290.0));
//! assert_eq!(us.breaches, 1);
//! assert!(!report.get("eu").unwrap().has_data());
//! ```
//!
//! ## Architecture
//!
//! Source (JSON) → [`TelemetryDataset`] (loaded once, immutable) → [`query`] → [`RegionReport`]
//!
//! The dataset is never mutated after loading, so callers share it behind an
//! `Arc` and run any number of queries concurrently.

pub mod aggregate;
pub mod stats;
pub mod telemetry;

pub use aggregate::{
    LATENCY_PERCENTILE, Query, ROUND_DECIMALS, RegionReport, RegionStats, query, region_stats,
};
pub use stats::{mean, percentile, round_to};
pub use telemetry::{DataLoadError, RegionSummary, TelemetryDataset, TelemetryRecord};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
