//! Telemetry records and the immutable dataset they are loaded into.
//!
//! The dataset source is a JSON array of objects, each carrying at least
//! `region`, `latency_ms`, and `uptime_percent`. Extra fields are ignored.
//! Loading is all-or-nothing: any unreadable source or malformed record fails
//! the whole load with [`DataLoadError`].

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A single telemetry sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Region identifier, matched by exact string comparison.
    pub region: String,
    /// Observed latency in milliseconds.
    pub latency_ms: f64,
    /// Observed uptime, as a percentage.
    pub uptime_percent: f64,
}

impl TelemetryRecord {
    pub fn new(region: impl Into<String>, latency_ms: f64, uptime_percent: f64) -> Self {
        Self {
            region: region.into(),
            latency_ms,
            uptime_percent,
        }
    }
}

/// Error returned when a telemetry source cannot be turned into a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("failed to read telemetry from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed telemetry data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Distinct region with the number of records it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionSummary {
    pub region: String,
    pub records: usize,
}

/// Ordered, read-only sequence of telemetry records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TelemetryDataset {
    records: Vec<TelemetryRecord>,
}

impl TelemetryDataset {
    /// Wrap already-parsed records, e.g. a test fixture.
    pub fn new(records: Vec<TelemetryRecord>) -> Self {
        Self { records }
    }

    /// Load and parse a JSON telemetry file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json_str(&raw)?;
        log::info!(
            "loaded {} telemetry records across {} regions from {}",
            dataset.len(),
            dataset.regions().len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse a dataset from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, DataLoadError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parse a dataset from any reader yielding JSON.
    pub fn from_reader(reader: impl Read) -> Result<Self, DataLoadError> {
        Ok(serde_json::from_reader(std::io::BufReader::new(reader))?)
    }

    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose region equals `region` exactly.
    pub fn in_region<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a TelemetryRecord> {
        self.records.iter().filter(move |r| r.region == region)
    }

    /// Distinct regions in first-seen order, with record counts.
    pub fn regions(&self) -> Vec<RegionSummary> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut out: Vec<RegionSummary> = Vec::new();
        for record in &self.records {
            match index.get(record.region.as_str()) {
                Some(&i) => out[i].records += 1,
                None => {
                    index.insert(&record.region, out.len());
                    out.push(RegionSummary {
                        region: record.region.clone(),
                        records: 1,
                    });
                }
            }
        }
        out
    }
}

impl From<Vec<TelemetryRecord>> for TelemetryDataset {
    fn from(records: Vec<TelemetryRecord>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_records() {
        let raw = r#"[
            {"region": "us", "latency_ms": 100, "uptime_percent": 99.5},
            {"region": "eu", "latency_ms": 120.5, "uptime_percent": 97.25, "service": "api"}
        ]"#;
        let ds = TelemetryDataset::from_json_str(raw).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0], TelemetryRecord::new("us", 100.0, 99.5));
        assert_eq!(ds.records()[1].latency_ms, 120.5);
    }

    #[test]
    fn empty_array_is_valid() {
        let ds = TelemetryDataset::from_json_str("[]").unwrap();
        assert!(ds.is_empty());
        assert!(ds.regions().is_empty());
    }

    #[test]
    fn missing_field_is_rejected() {
        let raw = r#"[{"region": "us", "latency_ms": 100}]"#;
        let err = TelemetryDataset::from_json_str(raw).unwrap_err();
        assert!(matches!(err, DataLoadError::Parse(_)));
        assert!(err.to_string().contains("uptime_percent"), "{err}");
    }

    #[test]
    fn wrong_type_is_rejected() {
        let raw = r#"[{"region": "us", "latency_ms": "fast", "uptime_percent": 99.0}]"#;
        assert!(TelemetryDataset::from_json_str(raw).is_err());
    }

    #[test]
    fn non_array_is_rejected() {
        let raw = r#"{"region": "us", "latency_ms": 100, "uptime_percent": 99.0}"#;
        assert!(TelemetryDataset::from_json_str(raw).is_err());
        assert!(TelemetryDataset::from_json_str("not json").is_err());
    }

    #[test]
    fn from_reader_parses() {
        let raw = br#"[{"region": "ap", "latency_ms": 80, "uptime_percent": 99.9}]"#;
        let ds = TelemetryDataset::from_reader(&raw[..]).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].region, "ap");
    }

    #[test]
    fn regions_first_seen_order() {
        let ds = TelemetryDataset::new(vec![
            TelemetryRecord::new("eu", 1.0, 99.0),
            TelemetryRecord::new("us", 2.0, 99.0),
            TelemetryRecord::new("eu", 3.0, 99.0),
        ]);
        let regions = ds.regions();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].region, "eu");
        assert_eq!(regions[0].records, 2);
        assert_eq!(regions[1].region, "us");
        assert_eq!(regions[1].records, 1);
    }

    #[test]
    fn in_region_is_exact_match() {
        let ds = TelemetryDataset::new(vec![
            TelemetryRecord::new("us", 1.0, 99.0),
            TelemetryRecord::new("US", 2.0, 99.0),
            TelemetryRecord::new("us-east", 3.0, 99.0),
        ]);
        assert_eq!(ds.in_region("us").count(), 1);
    }
}
