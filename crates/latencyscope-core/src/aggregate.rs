//! Per-region latency/uptime aggregation.
//!
//! A query names a list of regions and a latency threshold. For each region
//! the matching records are reduced to four numbers: mean latency, p95
//! latency, mean uptime (all rounded to two decimals), and the number of
//! records whose latency is strictly above the threshold. Regions without
//! data yield nulls and zero breaches rather than an error.

use std::collections::HashSet;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::stats::{mean, percentile_sorted, round_to};
use crate::telemetry::TelemetryDataset;

/// Percentile reported as `p95_latency`.
pub const LATENCY_PERCENTILE: f64 = 95.0;

/// Decimal places kept in averaged and percentile values.
pub const ROUND_DECIMALS: i32 = 2;

/// A region list plus breach threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub regions: Vec<String>,
    /// A record breaches when `latency_ms > threshold_ms`.
    pub threshold_ms: f64,
}

impl Query {
    pub fn new(regions: Vec<String>, threshold_ms: f64) -> Self {
        Self {
            regions,
            threshold_ms,
        }
    }

    pub fn evaluate(&self, dataset: &TelemetryDataset) -> RegionReport {
        query(dataset, &self.regions, self.threshold_ms)
    }
}

/// Statistics for one region. The optional fields are `None` when the region
/// has no records.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegionStats {
    pub avg_latency: Option<f64>,
    pub p95_latency: Option<f64>,
    pub avg_uptime: Option<f64>,
    pub breaches: usize,
}

impl RegionStats {
    /// The shape returned for a region with no records.
    pub const EMPTY: RegionStats = RegionStats {
        avg_latency: None,
        p95_latency: None,
        avg_uptime: None,
        breaches: 0,
    };

    pub fn has_data(&self) -> bool {
        self.avg_latency.is_some()
    }
}

/// Region -> stats mapping in request order, one entry per distinct region.
///
/// Serializes as a JSON object keyed by region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionReport {
    entries: Vec<(String, RegionStats)>,
}

impl RegionReport {
    pub fn get(&self, region: &str) -> Option<&RegionStats> {
        self.entries
            .iter()
            .find(|(name, _)| name == region)
            .map(|(_, stats)| stats)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegionStats)> {
        self.entries.iter().map(|(name, stats)| (name.as_str(), stats))
    }
}

impl Serialize for RegionReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (region, stats) in &self.entries {
            map.serialize_entry(region, stats)?;
        }
        map.end()
    }
}

/// Compute stats for every distinct region in `regions`.
///
/// Pure over `dataset`: identical inputs always give identical reports.
pub fn query<S: AsRef<str>>(
    dataset: &TelemetryDataset,
    regions: &[S],
    threshold_ms: f64,
) -> RegionReport {
    let mut seen: HashSet<&str> = HashSet::with_capacity(regions.len());
    let mut entries = Vec::with_capacity(regions.len());
    for region in regions {
        let region = region.as_ref();
        if !seen.insert(region) {
            continue;
        }
        entries.push((region.to_string(), region_stats(dataset, region, threshold_ms)));
    }
    RegionReport { entries }
}

/// Stats for a single region.
pub fn region_stats(dataset: &TelemetryDataset, region: &str, threshold_ms: f64) -> RegionStats {
    let mut latencies = Vec::new();
    let mut uptimes = Vec::new();
    for record in dataset.in_region(region) {
        latencies.push(record.latency_ms);
        uptimes.push(record.uptime_percent);
    }
    if latencies.is_empty() {
        return RegionStats::EMPTY;
    }

    let breaches = latencies.iter().filter(|&&l| l > threshold_ms).count();
    let avg_latency = mean(&latencies);
    let avg_uptime = mean(&uptimes);
    latencies.sort_by(f64::total_cmp);
    let p95 = percentile_sorted(&latencies, LATENCY_PERCENTILE);

    RegionStats {
        avg_latency: avg_latency.map(|v| round_to(v, ROUND_DECIMALS)),
        p95_latency: Some(round_to(p95, ROUND_DECIMALS)),
        avg_uptime: avg_uptime.map(|v| round_to(v, ROUND_DECIMALS)),
        breaches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::TelemetryRecord;

    fn fixture() -> TelemetryDataset {
        TelemetryDataset::new(vec![
            TelemetryRecord::new("us", 100.0, 99.5),
            TelemetryRecord::new("us", 300.0, 98.0),
        ])
    }

    #[test]
    fn reference_example() {
        let report = query(&fixture(), &["us", "eu"], 150.0);
        assert_eq!(report.len(), 2);
        assert_eq!(
            report.get("us"),
            Some(&RegionStats {
                avg_latency: Some(200.0),
                p95_latency: Some(290.0),
                avg_uptime: Some(98.75),
                breaches: 1,
            })
        );
        assert_eq!(report.get("eu"), Some(&RegionStats::EMPTY));
    }

    #[test]
    fn unknown_region_is_empty_shape() {
        let stats = region_stats(&fixture(), "mars", 0.0);
        assert_eq!(stats, RegionStats::EMPTY);
        assert!(!stats.has_data());
    }

    #[test]
    fn breach_is_strictly_greater() {
        let ds = fixture();
        assert_eq!(region_stats(&ds, "us", 100.0).breaches, 1);
        assert_eq!(region_stats(&ds, "us", 99.999).breaches, 2);
        assert_eq!(region_stats(&ds, "us", 300.0).breaches, 0);
    }

    #[test]
    fn negative_threshold_counts_everything() {
        assert_eq!(region_stats(&fixture(), "us", -5.0).breaches, 2);
    }

    #[test]
    fn duplicates_collapse_in_first_seen_order() {
        let report = query(&fixture(), &["eu", "us", "eu", "us"], 150.0);
        let order: Vec<&str> = report.regions().collect();
        assert_eq!(order, vec!["eu", "us"]);
    }

    #[test]
    fn empty_region_list() {
        let report = query::<&str>(&fixture(), &[], 150.0);
        assert!(report.is_empty());
    }

    #[test]
    fn p95_of_known_set() {
        let ds = TelemetryDataset::new(
            [50.0, 10.0, 40.0, 20.0, 30.0]
                .into_iter()
                .map(|l| TelemetryRecord::new("eu", l, 100.0))
                .collect(),
        );
        let stats = region_stats(&ds, "eu", 0.0);
        assert_eq!(stats.p95_latency, Some(48.0));
        assert_eq!(stats.avg_latency, Some(30.0));
        assert_eq!(stats.avg_uptime, Some(100.0));
    }

    #[test]
    fn p95_upper_half_matches_linear_method() {
        let ds = TelemetryDataset::new(vec![
            TelemetryRecord::new("sa", 1344.91, 99.0),
            TelemetryRecord::new("sa", 451.41, 99.0),
        ]);
        assert_eq!(region_stats(&ds, "sa", 0.0).p95_latency, Some(1300.24));
    }

    #[test]
    fn huge_latencies_still_report_data() {
        let ds = TelemetryDataset::new(vec![
            TelemetryRecord::new("eu", 1e308, 99.0),
            TelemetryRecord::new("eu", 1.5e308, 99.0),
        ]);
        let stats = region_stats(&ds, "eu", 0.0);
        assert!(stats.has_data());
        assert!(stats.avg_latency.unwrap().is_finite());
        assert!(serde_json::to_value(stats).unwrap()["avg_latency"].is_number());
    }

    #[test]
    fn serializes_as_ordered_object_with_nulls() {
        let report = query(&fixture(), &["us", "eu"], 150.0);
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"us":{"avg_latency":200.0,"p95_latency":290.0,"avg_uptime":98.75,"breaches":1},"eu":{"avg_latency":null,"p95_latency":null,"avg_uptime":null,"breaches":0}}"#
        );
    }

    #[test]
    fn query_struct_matches_free_function() {
        let ds = fixture();
        let q = Query::new(vec!["us".into()], 150.0);
        assert_eq!(q.evaluate(&ds), query(&ds, &["us"], 150.0));
    }
}
