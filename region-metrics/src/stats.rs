use crate::{dataset::MeasurementRow, error::MetricsError};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsRequest {
    pub regions: Vec<String>,
    #[serde(deserialize_with = "whole_number")]
    pub threshold_ms: i64,
}

/// Accepts integers and floats with no fractional part (`180.0`).
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let n = serde_json::Number::deserialize(deserializer)?;
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(f as i64)
        }
        _ => Err(D::Error::custom(format!(
            "invalid value: {}, expected a whole number",
            n
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionStats {
    pub avg_latency: f64,
    pub p95_latency: f64,
    pub avg_uptime: f64,
    pub breaches: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsResponse {
    pub threshold_ms: i64,
    pub regions: BTreeMap<String, RegionStats>,
}

/// Aggregates the rows of every requested region.
///
/// Region names are compared lower-cased and duplicates collapse. Regions
/// without rows are left out of the result; if none of them has rows the
/// call fails with [`MetricsError::NotFound`].
pub fn compute_metrics<S: AsRef<str>>(
    rows: &[MeasurementRow],
    regions: &[S],
    threshold_ms: i64,
) -> Result<MetricsResponse, MetricsError> {
    let wanted: BTreeSet<String> = regions
        .iter()
        .map(|r| r.as_ref().to_lowercase())
        .collect();

    // Group latency/uptime samples by lower-cased region, keeping dataset order.
    let mut grouped: BTreeMap<String, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for row in rows {
        let region = row.region.to_lowercase();
        if wanted.contains(&region) {
            let (lats, ups) = grouped.entry(region).or_default();
            lats.push(row.latency_ms);
            ups.push(row.uptime_pct);
        }
    }

    if grouped.is_empty() {
        warn!(regions = ?wanted, "No data for requested regions");
        return Err(MetricsError::NotFound);
    }

    let threshold = threshold_ms as f64;
    let out = grouped
        .into_iter()
        .map(|(region, (lats, ups))| {
            debug!("Region '{}' matched {} row(s)", region, lats.len());
            let stats = RegionStats {
                avg_latency: mean(&lats),
                p95_latency: p95(&lats),
                avg_uptime: mean(&ups),
                breaches: lats.iter().filter(|&&v| v > threshold).count() as u64,
            };
            (region, stats)
        })
        .collect();

    Ok(MetricsResponse {
        threshold_ms,
        regions: out,
    })
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Nearest-rank percentile: the value at 0-based index
/// `max(1, round(p * n)) - 1` of the sorted sample. `f64::round` rounds
/// half away from zero.
pub fn percentile_nearest_rank(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let rank = ((p * sorted.len() as f64).round() as usize).max(1);
    sorted[rank.min(sorted.len()) - 1]
}

pub fn p95(values: &[f64]) -> f64 {
    percentile_nearest_rank(values, 0.95)
}
