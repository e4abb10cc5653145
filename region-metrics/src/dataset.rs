use anyhow::Context;
use serde::Deserialize;
use std::{collections::BTreeSet, fs, path::Path};
use tracing::debug;

/// One measurement from the dataset. Fields other than these three are
/// accepted and ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeasurementRow {
    pub region: String,
    pub latency_ms: f64,
    pub uptime_pct: f64,
}

/// The full measurement set, loaded once and never mutated.
#[derive(Debug, Default)]
pub struct Dataset {
    rows: Vec<MeasurementRow>,
}

impl Dataset {
    pub fn from_rows(rows: Vec<MeasurementRow>) -> Self {
        Dataset { rows }
    }

    pub fn from_slice(bytes: &[u8]) -> anyhow::Result<Self> {
        let rows: Vec<MeasurementRow> = serde_json::from_slice(bytes)?;
        Ok(Self::from_rows(rows))
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        // The file is read fully and closed before parsing starts.
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read dataset '{}'", path.display()))?;
        let dataset = Self::from_slice(&bytes)
            .with_context(|| format!("Failed to parse dataset '{}'", path.display()))?;
        debug!("Parsed {} row(s) from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    pub fn rows(&self) -> &[MeasurementRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted, lower-cased, de-duplicated region names.
    pub fn regions(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.region.to_lowercase())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
