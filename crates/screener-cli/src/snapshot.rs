//! Offline data provider backed by a JSON snapshot file.
//!
//! ```json
//! {
//!   "7203.T": { "statements": [...], "quote": {"currentPrice": 2800.0} },
//!   "6758.T": { "error": "info fetch error: HTTP 404" }
//! }
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use screener_core::{AcquisitionFailure, DatasetProvider, RawFinancialDataset, TickerSymbol};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone)]
enum SnapshotEntry {
    Failed { error: String },
    Dataset(RawFinancialDataset),
}

impl SnapshotEntry {
    /// `{"error": "..."}` records a provider failure; anything else must be a
    /// dataset. A dataset that does not parse fails only its own ticker.
    fn from_value(ticker: &str, value: Value) -> Self {
        if let Some(error) = value.get("error").and_then(Value::as_str) {
            return SnapshotEntry::Failed {
                error: error.to_string(),
            };
        }
        match serde_json::from_value(value) {
            Ok(dataset) => SnapshotEntry::Dataset(dataset),
            Err(e) => {
                tracing::warn!("Snapshot entry for {} is malformed: {}", ticker, e);
                SnapshotEntry::Failed {
                    error: format!("snapshot parse error: {e}"),
                }
            }
        }
    }
}

pub struct SnapshotProvider {
    entries: BTreeMap<String, SnapshotEntry>,
}

impl SnapshotProvider {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to parse snapshot {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let values: BTreeMap<String, Value> = serde_json::from_str(raw)?;
        let entries: BTreeMap<String, SnapshotEntry> = values
            .into_iter()
            .map(|(ticker, value)| {
                let entry = SnapshotEntry::from_value(&ticker, value);
                (ticker, entry)
            })
            .collect();
        tracing::info!("Loaded snapshot with {} tickers", entries.len());
        Ok(Self { entries })
    }

    /// Tickers present in the snapshot, sorted
    pub fn tickers(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

#[async_trait]
impl DatasetProvider for SnapshotProvider {
    async fn fetch(&self, ticker: &TickerSymbol) -> Result<RawFinancialDataset, AcquisitionFailure> {
        match self.entries.get(ticker.as_str()) {
            Some(SnapshotEntry::Dataset(dataset)) => Ok(dataset.clone()),
            Some(SnapshotEntry::Failed { error }) => Err(AcquisitionFailure::new(error.clone())),
            None => Err(AcquisitionFailure::new(format!("{ticker}: not present in snapshot"))),
        }
    }
}
