use async_trait::async_trait;
use crate::{AcquisitionFailure, RawFinancialDataset, TickerSymbol};

/// Source of per-ticker financial snapshots (remote API, cache, fixture file).
///
/// Retries, timeouts and authentication belong to the implementor; the
/// engine only sees "dataset" or "failure".
#[async_trait]
pub trait DatasetProvider: Send + Sync {
    async fn fetch(&self, ticker: &TickerSymbol) -> Result<RawFinancialDataset, AcquisitionFailure>;
}
