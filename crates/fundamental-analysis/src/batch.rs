use screener_core::{AcquisitionFailure, DatasetProvider, EvaluationResult, TickerRequest, TickerSymbol};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::aggregate::failed_acquisition;
use crate::engine::{Acquisition, FundamentalAnalysisEngine};

/// Acquire each ticker through `provider` (at most `concurrency` in flight),
/// then evaluate. Always returns one result per request, in input order;
/// rejected requests come back as failing results carrying the rejection.
pub async fn screen<P>(
    engine: Arc<FundamentalAnalysisEngine>,
    provider: Arc<P>,
    requests: Vec<TickerRequest>,
    concurrency: usize,
) -> Vec<EvaluationResult>
where
    P: DatasetProvider + ?Sized + 'static,
{
    let total = requests.len();
    tracing::info!("Screening {} tickers (concurrency {})", total, concurrency.max(1));

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut handles = Vec::with_capacity(total);

    for ticker in requests.iter().filter_map(|r| match r {
        TickerRequest::Symbol(symbol) => Some(symbol.clone()),
        TickerRequest::Rejected { .. } => None,
    }) {
        let provider = Arc::clone(&provider);
        let semaphore = Arc::clone(&semaphore);
        let task_ticker = ticker.clone();
        let handle = tokio::spawn(async move {
            let _permit = semaphore
                .acquire()
                .await
                .map_err(|e| AcquisitionFailure::new(format!("acquisition cancelled: {e}")))?;
            provider.fetch(&task_ticker).await
        });
        handles.push((ticker, handle));
    }

    let mut acquired: Vec<(TickerSymbol, Acquisition)> = Vec::with_capacity(handles.len());
    for (ticker, handle) in handles {
        let acquisition = match handle.await {
            Ok(acquisition) => acquisition,
            Err(e) => {
                tracing::warn!("Acquisition task for {} failed: {}", ticker, e);
                Err(AcquisitionFailure::new(format!("acquisition task failed: {e}")))
            }
        };
        acquired.push((ticker, acquisition));
    }

    let failures = acquired.iter().filter(|(_, a)| a.is_err()).count();
    if failures > 0 {
        tracing::warn!("{}/{} tickers could not be acquired", failures, total);
    }

    let mut evaluated = engine.evaluate_batch(acquired).await.into_iter();
    let mut results = Vec::with_capacity(total);
    for request in &requests {
        match request {
            TickerRequest::Symbol(_) => results.extend(evaluated.next()),
            TickerRequest::Rejected { input, error } => {
                let failure = AcquisitionFailure::new(error.to_string());
                results.push(failed_acquisition(input, &failure, engine.config()));
            }
        }
    }
    results
}
