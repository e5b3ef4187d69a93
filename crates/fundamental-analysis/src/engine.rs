use screener_core::{
    AcquisitionFailure, EvaluationResult, RawFinancialDataset, ScreenerError, TickerSymbol,
};
use std::sync::Arc;

use crate::aggregate::{build_result, failed_acquisition};
use crate::config::EngineConfig;
use crate::indicators::{calculate_indicators, gather_fields};
use crate::period::{PeriodOrdering, SourceOrder};

/// Acquisition outcome for one ticker, as handed over by a data provider
pub type Acquisition = Result<RawFinancialDataset, AcquisitionFailure>;

/// Deterministic per-ticker fundamental evaluation.
///
/// Holds only immutable configuration, so one instance can be shared across
/// tasks behind an `Arc`.
pub struct FundamentalAnalysisEngine {
    config: EngineConfig,
    ordering: Arc<dyn PeriodOrdering>,
}

impl FundamentalAnalysisEngine {
    /// Rejects invalid configuration before any ticker is touched.
    pub fn new(config: EngineConfig) -> Result<Self, ScreenerError> {
        config.validate()?;
        Ok(Self {
            config,
            ordering: Arc::new(SourceOrder),
        })
    }

    pub fn with_period_ordering<O: PeriodOrdering + 'static>(mut self, ordering: O) -> Self {
        self.ordering = Arc::new(ordering);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate one already-acquired dataset. Pure: no I/O, no shared state.
    pub fn evaluate(&self, ticker: &TickerSymbol, dataset: &RawFinancialDataset) -> EvaluationResult {
        let (fields, quote) = gather_fields(dataset, self.ordering.as_ref());
        let indicators = calculate_indicators(&fields, &quote);
        build_result(
            ticker.as_str(),
            indicators,
            &self.config,
            dataset.provider_errors.clone(),
        )
    }

    pub fn evaluate_acquisition(&self, ticker: &TickerSymbol, acquisition: &Acquisition) -> EvaluationResult {
        match acquisition {
            Ok(dataset) => self.evaluate(ticker, dataset),
            Err(failure) => {
                tracing::warn!("No data for {}: {}", ticker, failure);
                failed_acquisition(ticker.as_str(), failure, &self.config)
            }
        }
    }

    /// Evaluate every ticker on its own task. Output order matches input
    /// order; a task that panics yields a failing result for its ticker only.
    pub async fn evaluate_batch(self: &Arc<Self>, inputs: Vec<(TickerSymbol, Acquisition)>) -> Vec<EvaluationResult> {
        tracing::info!("Evaluating {} tickers", inputs.len());

        let mut handles = Vec::with_capacity(inputs.len());
        for (ticker, acquisition) in inputs {
            let engine = Arc::clone(self);
            let task_ticker = ticker.clone();
            let handle = tokio::spawn(async move { engine.evaluate_acquisition(&task_ticker, &acquisition) });
            handles.push((ticker, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (ticker, handle) in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    let failure = if e.is_panic() {
                        AcquisitionFailure::new(format!("evaluation panicked for {ticker}"))
                    } else {
                        AcquisitionFailure::new(format!("evaluation task failed for {ticker}: {e}"))
                    };
                    tracing::warn!("{}", failure);
                    results.push(failed_acquisition(ticker.as_str(), &failure, &self.config));
                }
            }
        }

        let passed = results.iter().filter(|r| r.pass).count();
        tracing::info!("Evaluation complete: {}/{} tickers passed", passed, results.len());
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::LatestDate;
    use screener_core::{PeriodBasis, StatementKind, StatementTable};

    fn symbol(s: &str) -> TickerSymbol {
        TickerSymbol::parse(s).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = FundamentalAnalysisEngine::new(EngineConfig { min_score: -5, strict: false });
        assert!(matches!(err, Err(ScreenerError::InvalidConfig(_))));
    }

    #[test]
    fn test_provider_errors_are_carried_into_result() {
        let engine = FundamentalAnalysisEngine::new(EngineConfig::default()).unwrap();
        let dataset = RawFinancialDataset {
            provider_errors: vec!["ttm_cashflow call error: HTTP 404".to_string()],
            ..Default::default()
        };
        let result = engine.evaluate(&symbol("6758.T"), &dataset);
        assert_eq!(result.errors, vec!["ttm_cashflow call error: HTTP 404".to_string()]);
        assert!(!result.pass);
    }

    #[test]
    fn test_period_ordering_is_swappable() {
        // Source lists the older period first
        let balance = StatementTable::new(["2023-03-31", "2024-03-31"])
            .with_row("Stockholders Equity", [Some(100.0), Some(200.0)])
            .with_row("Total Assets", [Some(1000.0), Some(400.0)]);
        let dataset = RawFinancialDataset::default()
            .with_statement(StatementKind::Balance, PeriodBasis::Annual, balance);

        let by_source = FundamentalAnalysisEngine::new(EngineConfig::default()).unwrap();
        assert_eq!(by_source.evaluate(&symbol("X"), &dataset).metrics.equity_ratio, Some(0.1));

        let by_date = FundamentalAnalysisEngine::new(EngineConfig::default())
            .unwrap()
            .with_period_ordering(LatestDate);
        assert_eq!(by_date.evaluate(&symbol("X"), &dataset).metrics.equity_ratio, Some(0.5));
    }

    /// Ordering that blows up whenever a statement table is consulted
    struct PanickingOrder;

    impl PeriodOrdering for PanickingOrder {
        fn latest_column(&self, _periods: &[String]) -> Option<usize> {
            panic!("period headers exploded")
        }
    }

    #[tokio::test]
    async fn test_panicking_evaluation_fails_only_its_ticker() {
        let engine = Arc::new(
            FundamentalAnalysisEngine::new(EngineConfig::default())
                .unwrap()
                .with_period_ordering(PanickingOrder),
        );
        let with_statements = RawFinancialDataset::default().with_statement(
            StatementKind::Income,
            PeriodBasis::Annual,
            StatementTable::new(["2024-03-31"]).with_row("Net Income", [Some(10.0)]),
        );
        let inputs: Vec<(TickerSymbol, Acquisition)> = vec![
            (symbol("A"), Ok(with_statements)),
            (symbol("B"), Ok(RawFinancialDataset::default())),
            (symbol("C"), Err(AcquisitionFailure::new("timeout"))),
        ];

        let results = engine.evaluate_batch(inputs).await;

        let order: Vec<&str> = results.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert!(!results[0].pass);
        assert_eq!(results[0].errors, vec!["evaluation panicked for A".to_string()]);
        assert_eq!(results[0].missing_rules.len(), 6);
        assert!(results[1].errors.is_empty());
        assert_eq!(results[2].errors, vec!["timeout".to_string()]);
    }
}
