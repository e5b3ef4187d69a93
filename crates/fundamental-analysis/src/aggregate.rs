use screener_core::{AcquisitionFailure, EvaluationResult, IndicatorSet};

use crate::config::EngineConfig;
use crate::rules::evaluate_rules;
use crate::scoring::score_indicators;
use crate::strict::strict_override;

/// Run the hard filters and the scorer over one indicator set and combine
/// them into the final record.
///
/// `pass = majority && score >= min_score && !strict_blocked`
pub fn build_result(
    ticker: &str,
    indicators: IndicatorSet,
    config: &EngineConfig,
    errors: Vec<String>,
) -> EvaluationResult {
    let rules = evaluate_rules(&indicators);
    let breakdown = score_indicators(&indicators);
    let score = breakdown.total();
    let majority = rules.majority_pass();
    let undeterminable = rules.undeterminable_count();
    let strict_blocked = strict_override(config.strict, undeterminable);

    if strict_blocked {
        tracing::debug!(
            "{} failed strict mode due to {} missing key metrics",
            ticker,
            undeterminable
        );
    }

    let pass = majority && score as i32 >= config.min_score && !strict_blocked;

    EvaluationResult {
        ticker: ticker.to_string(),
        score,
        pass,
        metrics: indicators,
        passed_rules: rules.passed(),
        failed_rules: rules.failed(),
        missing_rules: rules.missing(),
        errors,
        breakdown,
        hard_filter_majority: majority,
        strict_blocked,
    }
}

/// Result for a ticker whose data could not be acquired: every indicator
/// undefined, every filter undeterminable, score 0, verdict fail.
pub fn failed_acquisition(
    ticker: &str,
    failure: &AcquisitionFailure,
    config: &EngineConfig,
) -> EvaluationResult {
    build_result(ticker, IndicatorSet::default(), config, vec![failure.to_string()])
}
