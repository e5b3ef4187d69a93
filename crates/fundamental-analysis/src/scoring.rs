//! Bucketed 0-100 score. Undefined indicators earn nothing in their bucket.

use screener_core::{IndicatorSet, ScoreBreakdown};

const DEBT_TO_EQUITY_PENALTY_ABOVE: f64 = 5.0;
const DEBT_TO_EQUITY_PENALTY: i32 = 5;

/// Profitability, max 40
fn profitability(indicators: &IndicatorSet) -> u32 {
    let roe = match indicators.roe {
        Some(v) if v >= 0.10 => 25,
        Some(v) if v >= 0.08 => 15,
        _ => 0,
    };
    let margin = match indicators.op_margin {
        Some(v) if v >= 0.10 => 15,
        Some(v) if v >= 0.05 => 10,
        Some(v) if v > 0.0 => 5,
        _ => 0,
    };
    roe + margin
}

/// Financial health, max 25, floored at 0 after the leverage penalty
fn health(indicators: &IndicatorSet) -> u32 {
    let equity_ratio: i32 = match indicators.equity_ratio {
        Some(v) if v >= 0.50 => 15,
        Some(v) if v >= 0.30 => 10,
        _ => 0,
    };
    let penalty = match indicators.de_ratio {
        Some(v) if v > DEBT_TO_EQUITY_PENALTY_ABOVE => DEBT_TO_EQUITY_PENALTY,
        _ => 0,
    };
    (equity_ratio - penalty).max(0) as u32
}

/// Cash flow, max 20
fn cash_flow(indicators: &IndicatorSet) -> u32 {
    let cfo = match indicators.cfo {
        Some(v) if v > 0.0 => 10,
        _ => 0,
    };
    let fcf = match indicators.fcf {
        Some(v) if v > 0.0 => 10,
        _ => 0,
    };
    cfo + fcf
}

/// Valuation, max 15
fn valuation(indicators: &IndicatorSet) -> u32 {
    let pbr = match indicators.pbr {
        Some(v) if v <= 1.0 => 10,
        Some(v) if v <= 1.5 => 5,
        _ => 0,
    };
    let per = match indicators.per {
        Some(v) if v <= 15.0 => 5,
        Some(v) if v <= 20.0 => 3,
        _ => 0,
    };
    pbr + per
}

/// Deterministic bucket scores for an indicator set.
pub fn score_indicators(indicators: &IndicatorSet) -> ScoreBreakdown {
    ScoreBreakdown {
        profitability: profitability(indicators),
        health: health(indicators),
        cash_flow: cash_flow(indicators),
        valuation: valuation(indicators),
    }
}
