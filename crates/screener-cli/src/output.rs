use screener_core::{EvaluationResult, IndicatorSet};
use serde::Serialize;

/// Line-delimited record: exactly the published output fields
#[derive(Debug, Serialize)]
struct JsonRecord<'a> {
    ticker: &'a str,
    score: u32,
    pass: bool,
    metrics: &'a IndicatorSet,
    passed_rules: &'a [String],
    failed_rules: &'a [String],
    missing_rules: &'a [String],
    errors: &'a [String],
}

pub fn json_line(result: &EvaluationResult) -> Result<String, serde_json::Error> {
    serde_json::to_string(&JsonRecord {
        ticker: &result.ticker,
        score: result.score,
        pass: result.pass,
        metrics: &result.metrics,
        passed_rules: &result.passed_rules,
        failed_rules: &result.failed_rules,
        missing_rules: &result.missing_rules,
        errors: &result.errors,
    })
}

fn fmt_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

fn fmt_sign(value: Option<f64>) -> &'static str {
    match value {
        Some(v) if v > 0.0 => "+",
        Some(v) if v < 0.0 => "-",
        Some(_) => "0",
        None => "n/a",
    }
}

fn metrics_summary(m: &IndicatorSet) -> String {
    format!(
        "ROE={} OpM={} EqR={} D/E={} PER={} PBR={} CFO={} FCF={} DY={}",
        fmt_ratio(m.roe),
        fmt_ratio(m.op_margin),
        fmt_ratio(m.equity_ratio),
        fmt_ratio(m.de_ratio),
        fmt_ratio(m.per),
        fmt_ratio(m.pbr),
        fmt_sign(m.cfo),
        fmt_sign(m.fcf),
        fmt_ratio(m.dividend_yield),
    )
}

pub fn text_line(result: &EvaluationResult) -> String {
    let mut parts = vec![
        result.ticker.clone(),
        format!("score={}", result.score),
        if result.pass { "PASS" } else { "FAIL" }.to_string(),
        metrics_summary(&result.metrics),
        format!("pass=[{}]", result.passed_rules.join(",")),
        format!("fail=[{}]", result.failed_rules.join(",")),
        format!("missing=[{}]", result.missing_rules.join(",")),
    ];
    if !result.errors.is_empty() {
        parts.push(format!("errors=[{}]", result.errors.join(",")));
    }
    parts.join("  ")
}

/// Best `max(1, ceil(n * percent / 100))` results by score; ties keep input order.
pub fn select_top_percent(results: &[EvaluationResult], percent: f64) -> Vec<&EvaluationResult> {
    if results.is_empty() {
        return Vec::new();
    }
    let count = ((results.len() as f64 * percent / 100.0).ceil() as usize).clamp(1, results.len());
    let mut ranked: Vec<&EvaluationResult> = results.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(count);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use screener_core::ScoreBreakdown;

    fn result(ticker: &str, score: u32, pass: bool) -> EvaluationResult {
        EvaluationResult {
            ticker: ticker.to_string(),
            score,
            pass,
            metrics: IndicatorSet {
                roe: Some(0.1234),
                cfo: Some(-5.0),
                ..Default::default()
            },
            passed_rules: vec!["ROE".to_string()],
            failed_rules: vec!["CFO".to_string()],
            missing_rules: vec!["OpMargin".to_string(), "PER".to_string()],
            errors: Vec::new(),
            breakdown: ScoreBreakdown::default(),
            hard_filter_majority: false,
            strict_blocked: false,
        }
    }

    #[test]
    fn test_json_line_has_contract_fields_only() {
        let line = json_line(&result("7203.T", 40, false)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 8);
        assert!(value.get("breakdown").is_none());
        assert!(value["metrics"]["op_margin"].is_null());
        assert_eq!(value["missing_rules"][1], "PER");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_text_line() {
        let mut r = result("7203.T", 40, false);
        let line = text_line(&r);
        assert!(line.starts_with("7203.T  score=40  FAIL  ROE=0.12 OpM=n/a"));
        assert!(line.contains("CFO=- FCF=n/a"));
        assert!(line.ends_with("pass=[ROE]  fail=[CFO]  missing=[OpMargin,PER]"));

        r.errors.push("timeout".to_string());
        assert!(text_line(&r).ends_with("errors=[timeout]"));
    }

    #[test]
    fn test_select_top_percent() {
        let results = vec![
            result("A", 50, false),
            result("B", 80, true),
            result("C", 80, true),
            result("D", 10, false),
        ];
        let top: Vec<&str> = select_top_percent(&results, 10.0).iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(top, vec!["B"]);

        let top: Vec<&str> = select_top_percent(&results, 50.0).iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(top, vec!["B", "C"]);

        assert_eq!(select_top_percent(&results, 100.0).len(), 4);
        assert!(select_top_percent(&[], 10.0).is_empty());
    }
}
