use screener_core::{Indicator, IndicatorSet, RuleOutcome};

/// The six hard-filter criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardFilter {
    Roe,
    OpMargin,
    EquityRatio,
    Cfo,
    Per,
    Pbr,
}

impl HardFilter {
    pub const ALL: [HardFilter; 6] = [
        HardFilter::Roe,
        HardFilter::OpMargin,
        HardFilter::EquityRatio,
        HardFilter::Cfo,
        HardFilter::Per,
        HardFilter::Pbr,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HardFilter::Roe => "ROE",
            HardFilter::OpMargin => "OpMargin",
            HardFilter::EquityRatio => "EquityRatio",
            HardFilter::Cfo => "CFO",
            HardFilter::Per => "PER",
            HardFilter::Pbr => "PBR",
        }
    }

    pub fn indicator(&self) -> Indicator {
        match self {
            HardFilter::Roe => Indicator::Roe,
            HardFilter::OpMargin => Indicator::OperatingMargin,
            HardFilter::EquityRatio => Indicator::EquityRatio,
            HardFilter::Cfo => Indicator::Cfo,
            HardFilter::Per => Indicator::Per,
            HardFilter::Pbr => Indicator::Pbr,
        }
    }

    fn accepts(&self, value: f64) -> bool {
        match self {
            HardFilter::Roe => value >= 0.08,
            HardFilter::OpMargin => value >= 0.05,
            HardFilter::EquityRatio => value >= 0.30,
            HardFilter::Cfo => value > 0.0,
            HardFilter::Per => value <= 20.0,
            HardFilter::Pbr => value <= 1.5,
        }
    }

    pub fn evaluate(&self, indicators: &IndicatorSet) -> RuleOutcome {
        match indicators.get(self.indicator()) {
            None => RuleOutcome::Undeterminable,
            Some(v) if self.accepts(v) => RuleOutcome::Pass,
            Some(_) => RuleOutcome::Fail,
        }
    }
}

/// Outcome of every hard filter, in `HardFilter::ALL` order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEvaluation {
    pub outcomes: Vec<(HardFilter, RuleOutcome)>,
}

impl RuleEvaluation {
    fn names_with(&self, outcome: RuleOutcome) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == outcome)
            .map(|(f, _)| f.name().to_string())
            .collect()
    }

    fn count(&self, outcome: RuleOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }

    pub fn outcome(&self, filter: HardFilter) -> Option<RuleOutcome> {
        self.outcomes.iter().find(|(f, _)| *f == filter).map(|(_, o)| *o)
    }

    pub fn passed(&self) -> Vec<String> {
        self.names_with(RuleOutcome::Pass)
    }

    pub fn failed(&self) -> Vec<String> {
        self.names_with(RuleOutcome::Fail)
    }

    pub fn missing(&self) -> Vec<String> {
        self.names_with(RuleOutcome::Undeterminable)
    }

    pub fn undeterminable_count(&self) -> usize {
        self.count(RuleOutcome::Undeterminable)
    }

    /// Strictly more than half of the determinable criteria passed.
    /// With nothing determinable the check fails.
    pub fn majority_pass(&self) -> bool {
        let passed = self.count(RuleOutcome::Pass);
        let determinable = passed + self.count(RuleOutcome::Fail);
        if determinable == 0 {
            return false;
        }
        passed * 2 > determinable
    }
}

pub fn evaluate_rules(indicators: &IndicatorSet) -> RuleEvaluation {
    RuleEvaluation {
        outcomes: HardFilter::ALL
            .iter()
            .map(|f| (*f, f.evaluate(indicators)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_passing() -> IndicatorSet {
        IndicatorSet {
            roe: Some(0.11),
            op_margin: Some(0.08),
            equity_ratio: Some(0.45),
            de_ratio: None,
            cfo: Some(1.0e9),
            fcf: Some(4.0e8),
            per: Some(12.3),
            pbr: Some(1.1),
            dividend_yield: None,
        }
    }

    #[test]
    fn test_all_pass() {
        let eval = evaluate_rules(&all_passing());
        assert_eq!(eval.passed(), vec!["ROE", "OpMargin", "EquityRatio", "CFO", "PER", "PBR"]);
        assert!(eval.failed().is_empty());
        assert!(eval.missing().is_empty());
        assert!(eval.majority_pass());
    }

    #[test]
    fn test_threshold_boundaries() {
        let set = IndicatorSet {
            roe: Some(0.08),
            op_margin: Some(0.05),
            equity_ratio: Some(0.30),
            cfo: Some(0.0),
            per: Some(20.0),
            pbr: Some(1.5),
            ..Default::default()
        };
        let eval = evaluate_rules(&set);
        assert_eq!(eval.outcome(HardFilter::Roe), Some(RuleOutcome::Pass));
        assert_eq!(eval.outcome(HardFilter::OpMargin), Some(RuleOutcome::Pass));
        assert_eq!(eval.outcome(HardFilter::EquityRatio), Some(RuleOutcome::Pass));
        // CFO must be strictly positive
        assert_eq!(eval.outcome(HardFilter::Cfo), Some(RuleOutcome::Fail));
        assert_eq!(eval.outcome(HardFilter::Per), Some(RuleOutcome::Pass));
        assert_eq!(eval.outcome(HardFilter::Pbr), Some(RuleOutcome::Pass));
    }

    #[test]
    fn test_undeterminable_iff_undefined() {
        let set = IndicatorSet {
            roe: Some(0.02),
            ..Default::default()
        };
        let eval = evaluate_rules(&set);
        for (filter, outcome) in &eval.outcomes {
            let defined = set.get(filter.indicator()).is_some();
            assert_eq!(*outcome == RuleOutcome::Undeterminable, !defined, "{}", filter.name());
        }
        assert_eq!(eval.failed(), vec!["ROE"]);
        assert_eq!(eval.undeterminable_count(), 5);
    }

    #[test]
    fn test_majority_requires_strictly_more_than_half() {
        // 3 pass, 3 fail
        let set = IndicatorSet {
            roe: Some(0.10),
            op_margin: Some(0.06),
            equity_ratio: Some(0.40),
            cfo: Some(-1.0),
            per: Some(30.0),
            pbr: Some(2.0),
            ..Default::default()
        };
        assert!(!evaluate_rules(&set).majority_pass());

        // 2 pass, 1 fail, 3 undeterminable
        let set = IndicatorSet {
            roe: Some(0.10),
            op_margin: Some(0.06),
            pbr: Some(2.0),
            ..Default::default()
        };
        assert!(evaluate_rules(&set).majority_pass());
    }

    #[test]
    fn test_nothing_determinable_fails_majority() {
        let eval = evaluate_rules(&IndicatorSet::default());
        assert_eq!(eval.undeterminable_count(), 6);
        assert!(!eval.majority_pass());
    }
}
