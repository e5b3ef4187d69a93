use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which financial statement a table holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Income,
    Balance,
    CashFlow,
}

/// Aggregation basis of a statement table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodBasis {
    /// Trailing twelve months (rolling last four quarters)
    Ttm,
    Annual,
}

/// One labeled row of a statement, one cell per period column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// Period-indexed statement table: `periods` are the column headers in the
/// order the data source delivered them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementTable {
    #[serde(default)]
    pub periods: Vec<String>,
    #[serde(default)]
    pub rows: Vec<LineItem>,
}

impl StatementTable {
    pub fn new<S: Into<String>>(periods: impl IntoIterator<Item = S>) -> Self {
        Self {
            periods: periods.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, label: &str, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        self.rows.push(LineItem {
            label: label.to_string(),
            values: values.into_iter().collect(),
        });
        self
    }

    /// No rows or no period columns.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.periods.is_empty()
    }

    /// First row carrying exactly `label`.
    pub fn row(&self, label: &str) -> Option<&LineItem> {
        self.rows.iter().find(|r| r.label == label)
    }
}

/// A statement table tagged with what it is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledStatement {
    pub kind: StatementKind,
    pub basis: PeriodBasis,
    pub table: StatementTable,
}

/// Flat quote fields keyed by provider name (`currentPrice`, `trailingPE`, ...)
pub type QuoteAttributes = BTreeMap<String, Option<f64>>;

/// Everything the provider could obtain for one ticker. Never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFinancialDataset {
    #[serde(default)]
    pub statements: Vec<LabeledStatement>,
    #[serde(default)]
    pub quote: QuoteAttributes,
    /// Non-fatal problems hit while loading (e.g. one statement failed to download)
    #[serde(default)]
    pub provider_errors: Vec<String>,
}

impl RawFinancialDataset {
    pub fn statement(&self, kind: StatementKind, basis: PeriodBasis) -> Option<&StatementTable> {
        self.statements
            .iter()
            .find(|s| s.kind == kind && s.basis == basis)
            .map(|s| &s.table)
    }

    pub fn with_statement(mut self, kind: StatementKind, basis: PeriodBasis, table: StatementTable) -> Self {
        self.statements.push(LabeledStatement { kind, basis, table });
        self
    }

    pub fn with_quote(mut self, key: &str, value: f64) -> Self {
        self.quote.insert(key.to_string(), Some(value));
        self
    }
}

/// Derived indicator identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    Roe,
    OperatingMargin,
    EquityRatio,
    DebtToEquity,
    Cfo,
    Fcf,
    Per,
    Pbr,
    DividendYield,
}

impl Indicator {
    pub const ALL: [Indicator; 9] = [
        Indicator::Roe,
        Indicator::OperatingMargin,
        Indicator::EquityRatio,
        Indicator::DebtToEquity,
        Indicator::Cfo,
        Indicator::Fcf,
        Indicator::Per,
        Indicator::Pbr,
        Indicator::DividendYield,
    ];

    /// Key used in output records
    pub fn key(&self) -> &'static str {
        match self {
            Indicator::Roe => "roe",
            Indicator::OperatingMargin => "op_margin",
            Indicator::EquityRatio => "equity_ratio",
            Indicator::DebtToEquity => "de_ratio",
            Indicator::Cfo => "cfo",
            Indicator::Fcf => "fcf",
            Indicator::Per => "per",
            Indicator::Pbr => "pbr",
            Indicator::DividendYield => "dividend_yield",
        }
    }
}

/// Indicator values; `None` means undefined (missing input or non-positive
/// denominator), never a stand-in zero. Serializes `None` as `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub roe: Option<f64>,
    pub op_margin: Option<f64>,
    pub equity_ratio: Option<f64>,
    pub de_ratio: Option<f64>,
    pub cfo: Option<f64>,
    pub fcf: Option<f64>,
    pub per: Option<f64>,
    pub pbr: Option<f64>,
    pub dividend_yield: Option<f64>,
}

impl IndicatorSet {
    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::Roe => self.roe,
            Indicator::OperatingMargin => self.op_margin,
            Indicator::EquityRatio => self.equity_ratio,
            Indicator::DebtToEquity => self.de_ratio,
            Indicator::Cfo => self.cfo,
            Indicator::Fcf => self.fcf,
            Indicator::Per => self.per,
            Indicator::Pbr => self.pbr,
            Indicator::DividendYield => self.dividend_yield,
        }
    }

    pub fn defined_count(&self) -> usize {
        Indicator::ALL.iter().filter(|i| self.get(**i).is_some()).count()
    }
}

/// Outcome of one hard-filter criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleOutcome {
    Pass,
    Fail,
    /// The criterion's indicator is undefined
    Undeterminable,
}

/// Points per bucket. Health is already floored at 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub profitability: u32, // 0..=40
    pub health: u32,        // 0..=25
    pub cash_flow: u32,     // 0..=20
    pub valuation: u32,     // 0..=15
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        (self.profitability + self.health + self.cash_flow + self.valuation).min(100)
    }
}

/// Final per-ticker evaluation handed to the formatter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub ticker: String,
    pub score: u32,
    pub pass: bool,
    pub metrics: IndicatorSet,
    pub passed_rules: Vec<String>,
    pub failed_rules: Vec<String>,
    pub missing_rules: Vec<String>,
    pub errors: Vec<String>,
    pub breakdown: ScoreBreakdown,
    /// Strictly more than half of the determinable hard filters passed
    pub hard_filter_majority: bool,
    pub strict_blocked: bool,
}
