pub mod aggregate;
pub mod batch;
pub mod config;
pub mod engine;
pub mod indicators;
pub mod period;
pub mod resolver;
pub mod rules;
pub mod scoring;
pub mod strict;


pub use batch::screen;
pub use config::EngineConfig;
pub use engine::{Acquisition, FundamentalAnalysisEngine};
pub use indicators::{calculate_indicators, gather_fields, QuoteFields, ResolvedFields};
pub use period::{LatestDate, PeriodOrdering, PeriodSlice, SourceOrder};
pub use resolver::{CanonicalField, QuoteField};
pub use rules::{evaluate_rules, HardFilter, RuleEvaluation};
pub use scoring::score_indicators;
