//! Field resolution against inconsistently labelled provider data.
//!
//! Each canonical field owns an ordered list of accepted spellings. Matching is
//! exact string equality; the first spelling that yields a value wins.

use screener_core::{QuoteAttributes, StatementKind};

use crate::period::PeriodSlice;

/// Canonical statement line items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Revenue,
    OperatingIncome,
    NetIncome,
    Equity,
    TotalAssets,
    TotalLiabilities,
    OperatingCashFlow,
    CapitalExpenditure,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 8] = [
        CanonicalField::Revenue,
        CanonicalField::OperatingIncome,
        CanonicalField::NetIncome,
        CanonicalField::Equity,
        CanonicalField::TotalAssets,
        CanonicalField::TotalLiabilities,
        CanonicalField::OperatingCashFlow,
        CanonicalField::CapitalExpenditure,
    ];

    pub fn statement(&self) -> StatementKind {
        match self {
            CanonicalField::Revenue | CanonicalField::OperatingIncome | CanonicalField::NetIncome => {
                StatementKind::Income
            }
            CanonicalField::Equity | CanonicalField::TotalAssets | CanonicalField::TotalLiabilities => {
                StatementKind::Balance
            }
            CanonicalField::OperatingCashFlow | CanonicalField::CapitalExpenditure => {
                StatementKind::CashFlow
            }
        }
    }

    /// Accepted row labels, in priority order.
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::Revenue => &["Total Revenue", "TotalRevenue"],
            CanonicalField::OperatingIncome => &["Operating Income", "OperatingIncome"],
            CanonicalField::NetIncome => &["Net Income", "NetIncome"],
            CanonicalField::Equity => &[
                "Total Stockholder Equity",
                "Stockholders Equity",
                "Total Equity Gross Minority Interest",
            ],
            CanonicalField::TotalAssets => &["Total Assets", "TotalAssets"],
            CanonicalField::TotalLiabilities => &[
                "Total Liab",
                "TotalLiabilitiesNetMinorityInterest",
                "Total Liabilities",
            ],
            CanonicalField::OperatingCashFlow => &[
                "Total Cash From Operating Activities",
                "Operating Cash Flow",
            ],
            CanonicalField::CapitalExpenditure => &["Capital Expenditures", "Capital Expenditure"],
        }
    }
}

/// Quote attributes supplied next to the statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteField {
    Price,
    SharesOutstanding,
    TrailingPe,
    PriceToBook,
    DividendYield,
}

impl QuoteField {
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            QuoteField::Price => &["currentPrice", "regularMarketPrice", "previousClose"],
            QuoteField::SharesOutstanding => &["sharesOutstanding"],
            QuoteField::TrailingPe => &["trailingPE"],
            QuoteField::PriceToBook => &["priceToBook"],
            QuoteField::DividendYield => &["dividendYield"],
        }
    }
}

/// First value found for `field` in the selected period, `None` when the
/// statement is absent or no accepted label carries a value.
pub fn resolve_field(slice: Option<&PeriodSlice<'_>>, field: CanonicalField) -> Option<f64> {
    let slice = slice?;
    field.labels().iter().find_map(|label| {
        let value = slice.value(label)?;
        tracing::debug!(
            "Resolved {:?} via label {:?} (period {})",
            field,
            label,
            slice.period()
        );
        Some(value)
    })
}

/// First finite quote attribute among the field's accepted keys.
pub fn resolve_quote(quote: &QuoteAttributes, field: QuoteField) -> Option<f64> {
    field.keys().iter().find_map(|key| {
        quote
            .get(*key)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{select_statement, SourceOrder};
    use screener_core::{PeriodBasis, RawFinancialDataset, StatementTable};

    fn balance(rows: &[(&str, Option<f64>)]) -> RawFinancialDataset {
        let table = rows
            .iter()
            .fold(StatementTable::new(["2024-03-31"]), |t, (label, v)| t.with_row(label, [*v]));
        RawFinancialDataset::default().with_statement(StatementKind::Balance, PeriodBasis::Annual, table)
    }

    #[test]
    fn test_variant_priority_follows_table_order() {
        let dataset = balance(&[
            ("Total Equity Gross Minority Interest", Some(300.0)),
            ("Stockholders Equity", Some(250.0)),
        ]);
        let slice = select_statement(&dataset, StatementKind::Balance, &SourceOrder);
        assert_eq!(resolve_field(slice.as_ref(), CanonicalField::Equity), Some(250.0));
    }

    #[test]
    fn test_no_fuzzy_matching() {
        let dataset = balance(&[("total assets", Some(1.0)), ("Total Assets ", Some(2.0))]);
        let slice = select_statement(&dataset, StatementKind::Balance, &SourceOrder);
        assert_eq!(resolve_field(slice.as_ref(), CanonicalField::TotalAssets), None);
    }

    #[test]
    fn test_empty_cell_moves_to_next_variant() {
        let dataset = balance(&[("Total Liab", None), ("Total Liabilities", Some(80.0))]);
        let slice = select_statement(&dataset, StatementKind::Balance, &SourceOrder);
        assert_eq!(resolve_field(slice.as_ref(), CanonicalField::TotalLiabilities), Some(80.0));
    }

    #[test]
    fn test_absent_statement_resolves_nothing() {
        assert_eq!(resolve_field(None, CanonicalField::Revenue), None);
    }

    #[test]
    fn test_every_field_maps_to_its_statement() {
        for field in CanonicalField::ALL {
            assert!(!field.labels().is_empty());
        }
        assert_eq!(CanonicalField::CapitalExpenditure.statement(), StatementKind::CashFlow);
        assert_eq!(CanonicalField::TotalLiabilities.statement(), StatementKind::Balance);
        assert_eq!(CanonicalField::OperatingIncome.statement(), StatementKind::Income);
    }

    #[test]
    fn test_quote_fallback_keys() {
        let mut quote = QuoteAttributes::new();
        quote.insert("currentPrice".to_string(), None);
        quote.insert("previousClose".to_string(), Some(1480.0));
        assert_eq!(resolve_quote(&quote, QuoteField::Price), Some(1480.0));

        quote.insert("regularMarketPrice".to_string(), Some(1500.0));
        assert_eq!(resolve_quote(&quote, QuoteField::Price), Some(1500.0));

        assert_eq!(resolve_quote(&quote, QuoteField::TrailingPe), None);
    }
}
