//! Statement and period selection.
//!
//! A statement may arrive as a trailing-twelve-months table and/or an annual
//! table. The TTM table wins when it has data; inside the chosen table one
//! column (the latest period) supplies every field for that statement.

use chrono::NaiveDate;
use screener_core::{PeriodBasis, RawFinancialDataset, StatementKind, StatementTable};

/// Picks the most recent period column of a table.
///
/// Swappable so upstream column-ordering conventions can change without
/// touching field resolution.
pub trait PeriodOrdering: Send + Sync {
    /// Index into `periods` of the latest period, `None` when there are no columns.
    fn latest_column(&self, periods: &[String]) -> Option<usize>;
}

/// Trust the data source: the first column is the latest.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceOrder;

impl PeriodOrdering for SourceOrder {
    fn latest_column(&self, periods: &[String]) -> Option<usize> {
        if periods.is_empty() {
            None
        } else {
            Some(0)
        }
    }
}

/// Parse headers as dates and take the maximum. When no header parses, fall
/// back to the lexicographically greatest header. Ties keep the earlier column.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatestDate;

impl LatestDate {
    fn parse(header: &str) -> Option<NaiveDate> {
        let trimmed = header.trim();
        // "2024-03-31" or "2024-03-31 00:00:00"
        let date_part = trimmed.get(..10).unwrap_or(trimmed);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y/%m/%d"))
            .ok()
    }
}

impl PeriodOrdering for LatestDate {
    fn latest_column(&self, periods: &[String]) -> Option<usize> {
        if periods.is_empty() {
            return None;
        }

        let mut best_date: Option<(usize, NaiveDate)> = None;
        for (idx, header) in periods.iter().enumerate() {
            if let Some(date) = Self::parse(header) {
                match best_date {
                    Some((_, best)) if date <= best => {}
                    _ => best_date = Some((idx, date)),
                }
            }
        }
        if let Some((idx, _)) = best_date {
            return Some(idx);
        }

        let mut best = 0;
        for (idx, header) in periods.iter().enumerate().skip(1) {
            if header.as_str() > periods[best].as_str() {
                best = idx;
            }
        }
        Some(best)
    }
}

/// One period column of one statement table.
#[derive(Debug, Clone, Copy)]
pub struct PeriodSlice<'a> {
    table: &'a StatementTable,
    column: usize,
    basis: PeriodBasis,
}

impl<'a> PeriodSlice<'a> {
    pub fn period(&self) -> &'a str {
        self.table.periods.get(self.column).map(String::as_str).unwrap_or("")
    }

    pub fn basis(&self) -> PeriodBasis {
        self.basis
    }

    /// Finite value of the row labelled exactly `label` in this period.
    pub fn value(&self, label: &str) -> Option<f64> {
        self.table
            .row(label)
            .and_then(|row| row.values.get(self.column).copied().flatten())
            .filter(|v| v.is_finite())
    }
}

/// Select the statement table (TTM before annual) and its latest period.
pub fn select_statement<'a>(
    dataset: &'a RawFinancialDataset,
    kind: StatementKind,
    ordering: &dyn PeriodOrdering,
) -> Option<PeriodSlice<'a>> {
    [PeriodBasis::Ttm, PeriodBasis::Annual]
        .into_iter()
        .find_map(|basis| {
            let table = dataset.statement(kind, basis)?;
            if table.is_empty() {
                return None;
            }
            let column = ordering.latest_column(&table.periods)?;
            Some(PeriodSlice { table, column, basis })
        })
}
