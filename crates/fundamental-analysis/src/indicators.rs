use screener_core::{IndicatorSet, RawFinancialDataset, StatementKind};

use crate::period::{select_statement, PeriodOrdering};
use crate::resolver::{resolve_field, resolve_quote, CanonicalField, QuoteField};

/// Statement line items after label matching and period selection
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolvedFields {
    pub revenue: Option<f64>,
    pub operating_income: Option<f64>,
    pub net_income: Option<f64>,
    pub equity: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub operating_cash_flow: Option<f64>,
    pub capital_expenditure: Option<f64>,
}

/// Quote attributes used by the valuation indicators
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuoteFields {
    pub price: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub dividend_yield: Option<f64>,
}

/// Resolve every canonical field. Each statement contributes values from a
/// single selected period; statements are selected independently.
pub fn gather_fields(dataset: &RawFinancialDataset, ordering: &dyn PeriodOrdering) -> (ResolvedFields, QuoteFields) {
    let income = select_statement(dataset, StatementKind::Income, ordering);
    let balance = select_statement(dataset, StatementKind::Balance, ordering);
    let cash_flow = select_statement(dataset, StatementKind::CashFlow, ordering);

    let fields = ResolvedFields {
        revenue: resolve_field(income.as_ref(), CanonicalField::Revenue),
        operating_income: resolve_field(income.as_ref(), CanonicalField::OperatingIncome),
        net_income: resolve_field(income.as_ref(), CanonicalField::NetIncome),
        equity: resolve_field(balance.as_ref(), CanonicalField::Equity),
        total_assets: resolve_field(balance.as_ref(), CanonicalField::TotalAssets),
        total_liabilities: resolve_field(balance.as_ref(), CanonicalField::TotalLiabilities),
        operating_cash_flow: resolve_field(cash_flow.as_ref(), CanonicalField::OperatingCashFlow),
        capital_expenditure: resolve_field(cash_flow.as_ref(), CanonicalField::CapitalExpenditure),
    };

    let quote = QuoteFields {
        price: resolve_quote(&dataset.quote, QuoteField::Price),
        shares_outstanding: resolve_quote(&dataset.quote, QuoteField::SharesOutstanding),
        trailing_pe: resolve_quote(&dataset.quote, QuoteField::TrailingPe),
        price_to_book: resolve_quote(&dataset.quote, QuoteField::PriceToBook),
        dividend_yield: resolve_quote(&dataset.quote, QuoteField::DividendYield),
    };

    (fields, quote)
}

/// `numerator / denominator`, undefined unless both exist and the denominator is positive.
fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d > 0.0 => Some(n / d),
        _ => None,
    }
}

fn calculate_roe(net_income: Option<f64>, equity: Option<f64>) -> Option<f64> {
    ratio(net_income, equity)
}

fn calculate_operating_margin(operating_income: Option<f64>, revenue: Option<f64>) -> Option<f64> {
    ratio(operating_income, revenue)
}

fn calculate_equity_ratio(equity: Option<f64>, total_assets: Option<f64>) -> Option<f64> {
    ratio(equity, total_assets)
}

fn calculate_debt_to_equity(liabilities: Option<f64>, equity: Option<f64>) -> Option<f64> {
    ratio(liabilities, equity)
}

fn calculate_free_cash_flow(cfo: Option<f64>, capex: Option<f64>) -> Option<f64> {
    Some(cfo? - capex?)
}

/// Provided P/E, else price over earnings per share (positive earnings only).
fn calculate_pe_ratio(quote: &QuoteFields, net_income: Option<f64>) -> Option<f64> {
    if quote.trailing_pe.is_some() {
        return quote.trailing_pe;
    }
    let eps = ratio(net_income, quote.shares_outstanding).filter(|eps| *eps > 0.0)?;
    Some(quote.price? / eps)
}

/// Provided P/B, else price over book value per share (positive equity only).
fn calculate_pb_ratio(quote: &QuoteFields, equity: Option<f64>) -> Option<f64> {
    if quote.price_to_book.is_some() {
        return quote.price_to_book;
    }
    let bvps = ratio(equity, quote.shares_outstanding).filter(|bvps| *bvps > 0.0)?;
    Some(quote.price? / bvps)
}

/// Pure mapping from resolved inputs to the indicator set.
pub fn calculate_indicators(fields: &ResolvedFields, quote: &QuoteFields) -> IndicatorSet {
    let cfo = fields.operating_cash_flow;
    IndicatorSet {
        roe: calculate_roe(fields.net_income, fields.equity),
        op_margin: calculate_operating_margin(fields.operating_income, fields.revenue),
        equity_ratio: calculate_equity_ratio(fields.equity, fields.total_assets),
        de_ratio: calculate_debt_to_equity(fields.total_liabilities, fields.equity),
        cfo,
        fcf: calculate_free_cash_flow(cfo, fields.capital_expenditure),
        per: calculate_pe_ratio(quote, fields.net_income),
        pbr: calculate_pb_ratio(quote, fields.equity),
        dividend_yield: quote.dividend_yield,
    }
}
