use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::ScreenerError;

/// Validated, exchange-qualified security symbol (e.g. `7203.T`, `AAPL`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TickerSymbol(String);

impl TickerSymbol {
    pub fn parse(raw: &str) -> Result<Self, ScreenerError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScreenerError::InvalidTicker("empty symbol".to_string()));
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
        {
            return Err(ScreenerError::InvalidTicker(format!(
                "{trimmed:?} contains unsupported character {bad:?}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TickerSymbol {
    type Error = ScreenerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TickerSymbol> for String {
    fn from(value: TickerSymbol) -> Self {
        value.0
    }
}

/// How caller-supplied codes become provider symbols.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TickerPolicy {
    #[default]
    AsIs,
    /// Append `suffix` to bare 4-digit codes (`7203` -> `7203.T`).
    AutoSuffix { suffix: String },
}

impl TickerPolicy {
    pub fn tokyo() -> Self {
        TickerPolicy::AutoSuffix {
            suffix: ".T".to_string(),
        }
    }

    pub fn apply(&self, raw: &str) -> String {
        let stripped = raw.trim();
        match self {
            TickerPolicy::AsIs => stripped.to_string(),
            TickerPolicy::AutoSuffix { suffix } => {
                if stripped.len() == 4 && stripped.chars().all(|c| c.is_ascii_digit()) {
                    format!("{stripped}{suffix}")
                } else {
                    stripped.to_string()
                }
            }
        }
    }
}

/// One entry of a requested ticker list after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum TickerRequest {
    Symbol(TickerSymbol),
    /// Input that is not a usable symbol; it still gets a (failing) result
    Rejected { input: String, error: ScreenerError },
}

impl TickerRequest {
    /// Symbol, or the trimmed input for rejected entries
    pub fn label(&self) -> &str {
        match self {
            TickerRequest::Symbol(symbol) => symbol.as_str(),
            TickerRequest::Rejected { input, .. } => input,
        }
    }
}

impl From<TickerSymbol> for TickerRequest {
    fn from(symbol: TickerSymbol) -> Self {
        TickerRequest::Symbol(symbol)
    }
}

/// Normalize a raw ticker list: skip blanks, apply the policy, de-duplicate
/// keeping the first occurrence. Malformed entries are kept as
/// [`TickerRequest::Rejected`] so one bad code never drops the others.
pub fn resolve_tickers<I, S>(inputs: I, policy: &TickerPolicy) -> Vec<TickerRequest>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for raw in inputs {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            continue;
        }
        let request = match TickerSymbol::parse(&policy.apply(raw)) {
            Ok(symbol) => TickerRequest::Symbol(symbol),
            Err(error) => {
                tracing::warn!("Skipping ticker {:?}: {}", raw, error);
                TickerRequest::Rejected {
                    input: raw.to_string(),
                    error,
                }
            }
        };
        if seen.insert(request.label().to_string()) {
            out.push(request);
        }
    }
    out
}
