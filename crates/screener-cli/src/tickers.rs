use anyhow::{Context, Result};
use std::path::Path;

/// Ticker codes from a list file: one per line, `#` comments and blank lines
/// skipped. CSV-style lines contribute their last non-empty field, and a
/// `Ticker`/`Symbol` header is ignored.
pub fn parse_ticker_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            line.split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .last()
        })
        .filter(|field| !field.eq_ignore_ascii_case("ticker") && !field.eq_ignore_ascii_case("symbol"))
        .map(str::to_string)
        .collect()
}

pub fn load_ticker_file(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("tickers file not found or unreadable: {}", path.display()))?;
    let tickers = parse_ticker_lines(&contents);
    tracing::info!("Loaded {} tickers from {}", tickers.len(), path.display());
    Ok(tickers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_csv_lines() {
        let contents = "\
# universe
Code,Name,Ticker
7203,Toyota Motor,7203.T

6758
  9984 , SoftBank Group , 9984.T ,
";
        assert_eq!(parse_ticker_lines(contents), vec!["7203.T", "6758", "9984.T"]);
    }

    #[test]
    fn test_empty_file() {
        assert!(parse_ticker_lines("# nothing here\n\n").is_empty());
    }
}
