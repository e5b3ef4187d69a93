use anyhow::{bail, Context, Result};
use fundamental_analysis::config::DEFAULT_MIN_SCORE;
use fundamental_analysis::EngineConfig;
use screener_core::TickerPolicy;
use std::env;
use std::path::PathBuf;

const DEFAULT_CONCURRENCY: usize = 8;
const DEFAULT_SUFFIX: &str = ".T";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" | "jsonl" => Ok(OutputFormat::Json),
            other => bail!("unknown output format {:?} (expected text or json)", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodOrder {
    /// First column is the latest period
    Source,
    /// Latest parseable date header
    Date,
}

impl PeriodOrder {
    fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "source" => Ok(PeriodOrder::Source),
            "date" => Ok(PeriodOrder::Date),
            other => bail!("unknown period order {:?} (expected source or date)", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub snapshot_path: Option<PathBuf>,
    pub tickers: Vec<String>,
    pub tickers_file: Option<PathBuf>,
    pub format: OutputFormat,
    pub min_score: i32,
    pub strict: bool,
    pub top_percent: Option<f64>,
    pub period_order: PeriodOrder,
    pub ticker_policy: TickerPolicy,
    pub concurrency: usize,
    pub log_level: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            tickers: Vec::new(),
            tickers_file: None,
            format: OutputFormat::Text,
            min_score: DEFAULT_MIN_SCORE,
            strict: false,
            top_percent: None,
            period_order: PeriodOrder::Source,
            ticker_policy: TickerPolicy::AutoSuffix {
                suffix: DEFAULT_SUFFIX.to_string(),
            },
            concurrency: DEFAULT_CONCURRENCY,
            log_level: None,
        }
    }
}

impl CliConfig {
    /// Defaults overlaid with `SCREENER_*` environment variables (after `.env`).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("SCREENER_MIN_SCORE") {
            config.min_score = v.trim().parse().context("SCREENER_MIN_SCORE must be an integer")?;
        }
        if let Some(v) = lookup("SCREENER_STRICT") {
            config.strict = v.trim().parse().context("SCREENER_STRICT must be true or false")?;
        }
        if let Some(v) = lookup("SCREENER_FORMAT") {
            config.format = OutputFormat::parse(v.trim())?;
        }
        if let Some(v) = lookup("SCREENER_TOP_PERCENT") {
            config.top_percent = Some(parse_percent(&v).context("SCREENER_TOP_PERCENT")?);
        }
        if let Some(v) = lookup("SCREENER_CONCURRENCY") {
            config.concurrency = v.trim().parse().context("SCREENER_CONCURRENCY must be a positive integer")?;
        }
        if let Some(v) = lookup("SCREENER_TICKER_SUFFIX") {
            config.ticker_policy = policy_for_suffix(&v);
        }
        if let Some(v) = lookup("SCREENER_SNAPSHOT") {
            config.snapshot_path = Some(PathBuf::from(v));
        }

        Ok(config)
    }

    /// Command-line flags override environment values.
    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--strict" => self.strict = true,
                "--no-suffix" => self.ticker_policy = TickerPolicy::AsIs,
                "--tickers" => {
                    while i + 1 < args.len() && !args[i + 1].starts_with("--") {
                        i += 1;
                        self.tickers.push(args[i].clone());
                    }
                }
                "--snapshot" => self.snapshot_path = Some(PathBuf::from(value(args, &mut i, flag)?)),
                "--tickers-file" => self.tickers_file = Some(PathBuf::from(value(args, &mut i, flag)?)),
                "--format" => self.format = OutputFormat::parse(value(args, &mut i, flag)?)?,
                "--min-score" => {
                    self.min_score = value(args, &mut i, flag)?
                        .parse()
                        .context("--min-score must be an integer")?
                }
                "--top-percent" => self.top_percent = Some(parse_percent(value(args, &mut i, flag)?)?),
                "--period-order" => self.period_order = PeriodOrder::parse(value(args, &mut i, flag)?)?,
                "--suffix" => self.ticker_policy = policy_for_suffix(value(args, &mut i, flag)?),
                "--concurrency" => {
                    self.concurrency = value(args, &mut i, flag)?
                        .parse()
                        .context("--concurrency must be a positive integer")?
                }
                "--log-level" => self.log_level = Some(value(args, &mut i, flag)?.to_ascii_lowercase()),
                other if other.starts_with("--") => bail!("unknown flag {}", other),
                // Bare words are tickers
                _ => self.tickers.push(args[i].clone()),
            }
            i += 1;
        }

        if self.concurrency == 0 {
            bail!("concurrency must be at least 1");
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            min_score: self.min_score,
            strict: self.strict,
        }
    }
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .with_context(|| format!("{flag} requires a value"))
}

fn parse_percent(raw: &str) -> Result<f64> {
    let percent: f64 = raw.trim().parse().context("percent must be a number")?;
    if !(percent > 0.0 && percent <= 100.0) {
        bail!("percent must be within (0, 100], got {}", percent);
    }
    Ok(percent)
}

fn policy_for_suffix(suffix: &str) -> TickerPolicy {
    let suffix = suffix.trim();
    if suffix.is_empty() {
        TickerPolicy::AsIs
    } else {
        TickerPolicy::AutoSuffix {
            suffix: suffix.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_env_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("SCREENER_MIN_SCORE", "70"),
            ("SCREENER_STRICT", "true"),
            ("SCREENER_FORMAT", "json"),
            ("SCREENER_TICKER_SUFFIX", ""),
        ]
        .into_iter()
        .collect();
        let config = CliConfig::from_vars(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.min_score, 70);
        assert!(config.strict);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.ticker_policy, TickerPolicy::AsIs);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_bad_env_value_is_an_error() {
        let result = CliConfig::from_vars(|k| (k == "SCREENER_MIN_SCORE").then(|| "sixty".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_args_parse() {
        let mut config = CliConfig::default();
        config
            .apply_args(&args(&[
                "--snapshot", "snap.json", "--tickers", "7203", "6758.T", "--strict",
                "--min-score", "55", "--format", "json", "--top-percent", "10",
                "--period-order", "date", "9984",
            ]))
            .unwrap();
        assert_eq!(config.snapshot_path, Some(PathBuf::from("snap.json")));
        assert_eq!(config.tickers, vec!["7203", "6758.T", "9984"]);
        assert!(config.strict);
        assert_eq!(config.min_score, 55);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.top_percent, Some(10.0));
        assert_eq!(config.period_order, PeriodOrder::Date);
        assert_eq!(
            config.engine_config(),
            EngineConfig { min_score: 55, strict: true }
        );
    }

    #[test]
    fn test_args_errors() {
        assert!(CliConfig::default().apply_args(&args(&["--min-score"])).is_err());
        assert!(CliConfig::default().apply_args(&args(&["--format", "xml"])).is_err());
        assert!(CliConfig::default().apply_args(&args(&["--top-percent", "0"])).is_err());
        assert!(CliConfig::default().apply_args(&args(&["--concurrency", "0"])).is_err());
        assert!(CliConfig::default().apply_args(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_negative_min_score_reaches_engine_validation() {
        let mut config = CliConfig::default();
        config.apply_args(&args(&["--min-score", "-5"])).unwrap();
        assert!(config.engine_config().validate().is_err());
    }
}
