//! fundamental-screener: evaluate tickers against the fundamental hard filters
//! and score, reading provider data from a JSON snapshot.
//!
//! Usage:
//!   fundamental-screener --snapshot data/snapshot.json 7203 6758 9984
//!   fundamental-screener --snapshot data/snapshot.json --tickers-file data/universe.txt --strict
//!   fundamental-screener --snapshot data/snapshot.json --format json --top-percent 10
//!
//! Environment (also read from `.env`): SCREENER_MIN_SCORE, SCREENER_STRICT,
//! SCREENER_FORMAT, SCREENER_TOP_PERCENT, SCREENER_CONCURRENCY,
//! SCREENER_TICKER_SUFFIX, SCREENER_SNAPSHOT. Flags win over environment.

mod config;
mod output;
mod snapshot;
mod tickers;

use anyhow::Context;
use config::{CliConfig, OutputFormat, PeriodOrder};
use fundamental_analysis::{screen, FundamentalAnalysisEngine, LatestDate};
use screener_core::{resolve_tickers, EvaluationResult};
use snapshot::SnapshotProvider;
use std::io::Write;
use std::sync::Arc;

fn init_tracing(level: Option<&str>) {
    let level = level.unwrap_or("info");
    let default_filter = format!("fundamental_screener={level},fundamental_analysis={level}");
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    config.apply_args(&args)?;

    init_tracing(config.log_level.as_deref());

    // Invalid configuration stops the run before any ticker is looked at
    let mut engine = FundamentalAnalysisEngine::new(config.engine_config())
        .context("invalid screener configuration")?;
    if config.period_order == PeriodOrder::Date {
        engine = engine.with_period_ordering(LatestDate);
    }

    let snapshot_path = config
        .snapshot_path
        .clone()
        .context("a data snapshot is required (--snapshot <file> or SCREENER_SNAPSHOT)")?;
    let provider = Arc::new(SnapshotProvider::from_path(&snapshot_path)?);

    let mut raw_tickers = config.tickers.clone();
    if let Some(path) = &config.tickers_file {
        raw_tickers.extend(tickers::load_ticker_file(path)?);
    }
    if raw_tickers.is_empty() {
        tracing::info!("No tickers given; screening every ticker in the snapshot");
        raw_tickers = provider.tickers();
    }
    let requests = resolve_tickers(&raw_tickers, &config.ticker_policy);

    let results = screen(Arc::new(engine), provider, requests, config.concurrency).await;

    let shown: Vec<&EvaluationResult> = match config.top_percent {
        Some(percent) => {
            let top = output::select_top_percent(&results, percent);
            tracing::info!(
                "Displaying top {} of {} records (top {}%)",
                top.len(),
                results.len(),
                percent
            );
            top
        }
        None => results.iter().collect(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for result in shown {
        let line = match config.format {
            OutputFormat::Json => output::json_line(result)?,
            OutputFormat::Text => output::text_line(result),
        };
        writeln!(out, "{line}")?;
    }

    let passed = results.iter().filter(|r| r.pass).count();
    tracing::info!("{}/{} tickers passed", passed, results.len());
    Ok(())
}
