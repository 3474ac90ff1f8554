//! Market Analytics Binary
//!
//! Runs one analysis pass over a bar file and prints the report as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin market-analytics -- bars.json [SYMBOL]
//! ```
//!
//! `SYMBOL` defaults to the file stem (`AAPL.json` → `AAPL`).
//!
//! # Environment Variables
//!
//! - `ANALYTICS_CONFIG`: YAML configuration path (default: built-in defaults)
//! - `ANALYTICS_INTERVAL`: bar interval code, e.g. `1d`, `1wk` (default: `1d`)
//! - `ANALYTICS_MODE`: SCALPER | TRADER_SWING | INVESTOR (default: from interval)
//! - `RUST_LOG`: Log filter (overrides `observability.logging.level`)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use market_analytics::config::{AnalyticsConfig, load_config};
use market_analytics::telemetry::init_logging;
use market_analytics::{
    AnalysisMode, AnalysisService, CachedPriceHistory, HistoryRequest, Interval,
    JsonFilePriceHistory, Symbol,
};
use tracing::info;

/// Parsed command line and environment.
struct CliArgs {
    bars: PathBuf,
    symbol: Symbol,
    interval: Interval,
    mode: Option<AnalysisMode>,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let Some(bars) = args.next().map(PathBuf::from) else {
        bail!("usage: market-analytics <bars.json> [SYMBOL]");
    };

    let symbol = match args.next() {
        Some(s) => s,
        None => bars
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .with_context(|| format!("cannot derive a symbol from {}", bars.display()))?,
    };
    let symbol = Symbol::new(&symbol).context("invalid symbol")?;

    let interval = match std::env::var("ANALYTICS_INTERVAL") {
        Ok(code) if !code.is_empty() => code
            .parse::<Interval>()
            .context("invalid ANALYTICS_INTERVAL")?,
        _ => Interval::Day1,
    };
    let mode = match std::env::var("ANALYTICS_MODE") {
        Ok(mode) if !mode.is_empty() => Some(
            mode.parse::<AnalysisMode>()
                .context("invalid ANALYTICS_MODE")?,
        ),
        _ => None,
    };

    Ok(CliArgs {
        bars,
        symbol,
        interval,
        mode,
    })
}

fn load(path: Option<&Path>) -> Result<AnalyticsConfig> {
    match path {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(AnalyticsConfig::default()),
    }
}

fn main() -> Result<()> {
    let config_path = std::env::var_os("ANALYTICS_CONFIG").map(PathBuf::from);
    let config = load(config_path.as_deref())?;

    init_logging(&config.observability.logging)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let args = parse_args()?;
    info!(
        bars = %args.bars.display(),
        symbol = %args.symbol,
        interval = %args.interval,
        "Starting market analytics"
    );

    let provider = CachedPriceHistory::new(
        JsonFilePriceHistory::file(&args.bars),
        config.cache.ttl(),
    );
    let service = AnalysisService::from_config(provider, &config);

    let request = HistoryRequest::new(args.symbol, args.interval);
    let report = service
        .analyze(&request, args.mode)
        .with_context(|| format!("analysis of {} failed", request.symbol))?;

    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}
