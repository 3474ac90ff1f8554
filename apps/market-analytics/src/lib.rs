// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::suboptimal_flops
    )
)]

//! Market Analytics - Rust Core Library
//!
//! Numerical core of the market dashboard: derives technical indicators from
//! an OHLCV history, scores the latest bar into a recommendation and projects
//! forward price paths.
//!
//! # Architecture
//!
//! ## Core (pure, no I/O)
//!
//! - `models`: validated `Bar`, `PriceSeries`, `Symbol`
//! - `indicators`: SMA/EMA, RSI, MACD, Bollinger Bands, CCI, crossovers
//! - `signals`: `SignalScorer` rules per `AnalysisMode`
//! - `simulation`: geometric Brownian motion Monte Carlo paths
//!
//! ## Application
//!
//! - `ports`: `PriceHistoryProvider` (outbound)
//! - `analysis`: `AnalysisService` running one compute pass
//!
//! ## Infrastructure
//!
//! - In-memory, JSON file and TTL-cached price history adapters
//!
//! # Example
//!
//! ```rust,ignore
//! use market_analytics::{IndicatorConfig, IndicatorSnapshot, AnalysisMode};
//! use market_analytics::{compute_indicators, score_signals, simulate};
//!
//! let set = compute_indicators(&series, &IndicatorConfig::default())?;
//! let snapshot = IndicatorSnapshot::latest(&series, &set)?;
//! let score = score_signals(&snapshot, AnalysisMode::TraderSwing)?;
//! let paths = simulate(&series.closes(), 30, 50)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Core
// =============================================================================

/// Error types and codes.
pub mod error;

/// Bar, series and symbol value types.
pub mod models;

/// Technical indicator engine.
pub mod indicators;

/// Rule-based signal scoring.
pub mod signals;

/// Monte Carlo price-path simulation.
pub mod simulation;

// =============================================================================
// Application and Infrastructure
// =============================================================================

/// Application layer - ports and the analysis use case.
pub mod application;

/// Infrastructure layer - price history adapters.
pub mod infrastructure;

/// Configuration loading and validation.
pub mod config;

/// Logging setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{AnalyticsError, ErrorCode, Result};
pub use models::{AssetClass, Bar, MarketSummary, PriceSeries, Symbol};

pub use indicators::{
    Indicator, IndicatorConfig, IndicatorSeries, IndicatorSet, IndicatorSnapshot,
    compute_indicators,
};
pub use signals::{
    AnalysisMode, Interval, Recommendation, ScoreResult, ScoringConfig, SignalScorer,
    score_signals,
};
pub use simulation::{
    MonteCarloBuilder, MonteCarloSimulator, SimulationConfig, SimulationResult, simulate,
};

pub use application::{
    AnalysisError, AnalysisReport, AnalysisService, HistoryRequest, PriceHistoryProvider,
    ProviderError, ScoreOutcome,
};
pub use config::{AnalyticsConfig, ConfigError, load_config, load_config_from_string};
pub use infrastructure::{CachedPriceHistory, InMemoryPriceHistory, JsonFilePriceHistory};
