//! Analysis Service
//!
//! Runs one compute pass for a symbol: fetch history, derive indicators,
//! score the latest bar and, when enabled, project Monte Carlo paths.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::ports::{HistoryRequest, PriceHistoryProvider, ProviderError};
use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::indicators::{IndicatorConfig, IndicatorSet, IndicatorSnapshot, compute_indicators};
use crate::models::{AssetClass, MarketSummary, PriceSeries, Symbol};
use crate::signals::{AnalysisMode, Interval, ScoreResult, SignalScorer};
use crate::simulation::{MonteCarloSimulator, SimulationConfig, SimulationResult};

/// Errors from an analysis pass.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// Fetching history failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Computation failed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

/// Scoring outcome as shown on the recommendation card.
///
/// Too little history for the mode is an expected state on short series,
/// so it is reported alongside the indicators rather than failing the pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreOutcome {
    /// Every input was defined.
    Scored(ScoreResult),
    /// Some indicator the mode reads is still undefined.
    InsufficientData {
        /// Mode that was requested.
        mode: AnalysisMode,
        /// Names of the undefined indicators.
        missing: Vec<String>,
    },
}

impl ScoreOutcome {
    /// Scored result, if any.
    #[must_use]
    pub const fn result(&self) -> Option<&ScoreResult> {
        match self {
            Self::Scored(result) => Some(result),
            Self::InsufficientData { .. } => None,
        }
    }
}

/// Everything one analysis pass produces for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Analyzed symbol.
    pub symbol: Symbol,
    /// Asset class inferred from the symbol.
    pub asset_class: AssetClass,
    /// Bar interval of the history.
    pub interval: Interval,
    /// Scoring mode.
    pub mode: AnalysisMode,
    /// Number of bars analyzed.
    pub bars: usize,
    /// Last close and one-bar change.
    pub summary: MarketSummary,
    /// Latest indicator values.
    pub snapshot: IndicatorSnapshot,
    /// Full indicator series.
    pub indicators: IndicatorSet,
    /// Recommendation.
    pub score: ScoreOutcome,
    /// Forward projection; `None` when disabled or history is too short.
    pub simulation: Option<SimulationResult>,
}

/// Use case orchestrating indicators, scoring and simulation.
pub struct AnalysisService<P>
where
    P: PriceHistoryProvider,
{
    provider: P,
    indicators: IndicatorConfig,
    scorer: SignalScorer,
    simulator: Option<MonteCarloSimulator>,
}

impl<P> AnalysisService<P>
where
    P: PriceHistoryProvider,
{
    /// Create a service with explicit component settings.
    pub fn new(
        provider: P,
        indicators: IndicatorConfig,
        scorer: SignalScorer,
        simulation: Option<SimulationConfig>,
    ) -> Self {
        Self {
            provider,
            indicators,
            scorer,
            simulator: simulation.map(MonteCarloSimulator::new),
        }
    }

    /// Create a service from the loaded configuration.
    pub fn from_config(provider: P, config: &AnalyticsConfig) -> Self {
        let simulation = config
            .simulation
            .enabled
            .then(|| config.simulation.params.clone());
        Self::new(
            provider,
            config.indicators.clone(),
            SignalScorer::new(config.scoring.clone()),
            simulation,
        )
    }

    /// Fetch history and analyze it.
    ///
    /// `mode` defaults to the dashboard mapping for the request interval.
    ///
    /// # Errors
    ///
    /// Returns `Provider` if the fetch fails and `Analytics` if the history
    /// is empty or a computation is misconfigured.
    pub fn analyze(
        &self,
        request: &HistoryRequest,
        mode: Option<AnalysisMode>,
    ) -> Result<AnalysisReport, AnalysisError> {
        let series = self.provider.fetch(request)?;
        let mode = mode.unwrap_or_else(|| AnalysisMode::for_interval(request.interval));
        self.analyze_series(series, request.interval, mode)
    }

    /// Analyze a series already in hand.
    ///
    /// # Errors
    ///
    /// Returns `Analytics` for an empty series or invalid configuration.
    pub fn analyze_series(
        &self,
        series: PriceSeries,
        interval: Interval,
        mode: AnalysisMode,
    ) -> Result<AnalysisReport, AnalysisError> {
        let summary = MarketSummary::from_series(&series)?;
        let indicators = compute_indicators(&series, &self.indicators)?;
        let snapshot = IndicatorSnapshot::latest(&series, &indicators)?;

        let score = match self.scorer.score(&snapshot, mode) {
            Ok(result) => ScoreOutcome::Scored(result),
            Err(AnalyticsError::InsufficientData { mode, missing }) => {
                warn!(
                    symbol = %series.symbol(),
                    %mode,
                    missing = ?missing,
                    "Not enough history to score"
                );
                ScoreOutcome::InsufficientData { mode, missing }
            }
            Err(e) => return Err(e.into()),
        };

        let simulation = match &self.simulator {
            Some(simulator) => match simulator.run(&series.closes()) {
                Ok(result) => Some(result),
                Err(AnalyticsError::InsufficientHistory {
                    required,
                    available,
                }) => {
                    warn!(
                        symbol = %series.symbol(),
                        required,
                        available,
                        "Skipping simulation"
                    );
                    None
                }
                Err(e) => return Err(e.into()),
            },
            None => None,
        };

        info!(
            symbol = %series.symbol(),
            %interval,
            %mode,
            bars = series.len(),
            last_close = summary.last_close,
            recommendation = ?score.result().map(|r| r.recommendation),
            simulated = simulation.is_some(),
            "Analysis complete"
        );

        Ok(AnalysisReport {
            symbol: series.symbol().clone(),
            asset_class: series.symbol().asset_class(),
            interval,
            mode,
            bars: series.len(),
            summary,
            snapshot,
            indicators,
            score,
            simulation,
        })
    }
}
