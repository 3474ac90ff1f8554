//! Technical indicator engine.
//!
//! Pure functions over price slices. Every output is an [`IndicatorSeries`]
//! aligned one-to-one with the input bars, with `None` wherever a window has
//! not yet filled. No look-ahead: entry `t` only reads bars `..=t`.
//!
//! - **Trend**: SMA, EMA, golden/death crossovers
//! - **Momentum**: RSI (simple or Wilder smoothing), MACD
//! - **Volatility**: Bollinger Bands, CCI
//!
//! [`compute_indicators`] runs the whole set for one [`PriceSeries`] and
//! [`IndicatorSnapshot::latest`] extracts what the signal scorer reads.

mod crossover;
mod momentum;
mod moving_average;
mod series;
mod volatility;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

pub use crossover::{CrossDirection, Crossover, crossovers};
pub use momentum::{Macd, RSI_NEUTRAL, RsiSmoothing, macd, rsi};
pub use moving_average::{ema, ema_series, sma};
pub use series::IndicatorSeries;
pub use volatility::{BollingerBands, CCI_CONSTANT, CCI_MAD_EPSILON, bollinger_bands, cci};

use crate::error::{AnalyticsError, Result};
use crate::models::PriceSeries;

/// Indicator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// RSI lookback.
    pub rsi_window: usize,
    /// RSI gain/loss smoothing.
    pub rsi_smoothing: RsiSmoothing,
    /// MACD fast EMA span.
    pub macd_fast: usize,
    /// MACD slow EMA span.
    pub macd_slow: usize,
    /// MACD signal EMA span.
    pub macd_signal: usize,
    /// Bollinger window.
    pub bollinger_window: usize,
    /// Bollinger band width in standard deviations.
    pub bollinger_k: f64,
    /// CCI window.
    pub cci_window: usize,
    /// Short trend SMA (read by the short-trend and cross rules).
    pub sma_short: usize,
    /// Medium trend SMA.
    pub sma_medium: usize,
    /// Long trend SMA.
    pub sma_long: usize,
    /// Extra EMA overlays.
    pub ema_spans: Vec<usize>,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_window: 14,
            rsi_smoothing: RsiSmoothing::Simple,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_window: 20,
            bollinger_k: 2.0,
            cci_window: 20,
            sma_short: 20,
            sma_medium: 50,
            sma_long: 200,
            ema_spans: vec![20, 50],
        }
    }
}

impl IndicatorConfig {
    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for zero windows, `macd_fast >= macd_slow`,
    /// unordered trend windows or a negative band width.
    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("rsi_window", self.rsi_window),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bollinger_window", self.bollinger_window),
            ("cci_window", self.cci_window),
            ("sma_short", self.sma_short),
            ("sma_medium", self.sma_medium),
            ("sma_long", self.sma_long),
        ];
        for (name, window) in windows {
            if window == 0 {
                return Err(AnalyticsError::invalid_parameter(name, "must be at least 1"));
            }
        }
        if self.ema_spans.contains(&0) {
            return Err(AnalyticsError::invalid_parameter(
                "ema_spans",
                "spans must be at least 1",
            ));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(AnalyticsError::invalid_parameter(
                "macd_fast",
                "must be shorter than macd_slow",
            ));
        }
        if !(self.sma_short < self.sma_medium && self.sma_medium < self.sma_long) {
            return Err(AnalyticsError::invalid_parameter(
                "sma_short",
                "trend windows must satisfy short < medium < long",
            ));
        }
        if !self.bollinger_k.is_finite() || self.bollinger_k < 0.0 {
            return Err(AnalyticsError::invalid_parameter(
                "bollinger_k",
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Name of a derived series in an [`IndicatorSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Indicator {
    /// Simple moving average with the given window.
    Sma(usize),
    /// Exponential moving average with the given span.
    Ema(usize),
    /// Relative Strength Index.
    Rsi,
    /// MACD line.
    Macd,
    /// MACD signal line.
    MacdSignal,
    /// MACD histogram.
    MacdHistogram,
    /// Upper Bollinger band.
    BollingerUpper,
    /// Middle Bollinger band.
    BollingerMiddle,
    /// Lower Bollinger band.
    BollingerLower,
    /// Commodity Channel Index.
    Cci,
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sma(n) => write!(f, "sma_{n}"),
            Self::Ema(n) => write!(f, "ema_{n}"),
            Self::Rsi => write!(f, "rsi"),
            Self::Macd => write!(f, "macd"),
            Self::MacdSignal => write!(f, "macd_signal"),
            Self::MacdHistogram => write!(f, "macd_histogram"),
            Self::BollingerUpper => write!(f, "bollinger_upper"),
            Self::BollingerMiddle => write!(f, "bollinger_middle"),
            Self::BollingerLower => write!(f, "bollinger_lower"),
            Self::Cci => write!(f, "cci"),
        }
    }
}

/// Trend SMA windows an [`IndicatorSet`] was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendWindows {
    /// Short SMA window.
    pub short: usize,
    /// Medium SMA window.
    pub medium: usize,
    /// Long SMA window.
    pub long: usize,
}

/// All derived series for one price series, keyed by [`Indicator`].
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    timestamps: Vec<DateTime<Utc>>,
    trend: TrendWindows,
    series: BTreeMap<Indicator, IndicatorSeries>,
}

impl IndicatorSet {
    /// Timestamps shared by every series.
    #[must_use]
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Number of bars each series covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the set covers no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Trend windows used for the SMA series.
    #[must_use]
    pub const fn trend_windows(&self) -> TrendWindows {
        self.trend
    }

    /// Series for an indicator, if it was computed.
    #[must_use]
    pub fn get(&self, indicator: Indicator) -> Option<&IndicatorSeries> {
        self.series.get(&indicator)
    }

    /// Latest value of an indicator; `None` if not computed or undefined.
    #[must_use]
    pub fn latest(&self, indicator: Indicator) -> Option<f64> {
        self.get(indicator).and_then(IndicatorSeries::last)
    }

    /// Iterate over all series in key order.
    pub fn iter(&self) -> impl Iterator<Item = (Indicator, &IndicatorSeries)> {
        self.series.iter().map(|(k, v)| (*k, v))
    }

    /// Golden/death crossovers between two computed averages.
    #[must_use]
    pub fn crossovers(&self, fast: Indicator, slow: Indicator) -> Vec<Crossover> {
        match (self.get(fast), self.get(slow)) {
            (Some(f), Some(s)) => crossovers(f, s),
            _ => Vec::new(),
        }
    }
}

impl Serialize for IndicatorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let series: BTreeMap<String, &IndicatorSeries> =
            self.series.iter().map(|(k, v)| (k.to_string(), v)).collect();
        let mut state = serializer.serialize_struct("IndicatorSet", 2)?;
        state.serialize_field("timestamps", &self.timestamps)?;
        state.serialize_field("series", &series)?;
        state.end()
    }
}

/// Compute every configured indicator for a price series.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty series and `InvalidParameter` for an
/// invalid configuration.
pub fn compute_indicators(series: &PriceSeries, config: &IndicatorConfig) -> Result<IndicatorSet> {
    config.validate()?;
    if series.is_empty() {
        return Err(AnalyticsError::invalid_input(format!(
            "{}: cannot compute indicators on an empty price series",
            series.symbol()
        )));
    }

    let closes = series.closes();
    let mut out = BTreeMap::new();

    for window in [config.sma_short, config.sma_medium, config.sma_long] {
        out.insert(Indicator::Sma(window), sma(&closes, window)?);
    }
    for &span in &config.ema_spans {
        out.insert(Indicator::Ema(span), ema(&closes, span)?);
    }

    out.insert(
        Indicator::Rsi,
        rsi(&closes, config.rsi_window, config.rsi_smoothing)?,
    );

    let m = macd(&closes, config.macd_fast, config.macd_slow, config.macd_signal)?;
    out.insert(Indicator::Macd, m.line);
    out.insert(Indicator::MacdSignal, m.signal);
    out.insert(Indicator::MacdHistogram, m.histogram);

    let bands = bollinger_bands(&closes, config.bollinger_window, config.bollinger_k)?;
    out.insert(Indicator::BollingerUpper, bands.upper);
    out.insert(Indicator::BollingerMiddle, bands.middle);
    out.insert(Indicator::BollingerLower, bands.lower);

    out.insert(
        Indicator::Cci,
        cci(&series.highs(), &series.lows(), &closes, config.cci_window)?,
    );

    debug!(
        symbol = %series.symbol(),
        bars = series.len(),
        indicators = out.len(),
        "Computed indicator set"
    );

    Ok(IndicatorSet {
        timestamps: series.timestamps(),
        trend: TrendWindows {
            short: config.sma_short,
            medium: config.sma_medium,
            long: config.sma_long,
        },
        series: out,
    })
}

/// Indicator values on the most recent bar, as read by the signal scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Latest close.
    pub close: f64,
    /// Latest RSI.
    pub rsi: Option<f64>,
    /// Latest MACD line.
    pub macd: Option<f64>,
    /// Latest MACD signal line.
    pub macd_signal: Option<f64>,
    /// Latest short trend SMA (20 by default).
    pub sma_short: Option<f64>,
    /// Latest medium trend SMA (50 by default).
    pub sma_medium: Option<f64>,
    /// Latest long trend SMA (200 by default).
    pub sma_long: Option<f64>,
}

impl IndicatorSnapshot {
    /// Read the last bar of a series and its indicator set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the series is empty or the set was computed
    /// for a series of different length.
    pub fn latest(series: &PriceSeries, set: &IndicatorSet) -> Result<Self> {
        let last = series.last().ok_or_else(|| {
            AnalyticsError::invalid_input(format!("{}: empty price series", series.symbol()))
        })?;
        if set.len() != series.len() {
            return Err(AnalyticsError::invalid_input(format!(
                "indicator set covers {} bars, series has {}",
                set.len(),
                series.len()
            )));
        }

        let trend = set.trend_windows();
        Ok(Self {
            close: last.close(),
            rsi: set.latest(Indicator::Rsi),
            macd: set.latest(Indicator::Macd),
            macd_signal: set.latest(Indicator::MacdSignal),
            sma_short: set.latest(Indicator::Sma(trend.short)),
            sma_medium: set.latest(Indicator::Sma(trend.medium)),
            sma_long: set.latest(Indicator::Sma(trend.long)),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::models::{Bar, Symbol};

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                Bar::new(
                    start + Duration::days(i as i64),
                    c,
                    c * 1.01,
                    c * 0.99,
                    c,
                    1_000.0,
                )
                .unwrap()
            })
            .collect();
        PriceSeries::new(Symbol::new("BTC-USD").unwrap(), bars).unwrap()
    }

    #[test]
    fn test_compute_all_aligned() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let series = series_from_closes(&closes);
        let set = compute_indicators(&series, &IndicatorConfig::default()).unwrap();

        assert_eq!(set.len(), 250);
        for (_, s) in set.iter() {
            assert_eq!(s.len(), 250);
        }
        assert_eq!(set.get(Indicator::Sma(200)).unwrap().first_defined(), Some(199));
        assert_eq!(set.get(Indicator::Rsi).unwrap().first_defined(), Some(14));
        assert_eq!(set.get(Indicator::Cci).unwrap().first_defined(), Some(19));
        assert!(set.get(Indicator::Ema(50)).is_some());
    }

    #[test]
    fn test_empty_series_rejected() {
        let series = PriceSeries::new(Symbol::new("X").unwrap(), vec![]).unwrap();
        let err = compute_indicators(&series, &IndicatorConfig::default()).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::InvalidInput);
    }

    #[test]
    fn test_short_series_degrades() {
        let series = series_from_closes(&[100.0, 101.0, 102.0]);
        let set = compute_indicators(&series, &IndicatorConfig::default()).unwrap();
        assert_eq!(set.latest(Indicator::Rsi), None);
        assert_eq!(set.latest(Indicator::Sma(20)), None);
        assert_eq!(set.latest(Indicator::BollingerUpper), None);
        assert!(set.latest(Indicator::Macd).is_some());

        let snapshot = IndicatorSnapshot::latest(&series, &set).unwrap();
        assert_eq!(snapshot.close, 102.0);
        assert_eq!(snapshot.rsi, None);
        assert_eq!(snapshot.sma_long, None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let series = series_from_closes(&[100.0; 5]);
        let config = IndicatorConfig {
            macd_fast: 30,
            ..IndicatorConfig::default()
        };
        assert!(compute_indicators(&series, &config).is_err());

        let config = IndicatorConfig {
            sma_medium: 10,
            ..IndicatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serializes_with_names() {
        let series = series_from_closes(&[100.0; 3]);
        let set = compute_indicators(&series, &IndicatorConfig::default()).unwrap();
        let json = serde_json::to_value(&set).unwrap();
        assert!(json["series"]["sma_200"].is_array());
        assert!(json["series"]["macd_histogram"].is_array());
        assert_eq!(json["timestamps"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_crossovers_on_set() {
        // V shape: 130 down to 101 at bar 29, then back up
        let closes: Vec<f64> = (0..60).map(|i: i32| 101.0 + f64::from((i - 29).abs())).collect();
        let series = series_from_closes(&closes);
        let config = IndicatorConfig {
            sma_short: 5,
            sma_medium: 10,
            sma_long: 20,
            ..IndicatorConfig::default()
        };
        let set = compute_indicators(&series, &config).unwrap();
        let events = set.crossovers(Indicator::Sma(5), Indicator::Sma(10));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].direction, CrossDirection::Golden);
        assert_eq!(events[0].index, 34);
        assert!(set.crossovers(Indicator::Sma(5), Indicator::Sma(7)).is_empty());
    }
}
