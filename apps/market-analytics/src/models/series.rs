//! Ordered price history for one symbol.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Bar, Symbol};
use crate::error::{AnalyticsError, Result};

/// Ordered OHLCV history for a single symbol.
///
/// Timestamps are strictly increasing. The series is never mutated after
/// construction; indicators and simulations derive new data from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: Symbol,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Create a series, checking timestamp ordering.
    ///
    /// An empty series is valid here; computations that need data reject it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` on duplicate or decreasing timestamps.
    pub fn new(symbol: Symbol, bars: Vec<Bar>) -> Result<Self> {
        if let Some(pos) = bars
            .windows(2)
            .position(|w| w[1].timestamp() <= w[0].timestamp())
        {
            return Err(AnalyticsError::invalid_input(format!(
                "{symbol}: timestamps not strictly increasing at index {} ({} after {})",
                pos + 1,
                bars[pos + 1].timestamp(),
                bars[pos].timestamp()
            )));
        }
        Ok(Self { symbol, bars })
    }

    /// Symbol this series belongs to.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// All bars, oldest first.
    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the series has no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar.
    #[must_use]
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Bar timestamps.
    #[must_use]
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(Bar::timestamp).collect()
    }

    /// Close prices.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(Bar::close).collect()
    }

    /// High prices.
    #[must_use]
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(Bar::high).collect()
    }

    /// Low prices.
    #[must_use]
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(Bar::low).collect()
    }

    /// Typical prices `(high + low + close) / 3`.
    #[must_use]
    pub fn typical_prices(&self) -> Vec<f64> {
        self.bars.iter().map(Bar::typical_price).collect()
    }
}

/// Latest price and one-bar change, as shown on the summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    /// Most recent close.
    pub last_close: f64,
    /// Close of the bar before, if any.
    pub previous_close: Option<f64>,
    /// Percentage change from the previous close.
    pub change_pct: Option<f64>,
}

impl MarketSummary {
    /// Summarize the last two bars of a series.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty series.
    pub fn from_series(series: &PriceSeries) -> Result<Self> {
        let bars = series.bars();
        let last = bars.last().ok_or_else(|| {
            AnalyticsError::invalid_input(format!("{}: empty price series", series.symbol()))
        })?;
        let previous_close = bars.len().checked_sub(2).map(|i| bars[i].close());
        let change_pct = previous_close.map(|prev| (last.close() - prev) / prev * 100.0);

        Ok(Self {
            last_close: last.close(),
            previous_close,
            change_pct,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn bar_at(day: i64, close: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day);
        Bar::new(ts, close, close, close, close, 0.0).unwrap()
    }

    fn symbol() -> Symbol {
        Symbol::new("AKBNK.IS").unwrap()
    }

    #[test]
    fn test_empty_series_is_valid() {
        let series = PriceSeries::new(symbol(), vec![]).unwrap();
        assert!(series.is_empty());
        assert!(series.last().is_none());
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let err = PriceSeries::new(symbol(), vec![bar_at(0, 1.0), bar_at(0, 2.0)]).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_decreasing_timestamp_rejected() {
        assert!(PriceSeries::new(symbol(), vec![bar_at(2, 1.0), bar_at(1, 2.0)]).is_err());
    }

    #[test]
    fn test_accessors_aligned() {
        let series =
            PriceSeries::new(symbol(), vec![bar_at(0, 1.0), bar_at(1, 2.0), bar_at(2, 3.0)])
                .unwrap();
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.timestamps().len(), 3);
        assert_eq!(series.typical_prices(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_market_summary() {
        let series = PriceSeries::new(symbol(), vec![bar_at(0, 100.0), bar_at(1, 110.0)]).unwrap();
        let summary = MarketSummary::from_series(&series).unwrap();
        assert_eq!(summary.last_close, 110.0);
        assert_eq!(summary.previous_close, Some(100.0));
        assert!((summary.change_pct.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_market_summary_single_bar() {
        let series = PriceSeries::new(symbol(), vec![bar_at(0, 100.0)]).unwrap();
        let summary = MarketSummary::from_series(&series).unwrap();
        assert_eq!(summary.previous_close, None);
        assert_eq!(summary.change_pct, None);
    }

    #[test]
    fn test_market_summary_empty() {
        let series = PriceSeries::new(symbol(), vec![]).unwrap();
        assert!(MarketSummary::from_series(&series).is_err());
    }
}
