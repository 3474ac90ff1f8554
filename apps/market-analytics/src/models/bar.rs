//! OHLCV bar value type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// Raw bar as received from a provider, before validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawBar {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// One OHLCV bar.
///
/// Construction validates the OHLC envelope, so every `Bar` in circulation
/// satisfies `low <= min(open, close)` and `high >= max(open, close)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBar", into = "RawBar")]
pub struct Bar {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl Bar {
    /// Create a validated bar.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a price is not finite and positive, the
    /// volume is negative, or open/close fall outside the high/low range.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self> {
        for (name, value) in [("open", open), ("high", high), ("low", low), ("close", close)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AnalyticsError::invalid_input(format!(
                    "{name} price {value} at {timestamp} must be finite and positive"
                )));
            }
        }
        if !volume.is_finite() || volume < 0.0 {
            return Err(AnalyticsError::invalid_input(format!(
                "volume {volume} at {timestamp} must be finite and non-negative"
            )));
        }
        if high < low {
            return Err(AnalyticsError::invalid_input(format!(
                "high {high} below low {low} at {timestamp}"
            )));
        }
        if open > high || open < low || close > high || close < low {
            return Err(AnalyticsError::invalid_input(format!(
                "open {open} / close {close} outside [{low}, {high}] at {timestamp}"
            )));
        }

        Ok(Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Bar open time.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Open price.
    #[must_use]
    pub const fn open(&self) -> f64 {
        self.open
    }

    /// High price.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Low price.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Close price.
    #[must_use]
    pub const fn close(&self) -> f64 {
        self.close
    }

    /// Traded volume.
    #[must_use]
    pub const fn volume(&self) -> f64 {
        self.volume
    }

    /// Typical price `(high + low + close) / 3`.
    #[must_use]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

impl TryFrom<RawBar> for Bar {
    type Error = AnalyticsError;

    fn try_from(raw: RawBar) -> Result<Self> {
        Self::new(
            raw.timestamp,
            raw.open,
            raw.high,
            raw.low,
            raw.close,
            raw.volume,
        )
    }
}

impl From<Bar> for RawBar {
    fn from(bar: Bar) -> Self {
        Self {
            timestamp: bar.timestamp,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::error::ErrorCode;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_valid_bar() {
        let bar = Bar::new(ts(), 100.0, 105.0, 99.0, 104.0, 1_000.0).unwrap();
        assert_eq!(bar.close(), 104.0);
        assert!((bar.typical_price() - (105.0 + 99.0 + 104.0) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_high_below_low_rejected() {
        let err = Bar::new(ts(), 100.0, 98.0, 99.0, 100.0, 0.0).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }

    #[test]
    fn test_close_outside_range_rejected() {
        assert!(Bar::new(ts(), 100.0, 101.0, 99.0, 102.0, 0.0).is_err());
        assert!(Bar::new(ts(), 98.0, 101.0, 99.0, 100.0, 0.0).is_err());
    }

    #[test]
    fn test_non_finite_and_negative_rejected() {
        assert!(Bar::new(ts(), f64::NAN, 101.0, 99.0, 100.0, 0.0).is_err());
        assert!(Bar::new(ts(), 100.0, f64::INFINITY, 99.0, 100.0, 0.0).is_err());
        assert!(Bar::new(ts(), 100.0, 101.0, 0.0, 100.0, 0.0).is_err());
        assert!(Bar::new(ts(), 100.0, 101.0, 99.0, 100.0, -1.0).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok = r#"{"timestamp":"2024-01-02T00:00:00Z","open":10,"high":11,"low":9,"close":10.5,"volume":5}"#;
        let bar: Bar = serde_json::from_str(ok).unwrap();
        assert_eq!(bar.high(), 11.0);

        let bad = r#"{"timestamp":"2024-01-02T00:00:00Z","open":10,"high":9,"low":11,"close":10,"volume":5}"#;
        assert!(serde_json::from_str::<Bar>(bad).is_err());
    }
}
