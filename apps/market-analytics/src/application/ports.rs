//! Price History Port (Driven Port)
//!
//! Interface for fetching historical OHLCV bars from a market-data provider.
//! One blocking fetch per request; adapters live in `infrastructure`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::models::{PriceSeries, Symbol};
use crate::signals::Interval;

/// Request for one symbol's bar history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryRequest {
    /// Instrument to fetch.
    pub symbol: Symbol,
    /// Inclusive lower bound; `None` for the provider's earliest bar.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound; `None` for the latest bar.
    pub end: Option<DateTime<Utc>>,
    /// Bar granularity.
    pub interval: Interval,
}

impl HistoryRequest {
    /// Request the full history of `symbol` at `interval`.
    #[must_use]
    pub const fn new(symbol: Symbol, interval: Interval) -> Self {
        Self {
            symbol,
            start: None,
            end: None,
            interval,
        }
    }

    /// Restrict the request to `[start, end]`.
    #[must_use]
    pub const fn with_range(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Whether `timestamp` falls inside the requested range.
    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| timestamp >= s) && self.end.is_none_or(|e| timestamp <= e)
    }
}

/// Price history provider error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// Provider has no data for the symbol.
    #[error("No price history for {symbol}")]
    NotFound {
        /// Requested symbol.
        symbol: Symbol,
    },

    /// Provider could not be reached or refused the request.
    #[error("Price history provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Provider returned data that violates the bar/series model.
    #[error("Malformed price history: {reason}")]
    Malformed {
        /// What was wrong.
        reason: String,
    },

    /// Request the provider cannot serve as given.
    #[error("Invalid history request: {reason}")]
    InvalidRequest {
        /// What was wrong.
        reason: String,
    },

    /// Local I/O failure.
    #[error("I/O error reading {path}: {message}")]
    Io {
        /// File or resource path.
        path: String,
        /// Error details.
        message: String,
    },
}

impl From<AnalyticsError> for ProviderError {
    fn from(err: AnalyticsError) -> Self {
        Self::Malformed {
            reason: err.to_string(),
        }
    }
}

/// Port for fetching historical bars.
///
/// Implementations return bars in strictly increasing timestamp order,
/// filtered to the requested range.
pub trait PriceHistoryProvider: Send + Sync {
    /// Fetch bars for a request.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown symbol, `Unavailable` if the source
    /// cannot be reached, and `Malformed` if the data fails validation.
    fn fetch(&self, request: &HistoryRequest) -> Result<PriceSeries, ProviderError>;
}

impl<P: PriceHistoryProvider + ?Sized> PriceHistoryProvider for std::sync::Arc<P> {
    fn fetch(&self, request: &HistoryRequest) -> Result<PriceSeries, ProviderError> {
        (**self).fetch(request)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_open_range_contains_everything() {
        let req = HistoryRequest::new(Symbol::new("AAPL").unwrap(), Interval::Day1);
        assert!(req.contains(ts(1)));
        assert!(req.contains(ts(31)));
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let req = HistoryRequest::new(Symbol::new("AAPL").unwrap(), Interval::Day1)
            .with_range(Some(ts(5)), Some(ts(10)));
        assert!(!req.contains(ts(4)));
        assert!(req.contains(ts(5)));
        assert!(req.contains(ts(10)));
        assert!(!req.contains(ts(11)));
    }

    #[test]
    fn test_analytics_error_maps_to_malformed() {
        let err: ProviderError = AnalyticsError::invalid_input("bad bar").into();
        assert!(matches!(err, ProviderError::Malformed { .. }));
    }
}
