//! In-memory price history for tests and embedding callers.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::application::ports::{HistoryRequest, PriceHistoryProvider, ProviderError};
use crate::models::{PriceSeries, Symbol};

/// Price history held in memory, keyed by symbol.
#[derive(Debug, Default)]
pub struct InMemoryPriceHistory {
    series: RwLock<HashMap<Symbol, PriceSeries>>,
}

impl InMemoryPriceHistory {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the history for the series' symbol.
    pub fn insert(&self, series: PriceSeries) {
        self.series.write().insert(series.symbol().clone(), series);
    }

    /// Number of stored symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.read().len()
    }

    /// Whether no symbol is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.read().is_empty()
    }
}

/// Restrict a series to the request's time range.
pub(crate) fn filter_range(
    series: &PriceSeries,
    request: &HistoryRequest,
) -> Result<PriceSeries, ProviderError> {
    if request.start.is_none() && request.end.is_none() {
        return Ok(series.clone());
    }
    let bars = series
        .bars()
        .iter()
        .filter(|b| request.contains(b.timestamp()))
        .copied()
        .collect();
    Ok(PriceSeries::new(series.symbol().clone(), bars)?)
}

impl PriceHistoryProvider for InMemoryPriceHistory {
    fn fetch(&self, request: &HistoryRequest) -> Result<PriceSeries, ProviderError> {
        let store = self.series.read();
        let series = store
            .get(&request.symbol)
            .ok_or_else(|| ProviderError::NotFound {
                symbol: request.symbol.clone(),
            })?;
        filter_range(series, request)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;
    use crate::models::Bar;
    use crate::signals::Interval;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn series(symbol: &str, n: usize) -> PriceSeries {
        let bars = (0..n)
            .map(|i| {
                let c = 100.0 + i as f64;
                Bar::new(start() + Duration::days(i as i64), c, c + 1.0, c - 1.0, c, 10.0).unwrap()
            })
            .collect();
        PriceSeries::new(Symbol::new(symbol).unwrap(), bars).unwrap()
    }

    #[test]
    fn test_fetch_full_history() {
        let store = InMemoryPriceHistory::new();
        store.insert(series("AAPL", 10));
        let req = HistoryRequest::new(Symbol::new("AAPL").unwrap(), Interval::Day1);
        assert_eq!(store.fetch(&req).unwrap().len(), 10);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_fetch_range() {
        let store = InMemoryPriceHistory::new();
        store.insert(series("AAPL", 10));
        let req = HistoryRequest::new(Symbol::new("AAPL").unwrap(), Interval::Day1).with_range(
            Some(start() + Duration::days(2)),
            Some(start() + Duration::days(5)),
        );
        let fetched = store.fetch(&req).unwrap();
        assert_eq!(fetched.len(), 4);
        assert_eq!(fetched.closes(), vec![102.0, 103.0, 104.0, 105.0]);
    }

    #[test]
    fn test_fetch_unknown_symbol() {
        let store = InMemoryPriceHistory::new();
        let req = HistoryRequest::new(Symbol::new("MSFT").unwrap(), Interval::Day1);
        assert!(matches!(
            store.fetch(&req),
            Err(ProviderError::NotFound { .. })
        ));
    }

    #[test]
    fn test_insert_replaces() {
        let store = InMemoryPriceHistory::new();
        store.insert(series("AAPL", 10));
        store.insert(series("AAPL", 3));
        let req = HistoryRequest::new(Symbol::new("AAPL").unwrap(), Interval::Day1);
        assert_eq!(store.fetch(&req).unwrap().len(), 3);
    }
}
