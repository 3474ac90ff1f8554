//! Short-TTL response cache in front of a price history provider.
//!
//! Repeated fetches for the same request within the TTL are served from
//! memory. Errors are never cached.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::application::ports::{HistoryRequest, PriceHistoryProvider, ProviderError};
use crate::models::PriceSeries;

/// Default time a fetched history stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(15);

#[derive(Debug)]
struct Entry {
    fetched_at: Instant,
    series: PriceSeries,
}

/// Caching decorator for any [`PriceHistoryProvider`].
#[derive(Debug)]
pub struct CachedPriceHistory<P> {
    inner: P,
    ttl: Duration,
    entries: Mutex<HashMap<HistoryRequest, Entry>>,
}

impl<P: PriceHistoryProvider> CachedPriceHistory<P> {
    /// Wrap `inner` with a cache of the given TTL. A zero TTL disables caching.
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Wrap `inner` with the default 15 second TTL.
    pub fn with_default_ttl(inner: P) -> Self {
        Self::new(inner, DEFAULT_TTL)
    }

    /// Configured TTL.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of cached responses. Stale ones linger until the next miss.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every cached response.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn lookup(&self, request: &HistoryRequest, now: Instant) -> Option<PriceSeries> {
        let mut entries = self.entries.lock();
        match entries.get(request) {
            Some(entry) if now.duration_since(entry.fetched_at) < self.ttl => {
                Some(entry.series.clone())
            }
            Some(_) => {
                entries.remove(request);
                None
            }
            None => None,
        }
    }
}

impl<P: PriceHistoryProvider> PriceHistoryProvider for CachedPriceHistory<P> {
    fn fetch(&self, request: &HistoryRequest) -> Result<PriceSeries, ProviderError> {
        if self.ttl.is_zero() {
            return self.inner.fetch(request);
        }

        if let Some(series) = self.lookup(request, Instant::now()) {
            debug!(symbol = %request.symbol, interval = %request.interval, "Cache hit");
            return Ok(series);
        }

        // Fetch outside the lock; concurrent misses may both reach the provider.
        let series = self.inner.fetch(request)?;
        let now = Instant::now();
        let mut entries = self.entries.lock();
        // Requests with moving ranges never repeat; drop them once stale.
        entries.retain(|_, entry| now.duration_since(entry.fetched_at) < self.ttl);
        entries.insert(
            request.clone(),
            Entry {
                fetched_at: now,
                series: series.clone(),
            },
        );
        drop(entries);
        debug!(symbol = %request.symbol, interval = %request.interval, "Cache miss");
        Ok(series)
    }
}
