//! Simple and exponential moving averages.

use super::series::{IndicatorSeries, ensure_window, mean, rolling};
use crate::error::Result;

/// Simple moving average over a trailing window.
///
/// Undefined for indices `< window - 1`.
pub fn sma(values: &[f64], window: usize) -> Result<IndicatorSeries> {
    ensure_window("sma_window", window)?;
    Ok(rolling(values, window, mean))
}

/// Exponential moving average with `alpha = 2 / (span + 1)`.
///
/// Seeded with the first value, no bias adjustment.
pub fn ema(values: &[f64], span: usize) -> Result<IndicatorSeries> {
    let wrapped: IndicatorSeries = values.iter().copied().map(Some).collect();
    ema_series(&wrapped, span)
}

/// EMA over a series that may have leading (or interior) undefined values.
///
/// Seeded by the first defined value. Undefined inputs produce undefined
/// outputs and leave the running average untouched.
pub fn ema_series(values: &IndicatorSeries, span: usize) -> Result<IndicatorSeries> {
    ensure_window("ema_span", span)?;
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev: Option<f64> = None;

    Ok(values
        .values()
        .iter()
        .map(|value| {
            let x = (*value)?;
            // prev + a*(x - prev) keeps a flat input exactly flat
            let next = prev.map_or(x, |p| p + alpha * (x - p));
            prev = Some(next);
            Some(next)
        })
        .collect())
}
