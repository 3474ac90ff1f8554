//! Aligned indicator series with explicit undefined entries.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// Indicator values aligned one-to-one with the source bars.
///
/// `None` marks an index without enough history. Undefined values are never
/// encoded as zero or NaN.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSeries(Vec<Option<f64>>);

impl IndicatorSeries {
    /// Series of `len` undefined values.
    #[must_use]
    pub fn undefined(len: usize) -> Self {
        Self(vec![None; len])
    }

    /// Number of entries (defined or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the series has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at `index`, `None` when undefined or out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied().flatten()
    }

    /// Value on the most recent bar.
    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.0.last().copied().flatten()
    }

    /// Raw entries.
    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.0
    }

    /// Index of the first defined value.
    #[must_use]
    pub fn first_defined(&self) -> Option<usize> {
        self.0.iter().position(Option::is_some)
    }

    /// Number of defined values.
    #[must_use]
    pub fn defined_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }

    /// Combine two aligned series point by point; undefined if either side is.
    #[must_use]
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => Some(f(*a, *b)),
                _ => None,
            })
            .collect()
    }
}

impl From<Vec<Option<f64>>> for IndicatorSeries {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self(values)
    }
}

impl FromIterator<Option<f64>> for IndicatorSeries {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Apply `f` to every full trailing window of `values`.
///
/// Entry `t` is `f(values[t + 1 - window..=t])`, undefined for `t < window - 1`.
pub(crate) fn rolling(values: &[f64], window: usize, f: impl Fn(&[f64]) -> f64) -> IndicatorSeries {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return IndicatorSeries(out);
    }
    for (offset, slice) in values.windows(window).enumerate() {
        out[offset + window - 1] = Some(f(slice));
    }
    IndicatorSeries(out)
}

/// Arithmetic mean of a non-empty slice.
///
/// Accumulated as offsets from the first element so a flat window returns
/// that element exactly.
pub(crate) fn mean(values: &[f64]) -> f64 {
    let base = values[0];
    base + values.iter().map(|v| v - base).sum::<f64>() / values.len() as f64
}

/// Population standard deviation of a non-empty slice. Zero for a flat window.
pub(crate) fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Mean absolute deviation of a non-empty slice around its mean.
pub(crate) fn mean_abs_deviation(values: &[f64], m: f64) -> f64 {
    values.iter().map(|v| (v - m).abs()).sum::<f64>() / values.len() as f64
}

pub(crate) fn ensure_window(name: &'static str, window: usize) -> Result<()> {
    if window == 0 {
        return Err(AnalyticsError::invalid_parameter(name, "must be at least 1"));
    }
    Ok(())
}
