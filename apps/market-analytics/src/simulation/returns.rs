//! Historical log-return statistics feeding the GBM model.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// Minimum number of closes needed to form one return.
pub const MIN_CLOSES: usize = 2;

/// Log-return moments and the GBM parameters derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatistics {
    /// Number of returns.
    pub observations: usize,
    /// Mean log return.
    pub mean: f64,
    /// Population variance of log returns.
    pub variance: f64,
    /// Per-step drift `mean - variance / 2`.
    pub drift: f64,
    /// Per-step volatility `sqrt(variance)`.
    pub volatility: f64,
}

impl ReturnStatistics {
    /// Estimate from a close series.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientHistory` with fewer than two closes and
    /// `InvalidInput` if any close is not finite and positive.
    pub fn from_closes(closes: &[f64]) -> Result<Self> {
        if closes.len() < MIN_CLOSES {
            return Err(AnalyticsError::InsufficientHistory {
                required: MIN_CLOSES,
                available: closes.len(),
            });
        }
        if let Some((i, c)) = closes
            .iter()
            .enumerate()
            .find(|(_, c)| !c.is_finite() || **c <= 0.0)
        {
            return Err(AnalyticsError::invalid_input(format!(
                "close {c} at index {i} must be finite and positive"
            )));
        }

        let returns: Vec<f64> = closes.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / n;

        Ok(Self {
            observations: returns.len(),
            mean,
            variance,
            drift: 0.5f64.mul_add(-variance, mean),
            volatility: variance.sqrt(),
        })
    }
}
