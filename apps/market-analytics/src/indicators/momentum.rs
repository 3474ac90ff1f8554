//! Momentum oscillators: RSI and MACD.

use serde::{Deserialize, Serialize};

use super::moving_average::{ema, ema_series};
use super::series::{IndicatorSeries, ensure_window, mean};
use crate::error::{AnalyticsError, Result};

/// RSI value reported when a window has neither gains nor losses.
pub const RSI_NEUTRAL: f64 = 50.0;

/// How average gain and loss are smoothed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsiSmoothing {
    /// Rolling arithmetic mean of the last `window` deltas.
    #[default]
    Simple,
    /// Wilder's smoothing: SMA seed, then `(prev * (n - 1) + x) / n`.
    Wilder,
}

/// Relative Strength Index.
///
/// Undefined for the first `window` bars. A window with zero average loss
/// reads 100, or 50 if it also has zero average gain.
pub fn rsi(closes: &[f64], window: usize, smoothing: RsiSmoothing) -> Result<IndicatorSeries> {
    ensure_window("rsi_window", window)?;
    let n = closes.len();
    let mut out = vec![None; n];
    if n <= window {
        return Ok(out.into());
    }

    // delta[j] belongs to bar j + 1
    let gains: Vec<f64> = closes.windows(2).map(|w| (w[1] - w[0]).max(0.0)).collect();
    let losses: Vec<f64> = closes.windows(2).map(|w| (w[0] - w[1]).max(0.0)).collect();

    match smoothing {
        RsiSmoothing::Simple => {
            for t in window..n {
                let avg_gain = mean(&gains[t - window..t]);
                let avg_loss = mean(&losses[t - window..t]);
                out[t] = Some(rsi_from_averages(avg_gain, avg_loss));
            }
        }
        RsiSmoothing::Wilder => {
            let period = window as f64;
            let mut avg_gain = mean(&gains[..window]);
            let mut avg_loss = mean(&losses[..window]);
            out[window] = Some(rsi_from_averages(avg_gain, avg_loss));
            for t in window + 1..n {
                avg_gain = avg_gain.mul_add(period - 1.0, gains[t - 1]) / period;
                avg_loss = avg_loss.mul_add(period - 1.0, losses[t - 1]) / period;
                out[t] = Some(rsi_from_averages(avg_gain, avg_loss));
            }
        }
    }

    Ok(out.into())
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { RSI_NEUTRAL } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// MACD line, signal line and histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    /// EMA(fast) - EMA(slow).
    pub line: IndicatorSeries,
    /// EMA of the MACD line.
    pub signal: IndicatorSeries,
    /// MACD line - signal line.
    pub histogram: IndicatorSeries,
}

/// Moving Average Convergence Divergence.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Result<Macd> {
    ensure_window("macd_fast", fast)?;
    ensure_window("macd_slow", slow)?;
    ensure_window("macd_signal", signal)?;
    if fast >= slow {
        return Err(AnalyticsError::invalid_parameter(
            "macd_fast",
            format!("fast span {fast} must be shorter than slow span {slow}"),
        ));
    }

    let fast_ema = ema(closes, fast)?;
    let slow_ema = ema(closes, slow)?;
    let line = fast_ema.zip_with(&slow_ema, |f, s| f - s);
    let signal_line = ema_series(&line, signal)?;
    let histogram = line.zip_with(&signal_line, |m, s| m - s);

    Ok(Macd {
        line,
        signal: signal_line,
        histogram,
    })
}
