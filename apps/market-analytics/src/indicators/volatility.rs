//! Volatility bands and mean-deviation oscillators.

use serde::{Deserialize, Serialize};

use super::moving_average::sma;
use super::series::{
    IndicatorSeries, ensure_window, mean, mean_abs_deviation, population_std, rolling,
};
use crate::error::{AnalyticsError, Result};

/// Lambert's constant scaling CCI so most readings fall in [-100, 100].
pub const CCI_CONSTANT: f64 = 0.015;

/// Floor applied to a zero mean absolute deviation.
pub const CCI_MAD_EPSILON: f64 = 1e-12;

/// Bollinger Bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    /// Middle + k * sigma.
    pub upper: IndicatorSeries,
    /// SMA of closes.
    pub middle: IndicatorSeries,
    /// Middle - k * sigma.
    pub lower: IndicatorSeries,
}

/// Bollinger Bands using the population standard deviation of each window.
pub fn bollinger_bands(closes: &[f64], window: usize, k: f64) -> Result<BollingerBands> {
    ensure_window("bollinger_window", window)?;
    if !k.is_finite() || k < 0.0 {
        return Err(AnalyticsError::invalid_parameter(
            "bollinger_k",
            format!("{k} must be finite and non-negative"),
        ));
    }

    let middle = sma(closes, window)?;
    let sigma = rolling(closes, window, population_std);

    Ok(BollingerBands {
        upper: middle.zip_with(&sigma, |m, s| k.mul_add(s, m)),
        lower: middle.zip_with(&sigma, |m, s| (-k).mul_add(s, m)),
        middle,
    })
}

/// Commodity Channel Index over typical prices.
///
/// `(tp - SMA(tp)) / (0.015 * MAD(tp))`, with the mean absolute deviation
/// floored at [`CCI_MAD_EPSILON`].
pub fn cci(highs: &[f64], lows: &[f64], closes: &[f64], window: usize) -> Result<IndicatorSeries> {
    ensure_window("cci_window", window)?;
    if highs.len() != closes.len() || lows.len() != closes.len() {
        return Err(AnalyticsError::invalid_input(format!(
            "cci inputs misaligned: {} highs, {} lows, {} closes",
            highs.len(),
            lows.len(),
            closes.len()
        )));
    }

    let typical: Vec<f64> = highs
        .iter()
        .zip(lows)
        .zip(closes)
        .map(|((h, l), c)| (h + l + c) / 3.0)
        .collect();

    Ok(rolling(&typical, window, |w| {
        let m = mean(w);
        let mad = mean_abs_deviation(w, m);
        let current = w[w.len() - 1];
        (current - m) / (CCI_CONSTANT * mad.max(CCI_MAD_EPSILON))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bollinger_constant_collapses() {
        let bands = bollinger_bands(&[42.0; 25], 20, 2.0).unwrap();
        for i in 19..25 {
            assert_eq!(bands.upper.get(i), Some(42.0));
            assert_eq!(bands.middle.get(i), Some(42.0));
            assert_eq!(bands.lower.get(i), Some(42.0));
        }
        assert_eq!(bands.upper.get(18), None);
    }

    #[test]
    fn test_bollinger_constant_decimal_collapses() {
        for price in [101.37, 1234.567, 0.3] {
            let bands = bollinger_bands(&[price; 25], 20, 2.0).unwrap();
            for i in 19..25 {
                assert_eq!(bands.upper.get(i), Some(price));
                assert_eq!(bands.middle.get(i), Some(price));
                assert_eq!(bands.lower.get(i), Some(price));
            }
        }
    }

    #[test]
    fn test_bollinger_width() {
        // window [2, 4, 4, 4, 5, 5, 7, 9]: mean 5, population sigma 2
        let bands = bollinger_bands(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8, 2.0).unwrap();
        assert!((bands.middle.last().unwrap() - 5.0).abs() < 1e-12);
        assert!((bands.upper.last().unwrap() - 9.0).abs() < 1e-12);
        assert!((bands.lower.last().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bollinger_rejects_negative_k() {
        assert!(bollinger_bands(&[1.0; 5], 3, -1.0).is_err());
        assert!(bollinger_bands(&[1.0; 5], 3, f64::NAN).is_err());
    }

    #[test]
    fn test_cci_flat_window_is_zero() {
        let flat = [10.0; 25];
        let out = cci(&flat, &flat, &flat, 20).unwrap();
        assert_eq!(out.last(), Some(0.0));
        assert!(out.values().iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_cci_flat_decimal_window_is_zero() {
        for price in [101.37, 1234.567] {
            let flat = [price; 25];
            let out = cci(&flat, &flat, &flat, 20).unwrap();
            assert!(out.values()[19..].iter().all(|v| *v == Some(0.0)));
        }
    }

    #[test]
    fn test_cci_hand_computed() {
        // tp = close when h = l = c; window [1, 2, 3]: mean 2, mad 2/3
        let v = [1.0, 2.0, 3.0];
        let out = cci(&v, &v, &v, 3).unwrap();
        let expected = (3.0 - 2.0) / (0.015 * (2.0 / 3.0));
        assert!((out.last().unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_cci_misaligned_inputs() {
        assert!(cci(&[1.0, 2.0], &[1.0], &[1.0, 2.0], 1).is_err());
    }
}
