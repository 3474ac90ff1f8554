//! Cross-sectional statistics over simulated paths.

use serde::{Deserialize, Serialize};

/// Percentile of sorted values by linear interpolation between order
/// statistics. `p` is in `[0, 100]`; `sorted` must be non-empty.
pub(crate) fn percentile(sorted: &[f64], p: f64) -> f64 {
    let last = sorted.len() - 1;
    let rank = p / 100.0 * last as f64;
    let lo = rank.floor() as usize;
    let hi = (rank.ceil() as usize).min(last);
    let frac = rank - lo as f64;
    (sorted[hi] - sorted[lo]).mul_add(frac, sorted[lo])
}

/// Per-step mean and percentile bands across paths.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Bands {
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Summarize equal-length paths step by step.
pub(crate) fn bands(paths: &[Vec<f64>], lower_pct: f64, upper_pct: f64) -> Bands {
    let Some(len) = paths.first().map(Vec::len) else {
        return Bands::default();
    };
    let mut out = Bands {
        mean: Vec::with_capacity(len),
        lower: Vec::with_capacity(len),
        upper: Vec::with_capacity(len),
    };
    let mut column = Vec::with_capacity(paths.len());

    for t in 0..len {
        column.clear();
        column.extend(paths.iter().map(|p| p[t]));
        column.sort_by(f64::total_cmp);
        out.mean.push(column.iter().sum::<f64>() / column.len() as f64);
        out.lower.push(percentile(&column, lower_pct));
        out.upper.push(percentile(&column, upper_pct));
    }

    out
}

/// Horizon outcomes shown alongside the fan chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    /// Upper percentile at the final step.
    pub best_case: f64,
    /// Mean at the final step.
    pub expected: f64,
    /// Lower percentile at the final step.
    pub worst_case: f64,
    /// Expected change from the starting price, in percent.
    pub expected_change_pct: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let v = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&v, 0.0), 10.0);
        assert_eq!(percentile(&v, 50.0), 30.0);
        assert_eq!(percentile(&v, 100.0), 50.0);
        // rank 0.05 * 4 = 0.2 -> 10 + 0.2 * 10
        assert!((percentile(&v, 5.0) - 12.0).abs() < 1e-12);
        assert!((percentile(&v, 95.0) - 48.0).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_single_value() {
        assert_eq!(percentile(&[7.5], 5.0), 7.5);
        assert_eq!(percentile(&[7.5], 95.0), 7.5);
    }

    #[test]
    fn test_bands_per_step() {
        let paths = vec![vec![1.0, 2.0], vec![1.0, 4.0], vec![1.0, 6.0]];
        let b = bands(&paths, 0.0, 100.0);
        assert_eq!(b.mean, vec![1.0, 4.0]);
        assert_eq!(b.lower, vec![1.0, 2.0]);
        assert_eq!(b.upper, vec![1.0, 6.0]);
    }

    #[test]
    fn test_bands_empty() {
        assert_eq!(bands(&[], 5.0, 95.0), Bands::default());
    }
}
