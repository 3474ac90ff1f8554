//! Property Tests
//!
//! Invariants that must hold for any valid price history.

// Allow unwrap in tests - tests should panic on unexpected errors
#![allow(clippy::unwrap_used, clippy::float_cmp)]

use chrono::{Duration, TimeZone, Utc};
use market_analytics::indicators::{
    Indicator, RsiSmoothing, bollinger_bands, cci, crossovers, ema, macd, rsi, sma,
};
use market_analytics::{
    Bar, IndicatorConfig, MonteCarloBuilder, PriceSeries, Symbol, compute_indicators,
};
use proptest::prelude::*;

fn closes_strategy(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..1_000.0, 0..max_len)
}

fn series_from(closes: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            Bar::new(start + Duration::hours(i as i64), c, c * 1.02, c * 0.98, c, 10.0).unwrap()
        })
        .collect();
    PriceSeries::new(Symbol::new("PROP").unwrap(), bars).unwrap()
}

proptest! {
    #[test]
    fn histogram_is_line_minus_signal(closes in closes_strategy(120)) {
        let m = macd(&closes, 12, 26, 9).unwrap();
        prop_assert_eq!(m.histogram.len(), closes.len());
        for t in 0..closes.len() {
            match (m.line.get(t), m.signal.get(t), m.histogram.get(t)) {
                (Some(line), Some(signal), Some(hist)) => prop_assert_eq!(hist, line - signal),
                (_, _, hist) => prop_assert!(hist.is_none()),
            }
        }
    }

    #[test]
    fn rsi_bounded(closes in closes_strategy(150), window in 1usize..30, wilder in any::<bool>()) {
        let smoothing = if wilder { RsiSmoothing::Wilder } else { RsiSmoothing::Simple };
        let values = rsi(&closes, window, smoothing).unwrap();
        prop_assert_eq!(values.len(), closes.len());
        for (t, v) in values.values().iter().enumerate() {
            if t < window {
                prop_assert!(v.is_none());
            } else {
                let v = v.unwrap();
                prop_assert!((0.0..=100.0).contains(&v), "rsi {} at {}", v, t);
            }
        }
    }

    #[test]
    fn sma_defined_from_window(closes in closes_strategy(80), window in 1usize..40) {
        let values = sma(&closes, window).unwrap();
        prop_assert_eq!(values.len(), closes.len());
        prop_assert_eq!(values.defined_count(), (closes.len() + 1).saturating_sub(window));
    }

    #[test]
    fn ema_stays_within_range(closes in closes_strategy(80), span in 1usize..40) {
        let values = ema(&closes, span).unwrap();
        let lo = closes.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for v in values.values().iter().flatten() {
            prop_assert!(*v >= lo - 1e-9 && *v <= hi + 1e-9);
        }
    }

    #[test]
    fn bollinger_ordered(closes in closes_strategy(80), window in 1usize..30, k in 0.0f64..4.0) {
        let bands = bollinger_bands(&closes, window, k).unwrap();
        for t in 0..closes.len() {
            if let (Some(u), Some(m), Some(l)) = (bands.upper.get(t), bands.middle.get(t), bands.lower.get(t)) {
                prop_assert!(u >= m && m >= l);
            }
        }
    }

    #[test]
    fn constant_prices_collapse_bands(price in 0.01f64..100_000.0, len in 20usize..60) {
        let flat = vec![price; len];
        let bands = bollinger_bands(&flat, 20, 2.0).unwrap();
        let oscillator = cci(&flat, &flat, &flat, 20).unwrap();
        for t in 19..len {
            prop_assert_eq!(bands.upper.get(t), Some(price));
            prop_assert_eq!(bands.middle.get(t), Some(price));
            prop_assert_eq!(bands.lower.get(t), Some(price));
            prop_assert_eq!(oscillator.get(t), Some(0.0));
        }
    }

    #[test]
    fn indicator_set_aligned(closes in prop::collection::vec(1.0f64..1_000.0, 1..260)) {
        let series = series_from(&closes);
        let set = compute_indicators(&series, &IndicatorConfig::default()).unwrap();
        prop_assert_eq!(set.len(), closes.len());
        for (_, values) in set.iter() {
            prop_assert_eq!(values.len(), closes.len());
        }
        prop_assert!(set.get(Indicator::Sma(200)).is_some());
    }

    #[test]
    fn crossovers_alternate(closes in closes_strategy(150)) {
        let fast = sma(&closes, 5).unwrap();
        let slow = sma(&closes, 20).unwrap();
        let events = crossovers(&fast, &slow);
        for pair in events.windows(2) {
            prop_assert!(pair[0].index < pair[1].index);
            prop_assert_ne!(pair[0].direction, pair[1].direction);
        }
    }

    #[test]
    fn simulated_paths_shape(
        closes in prop::collection::vec(50.0f64..150.0, 2..60),
        steps in 1usize..40,
        paths in 1usize..40,
        seed in any::<u64>(),
    ) {
        let result = MonteCarloBuilder::new()
            .steps(steps)
            .paths(paths)
            .seed(seed)
            .build()
            .run(&closes)
            .unwrap();
        let last = *closes.last().unwrap();
        prop_assert_eq!(result.paths.len(), paths);
        for path in &result.paths {
            prop_assert_eq!(path.len(), steps + 1);
            prop_assert_eq!(path[0], last);
            prop_assert!(path.iter().all(|p| p.is_finite() && *p > 0.0));
        }
        for t in 0..=steps {
            prop_assert!(result.lower_band[t] <= result.upper_band[t]);
        }
    }
}
