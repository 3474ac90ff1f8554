//! Geometric Brownian motion path generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::config::SimulationConfig;
use super::returns::ReturnStatistics;
use super::stats::{ScenarioSummary, bands};
use crate::error::{AnalyticsError, Result};

/// Simulated paths and their per-step summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// `paths` sequences of `steps + 1` prices; index 0 is the last close.
    pub paths: Vec<Vec<f64>>,
    /// Mean across paths at each step.
    pub mean_path: Vec<f64>,
    /// Lower percentile across paths at each step.
    pub lower_band: Vec<f64>,
    /// Upper percentile across paths at each step.
    pub upper_band: Vec<f64>,
    /// Percentile of `lower_band`.
    pub lower_percentile: f64,
    /// Percentile of `upper_band`.
    pub upper_percentile: f64,
    /// Per-step drift used.
    pub drift: f64,
    /// Per-step volatility used.
    pub volatility: f64,
    /// Seed that reproduces this run.
    pub seed: u64,
    /// Horizon outcomes.
    pub summary: ScenarioSummary,
}

impl SimulationResult {
    /// Number of projected steps.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.mean_path.len().saturating_sub(1)
    }
}

/// Monte Carlo simulator.
#[derive(Debug, Clone, Default)]
pub struct MonteCarloSimulator {
    config: SimulationConfig,
}

impl MonteCarloSimulator {
    /// Create a new Monte Carlo simulator.
    #[must_use]
    pub const fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Simulator configuration.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulate forward paths from a close history.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientHistory` with fewer than two closes,
    /// `InvalidInput` for non-positive closes, and `InvalidParameter` for an
    /// invalid configuration.
    pub fn run(&self, closes: &[f64]) -> Result<SimulationResult> {
        self.config.validate()?;
        let stats = ReturnStatistics::from_closes(closes)?;
        let start = *closes
            .last()
            .ok_or_else(|| AnalyticsError::invalid_input("no closes to start from"))?;

        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let mut master = StdRng::seed_from_u64(seed);
        let path_seeds: Vec<u64> = (0..self.config.paths).map(|_| master.random()).collect();

        info!(
            paths = self.config.paths,
            steps = self.config.steps,
            history = closes.len(),
            drift = stats.drift,
            volatility = stats.volatility,
            "Running Monte Carlo simulation"
        );

        let steps = self.config.steps;
        let generate = |path_seed: &u64| {
            generate_path(start, stats.drift, stats.volatility, steps, *path_seed)
        };
        let paths: Vec<Vec<f64>> = if path_seeds.len() >= self.config.parallel_threshold {
            path_seeds.par_iter().map(generate).collect()
        } else {
            path_seeds.iter().map(generate).collect()
        };

        let b = bands(
            &paths,
            self.config.lower_percentile,
            self.config.upper_percentile,
        );
        let expected = b.mean[steps];
        let summary = ScenarioSummary {
            best_case: b.upper[steps],
            expected,
            worst_case: b.lower[steps],
            expected_change_pct: (expected - start) / start * 100.0,
        };

        debug!(
            seed,
            best_case = summary.best_case,
            expected = summary.expected,
            worst_case = summary.worst_case,
            "Monte Carlo simulation complete"
        );

        Ok(SimulationResult {
            paths,
            mean_path: b.mean,
            lower_band: b.lower,
            upper_band: b.upper,
            lower_percentile: self.config.lower_percentile,
            upper_percentile: self.config.upper_percentile,
            drift: stats.drift,
            volatility: stats.volatility,
            seed,
            summary,
        })
    }
}

/// One GBM path: `p[t] = p[t-1] * exp(drift + volatility * z)`.
fn generate_path(start: f64, drift: f64, volatility: f64, steps: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut path = Vec::with_capacity(steps + 1);
    let mut price = start;
    path.push(price);
    for _ in 0..steps {
        let z: f64 = rng.sample(StandardNormal);
        price *= volatility.mul_add(z, drift).exp();
        path.push(price);
    }
    path
}

/// Simulate `paths` GBM paths of `steps` steps with a fresh entropy seed.
///
/// # Errors
///
/// See [`MonteCarloSimulator::run`].
pub fn simulate(closes: &[f64], steps: usize, paths: usize) -> Result<SimulationResult> {
    MonteCarloSimulator::new(SimulationConfig {
        steps,
        paths,
        ..SimulationConfig::default()
    })
    .run(closes)
}
