//! Configuration for Monte Carlo price-path simulation.

use serde::{Deserialize, Serialize};

use super::simulator::MonteCarloSimulator;
use crate::error::{AnalyticsError, Result};

/// Configuration for Monte Carlo simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Projected steps per path (each path has `steps + 1` points).
    pub steps: usize,
    /// Number of independent paths.
    pub paths: usize,
    /// Seed for reproducibility (None = OS entropy).
    pub seed: Option<u64>,
    /// Lower percentile band (e.g. 5.0).
    pub lower_percentile: f64,
    /// Upper percentile band (e.g. 95.0).
    pub upper_percentile: f64,
    /// Minimum path count before generation runs on the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: 30,
            paths: 50,
            seed: None,
            lower_percentile: 5.0,
            upper_percentile: 95.0,
            parallel_threshold: 64,
        }
    }
}

impl SimulationConfig {
    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for zero steps or paths, or percentiles
    /// outside `[0, 100]` or out of order.
    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            return Err(AnalyticsError::invalid_parameter("steps", "must be at least 1"));
        }
        if self.paths == 0 {
            return Err(AnalyticsError::invalid_parameter("paths", "must be at least 1"));
        }
        let in_range = |p: f64| (0.0..=100.0).contains(&p);
        if !in_range(self.lower_percentile)
            || !in_range(self.upper_percentile)
            || self.lower_percentile > self.upper_percentile
        {
            return Err(AnalyticsError::invalid_parameter(
                "lower_percentile",
                format!(
                    "percentiles must satisfy 0 <= lower <= upper <= 100, got {} and {}",
                    self.lower_percentile, self.upper_percentile
                ),
            ));
        }
        Ok(())
    }
}

/// Builder for Monte Carlo simulation.
#[derive(Debug, Default)]
pub struct MonteCarloBuilder {
    config: SimulationConfig,
}

impl MonteCarloBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set number of projected steps.
    #[must_use]
    pub const fn steps(mut self, n: usize) -> Self {
        self.config.steps = n;
        self
    }

    /// Set number of paths.
    #[must_use]
    pub const fn paths(mut self, n: usize) -> Self {
        self.config.paths = n;
        self
    }

    /// Set random seed for reproducibility.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the percentile bands.
    #[must_use]
    pub const fn percentiles(mut self, lower: f64, upper: f64) -> Self {
        self.config.lower_percentile = lower;
        self.config.upper_percentile = upper;
        self
    }

    /// Set the parallel generation threshold.
    #[must_use]
    pub const fn parallel_threshold(mut self, n: usize) -> Self {
        self.config.parallel_threshold = n;
        self
    }

    /// Build the simulator.
    #[must_use]
    pub fn build(self) -> MonteCarloSimulator {
        MonteCarloSimulator::new(self.config)
    }
}
