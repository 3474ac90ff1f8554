//! Monte Carlo price-path simulation.
//!
//! Projects forward paths with discrete geometric Brownian motion:
//! - Log returns of the close history give drift `mu - sigma^2 / 2` and
//!   volatility `sigma`
//! - Each path starts at the last close and multiplies by
//!   `exp(drift + sigma * z)`, `z ~ N(0, 1)`, per step
//! - Paths are summarized per step into a mean and percentile bands
//!
//! Each path draws from its own `StdRng` seeded from a master seed, so a
//! fixed seed reproduces a run exactly whether paths are generated on one
//! thread or across the rayon pool.

mod config;
mod returns;
mod simulator;
mod stats;

pub use config::{MonteCarloBuilder, SimulationConfig};
pub use returns::{MIN_CLOSES, ReturnStatistics};
pub use simulator::{MonteCarloSimulator, SimulationResult, simulate};
pub use stats::ScenarioSummary;
