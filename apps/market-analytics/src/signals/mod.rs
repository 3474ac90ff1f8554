//! Signal scoring: indicator snapshot + analysis mode → recommendation.

mod mode;
mod scorer;

pub use mode::{AnalysisMode, Interval};
pub use scorer::{
    Direction, Recommendation, Rule, STRONG_THRESHOLD, ScoreResult, ScoringConfig, Signal,
    SignalScorer, THRESHOLD, score_signals,
};
