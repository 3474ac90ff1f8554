//! Application layer: the price-history port and the analysis use case.

pub mod analysis;
pub mod ports;

pub use analysis::{AnalysisError, AnalysisReport, AnalysisService, ScoreOutcome};
pub use ports::{HistoryRequest, PriceHistoryProvider, ProviderError};
