//! Error handling for the analytics core.
//!
//! Every failure the core can report is local and recoverable by the caller.
//! Errors carry a stable [`ErrorCode`] so front ends can map them to
//! user-facing messages without matching on display strings.
//!
//! | Code | Usage |
//! |------|-------|
//! | `INVALID_INPUT` | Malformed bar, unordered series, empty series |
//! | `INSUFFICIENT_HISTORY` | Not enough closes for a statistic that cannot degrade |
//! | `INSUFFICIENT_DATA` | Latest indicator values undefined for the requested mode |
//! | `INVALID_PARAMETER` | Window, span, step count or percentile out of range |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::signals::AnalysisMode;

/// Error codes for the analytics core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed or empty input series.
    InvalidInput,
    /// Fewer observations than the computation requires.
    InsufficientHistory,
    /// Required indicator values are undefined.
    InsufficientData,
    /// Invalid computation parameter.
    InvalidParameter,
}

impl ErrorCode {
    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::InsufficientHistory => "INSUFFICIENT_HISTORY",
            Self::InsufficientData => "INSUFFICIENT_DATA",
            Self::InvalidParameter => "INVALID_PARAMETER",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Errors reported by indicator computation, scoring and simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// Input series or bar violates the data model.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// Not enough observations.
    #[error("Insufficient history: {required} observations required, {available} available")]
    InsufficientHistory {
        /// Minimum number of observations needed.
        required: usize,
        /// Number of observations supplied.
        available: usize,
    },

    /// Indicators needed by the scoring mode are undefined on the latest bar.
    #[error("Insufficient data for {mode} scoring: missing {}", missing.join(", "))]
    InsufficientData {
        /// Mode that was requested.
        mode: AnalysisMode,
        /// Names of the undefined indicators.
        missing: Vec<String>,
    },

    /// Parameter out of its valid range.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Constraint that was violated.
        reason: String,
    },
}

impl AnalyticsError {
    /// Create an invalid input error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { .. } => ErrorCode::InvalidInput,
            Self::InsufficientHistory { .. } => ErrorCode::InsufficientHistory,
            Self::InsufficientData { .. } => ErrorCode::InsufficientData,
            Self::InvalidParameter { .. } => ErrorCode::InvalidParameter,
        }
    }
}

/// Result alias for the analytics core.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AnalyticsError::invalid_input("empty").code(),
            ErrorCode::InvalidInput
        );
        assert_eq!(
            AnalyticsError::InsufficientHistory {
                required: 2,
                available: 1
            }
            .code()
            .reason(),
            "INSUFFICIENT_HISTORY"
        );
        assert_eq!(
            AnalyticsError::invalid_parameter("window", "must be positive").code(),
            ErrorCode::InvalidParameter
        );
    }

    #[test]
    fn test_insufficient_data_message_lists_missing() {
        let err = AnalyticsError::InsufficientData {
            mode: AnalysisMode::Investor,
            missing: vec!["sma_50".to_string(), "rsi".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("INVESTOR"));
        assert!(msg.contains("sma_50, rsi"));
    }

    #[test]
    fn test_error_code_serde() {
        let json = serde_json::to_string(&ErrorCode::InsufficientData).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_DATA\"");
    }
}
