//! Analysis modes and bar intervals.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// Which rule subset the scorer applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisMode {
    /// Intraday: RSI extremes and MACD momentum.
    Scalper,
    /// Swing trading: adds the short-trend rule.
    TraderSwing,
    /// Long horizon: moving-average cross and extended RSI thresholds.
    Investor,
}

impl AnalysisMode {
    /// Suggested mode for a bar interval.
    ///
    /// Callers choose the mode; this is the mapping the dashboard uses.
    #[must_use]
    pub const fn for_interval(interval: Interval) -> Self {
        match interval {
            Interval::Minute1 | Interval::Minute5 | Interval::Minute15 | Interval::Minute30 => {
                Self::Scalper
            }
            Interval::Hour1 | Interval::Day1 => Self::TraderSwing,
            Interval::Week1 | Interval::Month1 => Self::Investor,
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalper => write!(f, "SCALPER"),
            Self::TraderSwing => write!(f, "TRADER_SWING"),
            Self::Investor => write!(f, "INVESTOR"),
        }
    }
}

impl std::str::FromStr for AnalysisMode {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SCALPER" => Ok(Self::Scalper),
            "TRADER" | "SWING" | "TRADER_SWING" => Ok(Self::TraderSwing),
            "INVESTOR" => Ok(Self::Investor),
            other => Err(AnalyticsError::invalid_parameter(
                "mode",
                format!("unknown analysis mode '{other}'"),
            )),
        }
    }
}

/// Bar granularity requested from the price provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// One-minute bars.
    #[serde(rename = "1m")]
    Minute1,
    /// Five-minute bars.
    #[serde(rename = "5m")]
    Minute5,
    /// Fifteen-minute bars.
    #[serde(rename = "15m")]
    Minute15,
    /// Thirty-minute bars.
    #[serde(rename = "30m")]
    Minute30,
    /// Hourly bars.
    #[serde(rename = "1h")]
    Hour1,
    /// Daily bars.
    #[serde(rename = "1d")]
    Day1,
    /// Weekly bars.
    #[serde(rename = "1wk")]
    Week1,
    /// Monthly bars.
    #[serde(rename = "1mo")]
    Month1,
}

impl Interval {
    /// Provider code for the interval.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Minute1 => "1m",
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Minute30 => "30m",
            Self::Hour1 => "1h",
            Self::Day1 => "1d",
            Self::Week1 => "1wk",
            Self::Month1 => "1mo",
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Interval {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        const ALL: [Interval; 8] = [
            Interval::Minute1,
            Interval::Minute5,
            Interval::Minute15,
            Interval::Minute30,
            Interval::Hour1,
            Interval::Day1,
            Interval::Week1,
            Interval::Month1,
        ];
        let code = s.trim();
        ALL.into_iter().find(|i| i.code() == code).ok_or_else(|| {
            AnalyticsError::invalid_parameter("interval", format!("unknown interval '{code}'"))
        })
    }
}
