//! Rule-based signal scoring.
//!
//! Each rule reads the latest indicator values and contributes a signed
//! weight. The sum maps to a [`Recommendation`]:
//!
//! | Score | Recommendation |
//! |-------|----------------|
//! | `>= 3` | `STRONG_BUY` |
//! | `[1, 3)` | `BUY` |
//! | `(-1, 1)` | `NEUTRAL` |
//! | `(-3, -1]` | `SELL` |
//! | `<= -3` | `STRONG_SELL` |

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::mode::AnalysisMode;
use crate::error::{AnalyticsError, Result};
use crate::indicators::IndicatorSnapshot;

/// Score at or above which the recommendation is `STRONG_BUY`.
pub const STRONG_THRESHOLD: f64 = 3.0;

/// Score at or above which the recommendation is at least `BUY`.
pub const THRESHOLD: f64 = 1.0;

/// Scoring rule identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rule {
    /// RSI below the oversold threshold.
    RsiOversold,
    /// RSI above the overbought threshold.
    RsiOverbought,
    /// MACD line relative to its signal line.
    MacdMomentum,
    /// Close relative to the short SMA.
    ShortTrend,
    /// Golden/death cross of the trend SMAs.
    MaCross,
    /// RSI beyond the long-horizon thresholds.
    RsiExtended,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RsiOversold => write!(f, "RSI_OVERSOLD"),
            Self::RsiOverbought => write!(f, "RSI_OVERBOUGHT"),
            Self::MacdMomentum => write!(f, "MACD_MOMENTUM"),
            Self::ShortTrend => write!(f, "SHORT_TREND"),
            Self::MaCross => write!(f, "MA_CROSS"),
            Self::RsiExtended => write!(f, "RSI_EXTENDED"),
        }
    }
}

/// Which way a rule points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Supports buying.
    Bullish,
    /// Supports selling.
    Bearish,
}

/// One fired rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Rule that fired.
    pub rule: Rule,
    /// Direction of the rule.
    pub direction: Direction,
    /// Signed contribution to the score.
    pub weight: f64,
    /// Human-readable explanation.
    pub message: String,
}

/// Discrete recommendation label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    /// Score >= 3.
    StrongBuy,
    /// 1 <= score < 3.
    Buy,
    /// -1 < score < 1.
    Neutral,
    /// -3 < score <= -1.
    Sell,
    /// Score <= -3.
    StrongSell,
}

impl Recommendation {
    /// Map a net score to a label.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= STRONG_THRESHOLD {
            Self::StrongBuy
        } else if score >= THRESHOLD {
            Self::Buy
        } else if score > -THRESHOLD {
            Self::Neutral
        } else if score > -STRONG_THRESHOLD {
            Self::Sell
        } else {
            Self::StrongSell
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongBuy => write!(f, "STRONG_BUY"),
            Self::Buy => write!(f, "BUY"),
            Self::Neutral => write!(f, "NEUTRAL"),
            Self::Sell => write!(f, "SELL"),
            Self::StrongSell => write!(f, "STRONG_SELL"),
        }
    }
}

/// Outcome of scoring one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Mode the rules were selected by.
    pub mode: AnalysisMode,
    /// Fired rules in evaluation order.
    pub signals: Vec<Signal>,
    /// Sum of signal weights.
    pub score: f64,
    /// Label for the score.
    pub recommendation: Recommendation,
}

/// Rule thresholds and weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// RSI below this is oversold.
    pub rsi_oversold: f64,
    /// RSI above this is overbought.
    pub rsi_overbought: f64,
    /// Weight of the oversold/overbought rules.
    pub rsi_extreme_weight: f64,
    /// Weight of the MACD momentum rule.
    pub macd_weight: f64,
    /// Weight of the short-trend rule.
    pub trend_weight: f64,
    /// Weight of the moving-average cross rule.
    pub cross_weight: f64,
    /// Investor-mode RSI below this is bullish.
    pub investor_rsi_low: f64,
    /// Investor-mode RSI above this is bearish.
    pub investor_rsi_high: f64,
    /// Weight of the extended RSI rule.
    pub investor_rsi_weight: f64,
    /// Cross medium vs long SMA instead of short vs medium in investor mode.
    pub investor_long_cross: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            rsi_extreme_weight: 3.0,
            macd_weight: 1.0,
            trend_weight: 1.0,
            cross_weight: 2.0,
            investor_rsi_low: 40.0,
            investor_rsi_high: 80.0,
            investor_rsi_weight: 1.0,
            investor_long_cross: false,
        }
    }
}

impl ScoringConfig {
    /// Check thresholds and weights.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if thresholds are outside `[0, 100]` or
    /// unordered, or a weight is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.rsi_oversold)
            || !in_range(self.rsi_overbought)
            || self.rsi_oversold >= self.rsi_overbought
        {
            return Err(AnalyticsError::invalid_parameter(
                "rsi_oversold",
                "thresholds must satisfy 0 <= oversold < overbought <= 100",
            ));
        }
        if !in_range(self.investor_rsi_low)
            || !in_range(self.investor_rsi_high)
            || self.investor_rsi_low >= self.investor_rsi_high
        {
            return Err(AnalyticsError::invalid_parameter(
                "investor_rsi_low",
                "thresholds must satisfy 0 <= low < high <= 100",
            ));
        }
        let weights = [
            ("rsi_extreme_weight", self.rsi_extreme_weight),
            ("macd_weight", self.macd_weight),
            ("trend_weight", self.trend_weight),
            ("cross_weight", self.cross_weight),
            ("investor_rsi_weight", self.investor_rsi_weight),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(AnalyticsError::invalid_parameter(
                    name,
                    format!("{weight} must be finite and non-negative"),
                ));
            }
        }
        Ok(())
    }
}

/// Values the rules of one mode need, all present.
struct Inputs {
    close: f64,
    rsi: f64,
    macd: Option<(f64, f64)>,
    sma_short: Option<f64>,
    cross: Option<(f64, f64)>,
}

/// Parameterized scorer shared by every analysis mode.
#[derive(Debug, Clone, Default)]
pub struct SignalScorer {
    config: ScoringConfig,
}

impl SignalScorer {
    /// Create a scorer.
    #[must_use]
    pub const fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Scorer configuration.
    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score the latest indicator values under `mode`.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` if any indicator the mode reads is
    /// undefined, `InvalidInput` if the snapshot holds a non-finite value,
    /// and `InvalidParameter` for an invalid configuration.
    pub fn score(&self, snapshot: &IndicatorSnapshot, mode: AnalysisMode) -> Result<ScoreResult> {
        self.config.validate()?;
        let inputs = self.gather(snapshot, mode)?;
        let cfg = &self.config;
        let mut signals = Vec::new();

        if inputs.rsi < cfg.rsi_oversold {
            signals.push(Signal {
                rule: Rule::RsiOversold,
                direction: Direction::Bullish,
                weight: cfg.rsi_extreme_weight,
                message: format!(
                    "RSI {:.2} below {}: oversold, upside reversal likely",
                    inputs.rsi, cfg.rsi_oversold
                ),
            });
        } else if inputs.rsi > cfg.rsi_overbought {
            signals.push(Signal {
                rule: Rule::RsiOverbought,
                direction: Direction::Bearish,
                weight: -cfg.rsi_extreme_weight,
                message: format!(
                    "RSI {:.2} above {}: overbought, pullback likely",
                    inputs.rsi, cfg.rsi_overbought
                ),
            });
        }

        if let Some((macd, signal)) = inputs.macd {
            signals.push(if macd > signal {
                Signal {
                    rule: Rule::MacdMomentum,
                    direction: Direction::Bullish,
                    weight: cfg.macd_weight,
                    message: format!("MACD {macd:.4} above signal {signal:.4}: momentum rising"),
                }
            } else {
                Signal {
                    rule: Rule::MacdMomentum,
                    direction: Direction::Bearish,
                    weight: -cfg.macd_weight,
                    message: format!("MACD {macd:.4} not above signal {signal:.4}: momentum fading"),
                }
            });
        }

        if let Some(sma) = inputs.sma_short {
            let close = inputs.close;
            signals.push(if close > sma {
                Signal {
                    rule: Rule::ShortTrend,
                    direction: Direction::Bullish,
                    weight: cfg.trend_weight,
                    message: format!("Close {close:.2} above short SMA {sma:.2}: uptrend"),
                }
            } else {
                Signal {
                    rule: Rule::ShortTrend,
                    direction: Direction::Bearish,
                    weight: -cfg.trend_weight,
                    message: format!("Close {close:.2} not above short SMA {sma:.2}: downtrend"),
                }
            });
        }

        if let Some((fast, slow)) = inputs.cross {
            signals.push(if fast > slow {
                Signal {
                    rule: Rule::MaCross,
                    direction: Direction::Bullish,
                    weight: cfg.cross_weight,
                    message: format!("Fast SMA {fast:.2} above slow SMA {slow:.2}: golden cross"),
                }
            } else {
                Signal {
                    rule: Rule::MaCross,
                    direction: Direction::Bearish,
                    weight: -cfg.cross_weight,
                    message: format!("Fast SMA {fast:.2} not above slow SMA {slow:.2}: death cross"),
                }
            });

            if inputs.rsi < cfg.investor_rsi_low {
                signals.push(Signal {
                    rule: Rule::RsiExtended,
                    direction: Direction::Bullish,
                    weight: cfg.investor_rsi_weight,
                    message: format!(
                        "RSI {:.2} below {}: attractive long-term entry",
                        inputs.rsi, cfg.investor_rsi_low
                    ),
                });
            } else if inputs.rsi > cfg.investor_rsi_high {
                signals.push(Signal {
                    rule: Rule::RsiExtended,
                    direction: Direction::Bearish,
                    weight: -cfg.investor_rsi_weight,
                    message: format!(
                        "RSI {:.2} above {}: long-term overextension",
                        inputs.rsi, cfg.investor_rsi_high
                    ),
                });
            }
        }

        let score: f64 = signals.iter().map(|s| s.weight).sum();
        let recommendation = Recommendation::from_score(score);

        debug!(
            %mode,
            score,
            %recommendation,
            rules = signals.len(),
            "Scored indicator snapshot"
        );

        Ok(ScoreResult {
            mode,
            signals,
            score,
            recommendation,
        })
    }

    fn gather(&self, snapshot: &IndicatorSnapshot, mode: AnalysisMode) -> Result<Inputs> {
        let fields = [
            ("close", Some(snapshot.close)),
            ("rsi", snapshot.rsi),
            ("macd", snapshot.macd),
            ("macd_signal", snapshot.macd_signal),
            ("sma_short", snapshot.sma_short),
            ("sma_medium", snapshot.sma_medium),
            ("sma_long", snapshot.sma_long),
        ];
        if let Some((name, value)) = fields
            .iter()
            .find_map(|(name, v)| v.filter(|x| !x.is_finite()).map(|x| (name, x)))
        {
            return Err(AnalyticsError::invalid_input(format!(
                "snapshot {name} is not finite: {value}"
            )));
        }

        let mut missing = Vec::new();
        let mut require = |name: &str, value: Option<f64>| {
            if value.is_none() {
                missing.push(name.to_string());
            }
            value.unwrap_or_default()
        };

        let rsi = require("rsi", snapshot.rsi);
        let (macd, sma_short, cross) = match mode {
            AnalysisMode::Scalper => {
                let m = require("macd", snapshot.macd);
                let s = require("macd_signal", snapshot.macd_signal);
                (Some((m, s)), None, None)
            }
            AnalysisMode::TraderSwing => {
                let m = require("macd", snapshot.macd);
                let s = require("macd_signal", snapshot.macd_signal);
                let sma = require("sma_short", snapshot.sma_short);
                (Some((m, s)), Some(sma), None)
            }
            AnalysisMode::Investor => {
                let pair = if self.config.investor_long_cross {
                    (
                        require("sma_medium", snapshot.sma_medium),
                        require("sma_long", snapshot.sma_long),
                    )
                } else {
                    (
                        require("sma_short", snapshot.sma_short),
                        require("sma_medium", snapshot.sma_medium),
                    )
                };
                (None, None, Some(pair))
            }
        };

        if !missing.is_empty() {
            return Err(AnalyticsError::InsufficientData { mode, missing });
        }

        Ok(Inputs {
            close: snapshot.close,
            rsi,
            macd,
            sma_short,
            cross,
        })
    }
}

/// Score a snapshot with the default rule configuration.
///
/// # Errors
///
/// Returns `InsufficientData` if any indicator the mode reads is undefined.
pub fn score_signals(snapshot: &IndicatorSnapshot, mode: AnalysisMode) -> Result<ScoreResult> {
    SignalScorer::default().score(snapshot, mode)
}
