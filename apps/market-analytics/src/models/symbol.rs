//! Instrument identifiers.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// Broad asset class, inferred from the market-data provider's ticker
/// suffix conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetClass {
    /// Listed equity (e.g. `THYAO.IS`, `AAPL`).
    Equity,
    /// Crypto pair quoted in USD (e.g. `BTC-USD`).
    Crypto,
    /// Currency pair or spot metal (e.g. `USDTRY=X`).
    Fx,
    /// Commodity future (e.g. `GC=F`).
    Commodity,
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equity => write!(f, "EQUITY"),
            Self::Crypto => write!(f, "CRYPTO"),
            Self::Fx => write!(f, "FX"),
            Self::Commodity => write!(f, "COMMODITY"),
        }
    }
}

/// Non-empty instrument symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse a symbol, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the symbol is blank.
    pub fn new(value: impl AsRef<str>) -> Result<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AnalyticsError::invalid_input("symbol must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Symbol text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Infer the asset class from the ticker suffix.
    #[must_use]
    pub fn asset_class(&self) -> AssetClass {
        let upper = self.0.to_ascii_uppercase();
        if upper.ends_with("-USD") {
            AssetClass::Crypto
        } else if upper.ends_with("=X") {
            AssetClass::Fx
        } else if upper.ends_with("=F") {
            AssetClass::Commodity
        } else {
            AssetClass::Equity
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = AnalyticsError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_symbol_rejected() {
        assert!(Symbol::new("").is_err());
        assert!(Symbol::new("   ").is_err());
    }

    #[test]
    fn test_symbol_trimmed() {
        assert_eq!(Symbol::new(" BTC-USD ").unwrap().as_str(), "BTC-USD");
    }

    #[test]
    fn test_asset_class_inference() {
        assert_eq!(Symbol::new("THYAO.IS").unwrap().asset_class(), AssetClass::Equity);
        assert_eq!(Symbol::new("eth-usd").unwrap().asset_class(), AssetClass::Crypto);
        assert_eq!(Symbol::new("USDTRY=X").unwrap().asset_class(), AssetClass::Fx);
        assert_eq!(Symbol::new("XAUUSD=X").unwrap().asset_class(), AssetClass::Fx);
        assert_eq!(Symbol::new("CL=F").unwrap().asset_class(), AssetClass::Commodity);
    }
}
