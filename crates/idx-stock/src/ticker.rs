//! IDX ticker normalization

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Yahoo Finance suffix for the Indonesia Stock Exchange
pub const IDX_SUFFIX: &str = ".JK";

/// Ticker shown when nothing else is selected
pub const DEFAULT_TICKER: &str = "BBCA";

/// An IDX ticker in both of its spellings
///
/// `code` is what users type and what the analyst prompt names (`BBCA`);
/// `symbol` is what the market data vendor expects (`BBCA.JK`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker {
    code: String,
    symbol: String,
}

impl Ticker {
    /// Parse user input: trimmed, upper-cased, `.JK` appended when missing
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_uppercase();

        let code = normalized
            .strip_suffix(IDX_SUFFIX)
            .unwrap_or(normalized.as_str())
            .trim()
            .to_string();

        if code.is_empty() || code.chars().any(char::is_whitespace) {
            return Err(StockError::InvalidSymbol(input.to_string()));
        }

        let symbol = format!("{code}{IDX_SUFFIX}");
        Ok(Self { code, symbol })
    }

    /// Exchange code without suffix (e.g. `BBCA`)
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Vendor symbol with suffix (e.g. `BBCA.JK`)
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self {
            code: DEFAULT_TICKER.to_string(),
            symbol: format!("{DEFAULT_TICKER}{IDX_SUFFIX}"),
        }
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl std::str::FromStr for Ticker {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
