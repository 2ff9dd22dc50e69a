//! Price history types and the market data seam
//!
//! The dashboard treats the data vendor as a black box: give it an exchange
//! symbol and a range, get back daily bars. [`MarketService`] adds ticker
//! normalization and caching on top.

mod service;
mod snapshot;

pub use service::MarketService;
pub use snapshot::PriceSnapshot;

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Time-ordered daily bars for one symbol, oldest first
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
}

impl PriceHistory {
    /// Build a history, sorting bars by date
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|bar| bar.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    /// History with no bars, used when the vendor fails
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Most recent bar
    pub fn latest(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Last `n` bars, newest first
    pub fn recent(&self, n: usize) -> Vec<&PriceBar> {
        self.bars.iter().rev().take(n).collect()
    }

    /// Price summary for the latest session
    pub fn snapshot(&self) -> PriceSnapshot {
        PriceSnapshot::from_history(self)
    }
}

/// Source of daily price bars
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch daily bars for a vendor symbol over a named range
    async fn history(&self, symbol: &str, range: &str) -> Result<Vec<PriceBar>>;

    /// Source name for logging
    fn name(&self) -> &str;
}

#[cfg(test)]
pub(crate) fn bar(day: u32, close: f64, volume: u64) -> PriceBar {
    PriceBar {
        date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap_or_default(),
        open: close,
        high: close,
        low: close,
        close,
        volume,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_sorted() {
        let history = PriceHistory::new("BBCA.JK", vec![bar(3, 3.0, 0), bar(1, 1.0, 0), bar(2, 2.0, 0)]);
        let closes: Vec<f64> = history.bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
        assert_eq!(history.latest().map(|b| b.close), Some(3.0));
    }

    #[test]
    fn test_recent_is_newest_first() {
        let history = PriceHistory::new("BBCA.JK", (1..=12).map(|d| bar(d, f64::from(d), 0)).collect());
        let recent = history.recent(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].close, 12.0);
        assert_eq!(recent[9].close, 3.0);
    }

    #[test]
    fn test_empty() {
        let history = PriceHistory::empty("XXXX.JK");
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert!(history.recent(5).is_empty());
    }
}
