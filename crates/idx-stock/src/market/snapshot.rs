//! Latest-session price summary

use super::PriceHistory;
use serde::{Deserialize, Serialize};

/// Summary of the latest trading day against the previous one
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceSnapshot {
    /// Latest close
    pub price: f64,
    /// Latest close minus previous close
    pub change_value: f64,
    /// Change relative to previous close, in percent
    pub change_percent: f64,
    /// Latest session volume
    pub volume: u64,
}

impl PriceSnapshot {
    /// Summarize a history; all zeros when fewer than two bars exist
    pub fn from_history(history: &PriceHistory) -> Self {
        let [.., previous, latest] = history.bars.as_slice() else {
            return Self::default();
        };

        let change_value = latest.close - previous.close;
        let change_percent = if previous.close == 0.0 {
            0.0
        } else {
            change_value / previous.close * 100.0
        };

        Self {
            price: latest.close,
            change_value,
            change_percent,
            volume: latest.volume,
        }
    }

    /// Whether the snapshot carries a real price
    pub fn is_available(&self) -> bool {
        self.price > 0.0
    }
}
