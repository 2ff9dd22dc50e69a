//! Yahoo Finance API client

use crate::error::{Result, StockError};
use crate::market::{MarketDataSource, PriceBar};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use time::OffsetDateTime;
use tracing::debug;
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
#[derive(Debug, Clone, Copy, Default)]
pub struct YahooFinanceClient;

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self
    }

    /// Get daily bars for a symbol between two instants
    pub async fn get_daily_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceBar>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| StockError::YahooFinanceError(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| StockError::YahooFinanceError(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let bars: Vec<PriceBar> = quotes
            .iter()
            .filter_map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
                Some(PriceBar {
                    date,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .collect();

        debug!(symbol, bars = bars.len(), "Fetched daily bars");
        Ok(bars)
    }

    /// Get daily bars over a named range ending now
    pub async fn get_historical_range(
        &self,
        symbol: &str,
        range: &str, // e.g., "1mo", "6mo", "1y"
    ) -> Result<Vec<PriceBar>> {
        let end = Utc::now();
        let start = range_start(range, end)?;
        self.get_daily_bars(symbol, start, end).await
    }
}

/// Start instant for a named range
fn range_start(range: &str, end: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let start = match range {
        "1mo" => end - chrono::Duration::days(30),
        "3mo" => end - chrono::Duration::days(90),
        "6mo" => end - chrono::Duration::days(180),
        "1y" => end - chrono::Duration::days(365),
        "2y" => end - chrono::Duration::days(730),
        "5y" => end - chrono::Duration::days(1825),
        "10y" => end - chrono::Duration::days(3650),
        "ytd" => chrono::NaiveDate::from_ymd_opt(end.year(), 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|datetime| datetime.and_utc())
            .ok_or_else(|| StockError::ConfigError("Invalid year start".to_string()))?,
        "max" => end - chrono::Duration::days(36500), // ~100 years
        _ => return Err(StockError::ConfigError(format!("Invalid range: {range}"))),
    };
    Ok(start)
}

#[async_trait]
impl MarketDataSource for YahooFinanceClient {
    async fn history(&self, symbol: &str, range: &str) -> Result<Vec<PriceBar>> {
        self.get_historical_range(symbol, range).await
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}
