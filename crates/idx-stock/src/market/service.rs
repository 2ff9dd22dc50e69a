//! Cached, ticker-aware access to price history

use super::{MarketDataSource, PriceHistory};
use crate::cache::{CacheKey, HistoryCache};
use crate::ticker::Ticker;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

/// Price history front door for the dashboard
///
/// Results are cached per symbol. Selecting a different ticker than the
/// previous call drops the whole cache, so only one ticker's data is ever
/// held at a time.
pub struct MarketService {
    source: Arc<dyn MarketDataSource>,
    cache: HistoryCache,
    range: String,
    selected: Mutex<Option<String>>,
}

impl MarketService {
    /// Create a service over a data source
    pub fn new(source: Arc<dyn MarketDataSource>, range: impl Into<String>, ttl: Duration) -> Self {
        Self {
            source,
            cache: HistoryCache::new(ttl),
            range: range.into(),
            selected: Mutex::new(None),
        }
    }

    /// History window requested from the source
    pub fn range(&self) -> &str {
        &self.range
    }

    /// Price history for a ticker; empty when the source fails
    #[instrument(skip(self), fields(symbol = %ticker.symbol(), source = self.source.name()))]
    pub async fn history(&self, ticker: &Ticker) -> PriceHistory {
        self.select(ticker).await;

        let symbol = ticker.symbol();
        let key = CacheKey::new(symbol, &self.range);
        let result = self
            .cache
            .get_or_fetch(key, || async {
                let bars = self.source.history(symbol, &self.range).await?;
                Ok::<_, crate::error::StockError>(PriceHistory::new(symbol, bars))
            })
            .await;

        match result {
            Ok(history) => history,
            Err(e) => {
                error!("Failed to fetch price history: {e}");
                PriceHistory::empty(symbol)
            }
        }
    }

    /// Drop every cached history
    pub async fn refresh(&self) {
        self.cache.clear().await;
        info!("Price history cache cleared");
    }

    /// Track the selected ticker, clearing the cache when it changes
    async fn select(&self, ticker: &Ticker) {
        let mut selected = self.selected.lock().await;
        if selected.as_deref() != Some(ticker.symbol()) {
            if selected.is_some() {
                self.cache.clear().await;
                info!(symbol = ticker.symbol(), "Ticker changed, cache cleared");
            }
            *selected = Some(ticker.symbol().to_string());
        }
    }
}
