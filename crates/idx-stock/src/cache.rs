//! Caching layer for price history to reduce vendor calls

use crate::market::PriceHistory;
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key for price history requests
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Vendor symbol (e.g. `BBCA.JK`)
    pub symbol: String,
    /// History range (e.g. `6mo`)
    pub range: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(symbol: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            range: range.into(),
        }
    }
}

/// Thread-safe, time-bounded cache of price histories
pub struct HistoryCache {
    cache: Arc<RwLock<TimedCache<CacheKey, PriceHistory>>>,
}

impl HistoryCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<PriceHistory> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: CacheKey, value: PriceHistory) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// Only successful fetches are stored.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: CacheKey, fetcher: F) -> Result<PriceHistory, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<PriceHistory, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return Ok(value);
        }

        tracing::debug!("Cache miss for key: {:?}", key);

        let value = fetcher().await?;
        self.insert(key, value.clone()).await;

        Ok(value)
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Clone for HistoryCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::bar;

    fn history(symbol: &str) -> PriceHistory {
        PriceHistory::new(symbol, vec![bar(1, 100.0, 1), bar(2, 110.0, 2)])
    }

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = HistoryCache::new(Duration::from_secs(60));
        let key = CacheKey::new("BBCA.JK", "6mo");

        cache.insert(key.clone(), history("BBCA.JK")).await;

        assert_eq!(cache.get(&key).await, Some(history("BBCA.JK")));
        assert!(cache.get(&CacheKey::new("BBCA.JK", "1y")).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_get_or_fetch() {
        let cache = HistoryCache::new(Duration::from_secs(60));
        let key = CacheKey::new("BBCA.JK", "6mo");

        let mut call_count = 0;
        let result = cache
            .get_or_fetch(key.clone(), || {
                call_count += 1;
                async { Ok::<_, String>(history("BBCA.JK")) }
            })
            .await
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(call_count, 1);

        // Second call should use cache
        let result = cache
            .get_or_fetch(key.clone(), || {
                call_count += 1;
                async { Ok::<_, String>(PriceHistory::empty("BBCA.JK")) }
            })
            .await
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(call_count, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache = HistoryCache::new(Duration::from_secs(60));
        let key = CacheKey::new("BBCA.JK", "6mo");

        let result = cache
            .get_or_fetch(key.clone(), || async { Err::<PriceHistory, _>("down") })
            .await;
        assert!(result.is_err());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_cache_clear() {
        let cache = HistoryCache::new(Duration::from_secs(60));

        for symbol in ["BBCA.JK", "BBRI.JK", "TLKM.JK"] {
            cache.insert(CacheKey::new(symbol, "6mo"), history(symbol)).await;
        }
        assert_eq!(cache.len().await, 3);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
