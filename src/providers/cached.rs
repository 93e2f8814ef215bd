//! Caching decorator that lets views share fetched data

use crate::{
    error::ProviderError,
    provider::MarketDataSource,
    types::{GlobalStats, MarketSnapshot, MarketsQuery, TrendingEntry},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

/// A cached value and when it was stored
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// Type alias for one cache slot (optionally holds a value)
///
/// The slot's mutex is held across the inner fetch, so concurrent callers
/// asking for the same key wait for the first fetch instead of issuing their own.
type Slot<T> = Arc<Mutex<Option<CacheEntry<T>>>>;

/// Caches another source's successful responses for a fixed TTL
///
/// Failures are never cached; the next caller retries the inner source.
pub struct CachingSource {
    inner: Arc<dyn MarketDataSource>,
    ttl: Duration,
    markets: RwLock<HashMap<MarketsQuery, Slot<MarketSnapshot>>>,
    global: Slot<GlobalStats>,
    trending: Slot<Vec<TrendingEntry>>,
}

impl CachingSource {
    /// Wraps `inner`, keeping responses for `ttl`
    pub fn new(inner: Arc<dyn MarketDataSource>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            markets: RwLock::new(HashMap::new()),
            global: Arc::new(Mutex::new(None)),
            trending: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the slot for a listing query, creating it on first use
    async fn markets_slot(&self, query: &MarketsQuery) -> Slot<MarketSnapshot> {
        if let Some(slot) = self.markets.read().await.get(query) {
            return slot.clone();
        }

        let mut markets = self.markets.write().await;
        markets
            .entry(query.clone())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    /// Drops every cached value
    pub async fn clear(&self) {
        self.markets.write().await.clear();
        *self.global.lock().await = None;
        *self.trending.lock().await = None;
    }

    async fn read_through<T, F, Fut>(
        &self,
        slot: &Slot<T>,
        resource: &'static str,
        fetch: F,
    ) -> Result<T, ProviderError>
    where
        T: Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut guard = slot.lock().await;

        if let Some(entry) = guard.as_ref() {
            if entry.is_fresh(self.ttl) {
                tracing::trace!(resource, "Serving cached response");
                return Ok(entry.value.clone());
            }
        }

        let value = fetch().await?;
        *guard = Some(CacheEntry {
            value: value.clone(),
            stored_at: Instant::now(),
        });
        tracing::debug!(
            resource,
            source = self.inner.source_name(),
            ttl_secs = self.ttl.as_secs(),
            "Cached fresh response"
        );

        Ok(value)
    }
}

#[async_trait]
impl MarketDataSource for CachingSource {
    async fn list_markets(&self, query: &MarketsQuery) -> Result<MarketSnapshot, ProviderError> {
        let slot = self.markets_slot(query).await;
        self.read_through(&slot, "markets", || self.inner.list_markets(query)).await
    }

    async fn global_stats(&self) -> Result<GlobalStats, ProviderError> {
        self.read_through(&self.global, "global", || self.inner.global_stats()).await
    }

    async fn trending(&self) -> Result<Vec<TrendingEntry>, ProviderError> {
        self.read_through(&self.trending, "trending", || self.inner.trending()).await
    }

    fn source_name(&self) -> &'static str {
        self.inner.source_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::{entry, MockSource};

    fn mock_with_entries() -> Arc<MockSource> {
        let mock = Arc::new(MockSource::new());
        mock.set_entries(vec![entry("alpha", 1, 10.0, 1.0), entry("beta", 2, 5.0, -1.0)]);
        mock
    }

    #[tokio::test]
    async fn test_repeated_reads_hit_cache() {
        let mock = mock_with_entries();
        let cache = CachingSource::new(mock.clone(), Duration::from_secs(60));
        let query = MarketsQuery::top("usd", 10);

        let first = cache.list_markets(&query).await.unwrap();
        let second = cache.list_markets(&query).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_distinct_queries_are_cached_separately() {
        let mock = mock_with_entries();
        let cache = CachingSource::new(mock.clone(), Duration::from_secs(60));

        cache.list_markets(&MarketsQuery::top("usd", 10)).await.unwrap();
        cache.list_markets(&MarketsQuery::top("usd", 1)).await.unwrap();
        cache.global_stats().await.unwrap();
        cache.trending().await.unwrap();

        assert_eq!(mock.call_count(), 4);
    }

    #[tokio::test]
    async fn test_concurrent_identical_requests_coalesce() {
        let mock = Arc::new(MockSource::new().with_delay(Duration::from_millis(50)));
        let cache = CachingSource::new(mock.clone(), Duration::from_secs(60));

        let (a, b, c) = tokio::join!(
            cache.global_stats(),
            cache.global_stats(),
            cache.global_stats()
        );

        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let mock = mock_with_entries();
        let cache = CachingSource::new(mock.clone(), Duration::from_secs(60));

        mock.set_failing(true);
        assert!(cache.trending().await.is_err());

        mock.set_failing(false);
        assert!(cache.trending().await.is_ok());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_expired_entries_refetch() {
        let mock = mock_with_entries();
        let cache = CachingSource::new(mock.clone(), Duration::ZERO);

        cache.global_stats().await.unwrap();
        cache.global_stats().await.unwrap();

        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_clear_drops_values() {
        let mock = mock_with_entries();
        let cache = CachingSource::new(mock.clone(), Duration::from_secs(60));

        cache.trending().await.unwrap();
        cache.clear().await;
        cache.trending().await.unwrap();

        assert_eq!(mock.call_count(), 2);
    }
}
