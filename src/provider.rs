//! Data-access capability the dashboard views read through

use crate::{
    error::ProviderError,
    types::{GlobalStats, MarketSnapshot, MarketsQuery, TrendingEntry},
};
use async_trait::async_trait;

/// Trait for market data sources
///
/// Implementations read from a remote API (CoinGecko), from the built-in
/// fallback datasets, or decorate another source (caching). Views hold an
/// `Arc<dyn MarketDataSource>` and never know which one they were given.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetches one page of the market listing
    ///
    /// # Arguments
    /// * `query` - Currency, ordering and paging of the listing
    ///
    /// # Returns
    /// The snapshot in provider order, or an error if the fetch fails
    async fn list_markets(&self, query: &MarketsQuery) -> Result<MarketSnapshot, ProviderError>;

    /// Fetches aggregate market totals and dominance
    async fn global_stats(&self) -> Result<GlobalStats, ProviderError>;

    /// Fetches the trending coins list
    async fn trending(&self) -> Result<Vec<TrendingEntry>, ProviderError>;

    /// Returns the name of this source
    fn source_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::types::MarketEntry;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Mock source for testing
    ///
    /// Serves fixed data, or fails every call once `set_failing` is on.
    pub struct MockSource {
        entries: Arc<Mutex<Vec<MarketEntry>>>,
        failing: Arc<Mutex<bool>>,
        delay: Option<Duration>,
        call_count: Arc<Mutex<usize>>,
    }

    impl Default for MockSource {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockSource {
        pub fn new() -> Self {
            Self {
                entries: Arc::new(Mutex::new(Vec::new())),
                failing: Arc::new(Mutex::new(false)),
                delay: None,
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn set_entries(&self, entries: Vec<MarketEntry>) {
            *self.entries.lock().unwrap() = entries;
        }

        pub fn set_failing(&self, failing: bool) {
            *self.failing.lock().unwrap() = failing;
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }

        async fn begin_call(&self) -> Result<(), ProviderError> {
            *self.call_count.lock().unwrap() += 1;
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if *self.failing.lock().unwrap() {
                return Err(ProviderError::ApiError("HTTP 503: mock outage".to_string()));
            }
            Ok(())
        }
    }

    /// Builds a market entry with derived cap and volume
    pub fn entry(id: &str, rank: u32, price: f64, change: f64) -> MarketEntry {
        MarketEntry {
            id: id.to_string(),
            symbol: id.chars().take(3).collect(),
            name: id.to_string(),
            image: format!("https://img.test/{}.png", id),
            current_price: price,
            market_cap: price * 1_000_000.0,
            market_cap_rank: rank,
            price_change_percentage_24h: change,
            total_volume: price * 10_000.0,
        }
    }

    #[async_trait]
    impl MarketDataSource for MockSource {
        async fn list_markets(
            &self,
            query: &MarketsQuery,
        ) -> Result<MarketSnapshot, ProviderError> {
            self.begin_call().await?;
            let entries = self.entries.lock().unwrap().clone();
            MarketSnapshot::new(entries.into_iter().take(query.per_page as usize).collect())
        }

        async fn global_stats(&self) -> Result<GlobalStats, ProviderError> {
            self.begin_call().await?;
            Ok(GlobalStats {
                total_market_cap: 2.5e12,
                total_volume: 9.1e10,
                dominance: vec![
                    crate::types::Dominance {
                        symbol: "btc".to_string(),
                        percentage: 55.0,
                    },
                    crate::types::Dominance {
                        symbol: "eth".to_string(),
                        percentage: 15.5,
                    },
                ],
                market_cap_change_percentage_24h: -1.25,
            })
        }

        async fn trending(&self) -> Result<Vec<TrendingEntry>, ProviderError> {
            self.begin_call().await?;
            Ok(vec![TrendingEntry {
                id: "mock-coin".to_string(),
                name: "Mock Coin".to_string(),
                symbol: "MOCK".to_string(),
                thumb: String::new(),
                market_cap_rank: None,
                price_btc: 0.000_001,
            }])
        }

        fn source_name(&self) -> &'static str {
            "mock"
        }
    }
}
