//! CoinGecko market data source

use crate::{
    constants::{
        COINGECKO_API_URL, COINGECKO_GLOBAL_ENDPOINT, COINGECKO_MARKETS_ENDPOINT,
        COINGECKO_TRENDING_ENDPOINT, DEFAULT_VS_CURRENCY, REQUEST_TIMEOUT_SECS, USER_AGENT,
    },
    error::ProviderError,
    provider::MarketDataSource,
    types::{Dominance, GlobalStats, MarketEntry, MarketSnapshot, MarketsQuery, TrendingEntry},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Reference assets whose dominance is reported, in display order
const DOMINANCE_ASSETS: [&str; 2] = ["btc", "eth"];

/// One element of the `/coins/markets` response
///
/// CoinGecko sends `null` for most numeric fields on thinly traded coins.
#[derive(Debug, Deserialize)]
struct CoinMarketWire {
    id: String,
    symbol: String,
    name: String,
    #[serde(default)]
    image: Option<String>,
    current_price: Option<f64>,
    market_cap: Option<f64>,
    market_cap_rank: Option<u32>,
    price_change_percentage_24h: Option<f64>,
    total_volume: Option<f64>,
}

/// `/global` response envelope
#[derive(Debug, Deserialize)]
struct GlobalWire {
    data: GlobalDataWire,
}

#[derive(Debug, Deserialize)]
struct GlobalDataWire {
    total_market_cap: HashMap<String, f64>,
    total_volume: HashMap<String, f64>,
    market_cap_percentage: HashMap<String, f64>,
    market_cap_change_percentage_24h_usd: f64,
}

/// `/search/trending` response envelope
#[derive(Debug, Deserialize)]
struct TrendingWire {
    coins: Vec<TrendingItemWire>,
}

#[derive(Debug, Deserialize)]
struct TrendingItemWire {
    item: TrendingCoinWire,
}

#[derive(Debug, Deserialize)]
struct TrendingCoinWire {
    id: String,
    name: String,
    symbol: String,
    #[serde(default)]
    thumb: String,
    market_cap_rank: Option<u32>,
    #[serde(default)]
    price_btc: f64,
}

/// CoinGecko market data source
///
/// Issues exactly one GET per call; there is no retry or backoff.
pub struct CoinGeckoSource {
    client: Client,
    base_url: String,
    vs_currency: String,
}

impl CoinGeckoSource {
    /// Creates a source against the public CoinGecko API
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_settings(
            COINGECKO_API_URL,
            DEFAULT_VS_CURRENCY,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    /// Creates a source with an explicit base URL, quote currency and timeout
    pub fn with_settings(
        base_url: &str,
        vs_currency: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            vs_currency: vs_currency.to_lowercase(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a GET and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ProviderError> {
        let url = self.endpoint(path);
        tracing::debug!(url = %url, params = query.len(), "Fetching from CoinGecko");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        // Check for rate limiting
        if response.status().as_u16() == 429 {
            return Err(ProviderError::RateLimitExceeded);
        }

        // Check for other errors
        if !response.status().is_success() {
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let response_text = response
            .text()
            .await
            .map_err(ProviderError::from_transport)?;

        serde_json::from_str(&response_text).map_err(|e| {
            ProviderError::InvalidResponse(format!(
                "Failed to parse CoinGecko response from {}: {}",
                path, e
            ))
        })
    }
}

/// Converts the listing into a validated snapshot
///
/// Coins without a market cap rank are dropped; missing numbers become zero.
fn parse_markets(wire: Vec<CoinMarketWire>) -> Result<MarketSnapshot, ProviderError> {
    let total = wire.len();
    let entries: Vec<MarketEntry> = wire
        .into_iter()
        .filter_map(|coin| {
            let rank = coin.market_cap_rank?;
            Some(MarketEntry {
                id: coin.id,
                symbol: coin.symbol,
                name: coin.name,
                image: coin.image.unwrap_or_default(),
                current_price: coin.current_price.unwrap_or_default(),
                market_cap: coin.market_cap.unwrap_or_default(),
                market_cap_rank: rank,
                price_change_percentage_24h: coin.price_change_percentage_24h.unwrap_or_default(),
                total_volume: coin.total_volume.unwrap_or_default(),
            })
        })
        .collect();

    if entries.len() < total {
        tracing::debug!(
            dropped = total - entries.len(),
            "Skipped unranked coins in market listing"
        );
    }

    MarketSnapshot::new(entries)
}

fn parse_global(wire: GlobalWire, vs_currency: &str) -> Result<GlobalStats, ProviderError> {
    let data = wire.data;

    let total_market_cap = data
        .total_market_cap
        .get(vs_currency)
        .copied()
        .ok_or_else(|| {
            ProviderError::invalid_response(format!("no total market cap in {}", vs_currency))
        })?;
    let total_volume = data.total_volume.get(vs_currency).copied().ok_or_else(|| {
        ProviderError::invalid_response(format!("no total volume in {}", vs_currency))
    })?;

    let dominance = DOMINANCE_ASSETS
        .iter()
        .filter_map(|symbol| {
            data.market_cap_percentage
                .get(*symbol)
                .map(|percentage| Dominance {
                    symbol: symbol.to_string(),
                    percentage: *percentage,
                })
        })
        .collect();

    Ok(GlobalStats {
        total_market_cap,
        total_volume,
        dominance,
        market_cap_change_percentage_24h: data.market_cap_change_percentage_24h_usd,
    })
}

fn parse_trending(wire: TrendingWire) -> Vec<TrendingEntry> {
    wire.coins
        .into_iter()
        .map(|TrendingItemWire { item }| TrendingEntry {
            id: item.id,
            name: item.name,
            symbol: item.symbol,
            thumb: item.thumb,
            market_cap_rank: item.market_cap_rank,
            price_btc: item.price_btc,
        })
        .collect()
}

#[async_trait]
impl MarketDataSource for CoinGeckoSource {
    async fn list_markets(&self, query: &MarketsQuery) -> Result<MarketSnapshot, ProviderError> {
        let wire: Vec<CoinMarketWire> = self
            .get_json(COINGECKO_MARKETS_ENDPOINT, &query.to_query_pairs())
            .await?;
        let snapshot = parse_markets(wire)?;

        tracing::debug!(
            count = snapshot.len(),
            page = query.page,
            "Fetched market listing from CoinGecko"
        );

        Ok(snapshot)
    }

    async fn global_stats(&self) -> Result<GlobalStats, ProviderError> {
        let wire: GlobalWire = self.get_json(COINGECKO_GLOBAL_ENDPOINT, &[]).await?;
        parse_global(wire, &self.vs_currency)
    }

    async fn trending(&self) -> Result<Vec<TrendingEntry>, ProviderError> {
        let wire: TrendingWire = self.get_json(COINGECKO_TRENDING_ENDPOINT, &[]).await?;
        let trending = parse_trending(wire);

        tracing::debug!(count = trending.len(), "Fetched trending coins from CoinGecko");

        Ok(trending)
    }

    fn source_name(&self) -> &'static str {
        "coingecko"
    }
}
