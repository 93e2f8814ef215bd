//! Built-in fallback datasets
//!
//! Fixed data substituted when a live fetch fails under
//! `FailurePolicy::UseFallback`. `FallbackSource` serves the same data through
//! the `MarketDataSource` trait for offline runs.

use crate::{
    constants::{TABLE_FALLBACK_SEED, TABLE_PAGE_SIZE},
    error::ProviderError,
    provider::MarketDataSource,
    types::{Dominance, GlobalStats, MarketEntry, MarketSnapshot, MarketsQuery, TrendingEntry},
};
use async_trait::async_trait;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::collections::HashSet;

#[allow(clippy::too_many_arguments)]
fn coin(
    id: &str,
    symbol: &str,
    name: &str,
    image: &str,
    current_price: f64,
    market_cap: f64,
    market_cap_rank: u32,
    price_change_percentage_24h: f64,
    total_volume: f64,
) -> MarketEntry {
    MarketEntry {
        id: id.to_string(),
        symbol: symbol.to_string(),
        name: name.to_string(),
        image: image.to_string(),
        current_price,
        market_cap,
        market_cap_rank,
        price_change_percentage_24h,
        total_volume,
    }
}

#[rustfmt::skip]
fn top_entries() -> Vec<MarketEntry> {
    vec![
        coin("bitcoin", "btc", "Bitcoin",
            "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            43521.0, 852_975_942_335.0, 1, 2.5, 28_975_942_335.0),
        coin("ethereum", "eth", "Ethereum",
            "https://assets.coingecko.com/coins/images/279/large/ethereum.png",
            2350.0, 282_975_942_335.0, 2, 3.2, 18_975_942_335.0),
        coin("tether", "usdt", "Tether",
            "https://assets.coingecko.com/coins/images/325/large/Tether.png",
            1.0, 92_975_942_335.0, 3, 0.1, 58_975_942_335.0),
        coin("binancecoin", "bnb", "BNB",
            "https://assets.coingecko.com/coins/images/825/large/bnb-icon2_2x.png",
            570.0, 87_975_942_335.0, 4, 1.8, 2_975_942_335.0),
        coin("solana", "sol", "Solana",
            "https://assets.coingecko.com/coins/images/4128/large/solana.png",
            145.0, 62_975_942_335.0, 5, 4.5, 3_975_942_335.0),
    ]
}

#[rustfmt::skip]
fn gainer_entries() -> Vec<MarketEntry> {
    vec![
        coin("solana", "sol", "Solana",
            "https://assets.coingecko.com/coins/images/4128/large/solana.png",
            145.0, 62_975_942_335.0, 5, 8.5, 3_975_942_335.0),
        coin("injective-protocol", "inj", "Injective",
            "https://assets.coingecko.com/coins/images/12882/large/Secondary_Symbol.png",
            32.5, 2_730_000_000.0, 32, 7.2, 154_000_000.0),
        coin("render-token", "rndr", "Render",
            "https://assets.coingecko.com/coins/images/11636/large/rndr.png",
            7.8, 1_190_000_000.0, 65, 6.9, 98_000_000.0),
        coin("aptos", "apt", "Aptos",
            "https://assets.coingecko.com/coins/images/26455/large/aptos_round.png",
            8.2, 2_010_000_000.0, 38, 5.8, 121_000_000.0),
        coin("arbitrum", "arb", "Arbitrum",
            "https://assets.coingecko.com/coins/images/16547/large/photo_2023-03-29_21.47.00.jpeg",
            1.25, 1_590_000_000.0, 45, 5.3, 310_000_000.0),
    ]
}

#[rustfmt::skip]
fn loser_entries() -> Vec<MarketEntry> {
    vec![
        coin("dogecoin", "doge", "Dogecoin",
            "https://assets.coingecko.com/coins/images/5/large/dogecoin.png",
            0.12, 17_100_000_000.0, 8, -4.5, 690_000_000.0),
        coin("shiba-inu", "shib", "Shiba Inu",
            "https://assets.coingecko.com/coins/images/11939/large/shiba.png",
            0.000018, 10_600_000_000.0, 12, -3.8, 240_000_000.0),
        coin("cardano", "ada", "Cardano",
            "https://assets.coingecko.com/coins/images/975/large/cardano.png",
            0.45, 15_800_000_000.0, 9, -3.2, 380_000_000.0),
        coin("polkadot", "dot", "Polkadot",
            "https://assets.coingecko.com/coins/images/12171/large/polkadot.png",
            6.8, 8_900_000_000.0, 14, -2.9, 170_000_000.0),
        coin("litecoin", "ltc", "Litecoin",
            "https://assets.coingecko.com/coins/images/2/large/litecoin.png",
            72.5, 5_400_000_000.0, 19, -2.5, 410_000_000.0),
    ]
}

/// Fallback for the dashboard's top cryptocurrencies list
pub fn top_cryptos() -> MarketSnapshot {
    MarketSnapshot::from_trusted(top_entries())
}

/// Fallback for the top gainers panel, already filtered and ordered
pub fn top_gainers() -> MarketSnapshot {
    MarketSnapshot::from_trusted(gainer_entries())
}

/// Fallback for the top losers panel, already filtered and ordered
pub fn top_losers() -> MarketSnapshot {
    MarketSnapshot::from_trusted(loser_entries())
}

/// Fallback for the cryptocurrencies table
///
/// Synthetic coins `crypto-1..=crypto-50` with price, cap and volume falling
/// off as `1/rank`. The 24h change is random in `(-10, 10)` but drawn from a
/// fixed seed, so the dataset is identical on every call.
pub fn crypto_table() -> MarketSnapshot {
    let mut rng = SmallRng::seed_from_u64(TABLE_FALLBACK_SEED);

    let entries = (1..=u32::from(TABLE_PAGE_SIZE))
        .map(|i| {
            let magnitude = rng.random::<f64>() * 10.0;
            let change = if rng.random_bool(0.5) {
                magnitude
            } else {
                -magnitude
            };
            let divisor = f64::from(i);
            coin(
                &format!("crypto-{}", i),
                &format!("sym{}", i),
                &format!("Cryptocurrency {}", i),
                "",
                1000.0 / divisor,
                1_000_000_000.0 / divisor,
                i,
                change,
                500_000_000.0 / divisor,
            )
        })
        .collect();

    MarketSnapshot::from_trusted(entries)
}

/// Fallback for the market statistics panel
pub fn global_stats() -> GlobalStats {
    GlobalStats {
        total_market_cap: 1_240_000_000_000.0,
        total_volume: 48_800_000_000.0,
        dominance: vec![
            Dominance {
                symbol: "btc".to_string(),
                percentage: 52.3,
            },
            Dominance {
                symbol: "eth".to_string(),
                percentage: 18.7,
            },
        ],
        market_cap_change_percentage_24h: 2.5,
    }
}

fn trending_coin(
    id: &str,
    name: &str,
    symbol: &str,
    thumb: &str,
    rank: u32,
    price_btc: f64,
) -> TrendingEntry {
    TrendingEntry {
        id: id.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        thumb: thumb.to_string(),
        market_cap_rank: Some(rank),
        price_btc,
    }
}

/// Fallback for the trending coins grid
#[rustfmt::skip]
pub fn trending() -> Vec<TrendingEntry> {
    vec![
        trending_coin("pepe", "Pepe", "PEPE",
            "https://assets.coingecko.com/coins/images/29850/thumb/pepe-token.jpeg",
            95, 0.000_000_034_2),
        trending_coin("injective-protocol", "Injective", "INJ",
            "https://assets.coingecko.com/coins/images/12882/thumb/Secondary_Symbol.png",
            32, 0.000_045_6),
        trending_coin("sei-network", "Sei", "SEI",
            "https://assets.coingecko.com/coins/images/28205/thumb/Sei_Logo_-_Transparent.png",
            42, 0.000_012_3),
        trending_coin("render-token", "Render", "RNDR",
            "https://assets.coingecko.com/coins/images/11636/thumb/rndr.png",
            65, 0.000_023_4),
        trending_coin("aptos", "Aptos", "APT",
            "https://assets.coingecko.com/coins/images/26455/thumb/aptos_round.png",
            38, 0.000_034_5),
        trending_coin("arbitrum", "Arbitrum", "ARB",
            "https://assets.coingecko.com/coins/images/16547/thumb/photo_2023-03-29_21.47.00.jpeg",
            45, 0.000_023_4),
    ]
}

/// Serves the fallback datasets as a regular source
///
/// The listing merges the top, gainer and loser coins (first occurrence of an
/// id wins), ordered by rank and cut to the requested page size. Every page
/// after the first is empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackSource;

impl FallbackSource {
    pub fn new() -> Self {
        Self
    }

    fn listing(query: &MarketsQuery) -> MarketSnapshot {
        if query.page > 1 {
            return MarketSnapshot::default();
        }

        let mut seen = HashSet::new();
        let mut entries: Vec<MarketEntry> = top_entries()
            .into_iter()
            .chain(gainer_entries())
            .chain(loser_entries())
            .filter(|entry| seen.insert(entry.id.clone()))
            .collect();

        entries.sort_by_key(|entry| entry.market_cap_rank);
        entries.truncate(query.per_page as usize);

        MarketSnapshot::from_trusted(entries)
    }
}

#[async_trait]
impl MarketDataSource for FallbackSource {
    async fn list_markets(&self, query: &MarketsQuery) -> Result<MarketSnapshot, ProviderError> {
        Ok(Self::listing(query))
    }

    async fn global_stats(&self) -> Result<GlobalStats, ProviderError> {
        Ok(global_stats())
    }

    async fn trending(&self) -> Result<Vec<TrendingEntry>, ProviderError> {
        Ok(trending())
    }

    fn source_name(&self) -> &'static str {
        "fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(snapshot: &MarketSnapshot) {
        assert!(MarketSnapshot::new(snapshot.entries().to_vec()).is_ok());
    }

    #[test]
    fn test_fallback_snapshots_hold_invariants() {
        assert_valid(&top_cryptos());
        assert_valid(&top_gainers());
        assert_valid(&top_losers());
        assert_valid(&crypto_table());
    }

    #[test]
    fn test_gainers_and_losers_signs() {
        assert!(top_gainers()
            .entries()
            .iter()
            .all(|e| e.price_change_percentage_24h > 0.0));
        assert!(top_losers()
            .entries()
            .iter()
            .all(|e| e.price_change_percentage_24h < 0.0));
    }

    #[test]
    fn test_crypto_table_is_fixed() {
        let first = crypto_table();
        let second = crypto_table();
        assert_eq!(first, second);
        assert_eq!(first.len(), 50);
        assert_eq!(first.entries()[0].current_price, 1000.0);
        assert_eq!(first.entries()[49].market_cap_rank, 50);
        assert!(first
            .entries()
            .iter()
            .all(|e| e.price_change_percentage_24h.abs() < 10.0));
    }

    #[tokio::test]
    async fn test_fallback_source_listing() {
        let source = FallbackSource::new();
        let snapshot = source
            .list_markets(&MarketsQuery::top("usd", 100))
            .await
            .unwrap();

        assert_eq!(snapshot.len(), 14);
        assert_valid(&snapshot);
        let ranks: Vec<u32> = snapshot.entries().iter().map(|e| e.market_cap_rank).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted);

        let solana = snapshot.entries().iter().find(|e| e.id == "solana").unwrap();
        assert_eq!(solana.price_change_percentage_24h, 4.5);

        let page_two = source
            .list_markets(&MarketsQuery::top("usd", 10).with_page(2))
            .await
            .unwrap();
        assert!(page_two.is_empty());
    }

    #[test]
    fn test_trending_has_six_ranked_coins() {
        let coins = trending();
        assert_eq!(coins.len(), 6);
        assert!(coins.iter().all(|c| c.market_cap_rank.is_some()));
    }
}
