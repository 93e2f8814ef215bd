//! Types for the crypto market dashboard

use crate::{
    constants::{COINGECKO_MARKET_ORDER, MAX_PAGE_SIZE},
    error::ProviderError,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// One coin in a market listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEntry {
    /// Provider identifier, unique within a snapshot (e.g. "bitcoin")
    pub id: String,

    /// Ticker symbol as the provider spells it (usually lower-case)
    pub symbol: String,

    /// Display name
    pub name: String,

    /// Image URL
    pub image: String,

    /// Price in the quote currency
    pub current_price: f64,

    /// Market capitalization in the quote currency
    pub market_cap: f64,

    /// Position by market cap, 1 = largest
    pub market_cap_rank: u32,

    /// 24h price change percentage
    pub price_change_percentage_24h: f64,

    /// 24h traded volume in the quote currency
    pub total_volume: f64,
}

impl MarketEntry {
    /// Route of the per-coin detail view
    pub fn detail_path(&self) -> String {
        format!("/cryptocurrencies/{}", self.id)
    }

    /// Symbol as shown in the UI
    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }
}

/// One fetched, immutable batch of market entries in provider order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MarketSnapshot {
    entries: Vec<MarketEntry>,
}

impl MarketSnapshot {
    /// Builds a snapshot, rejecting data that breaks the snapshot invariants
    ///
    /// Ranks must be positive and unique, identifiers unique, and price,
    /// market cap and volume finite and non-negative.
    pub fn new(entries: Vec<MarketEntry>) -> Result<Self, ProviderError> {
        Self::validate(&entries)?;
        Ok(Self { entries })
    }

    /// Wraps entries that are known to be valid (the built-in fallback datasets)
    pub(crate) fn from_trusted(entries: Vec<MarketEntry>) -> Self {
        debug_assert!(Self::validate(&entries).is_ok());
        Self { entries }
    }

    fn validate(entries: &[MarketEntry]) -> Result<(), ProviderError> {
        let mut ranks = HashSet::with_capacity(entries.len());
        let mut ids = HashSet::with_capacity(entries.len());

        for entry in entries {
            if entry.market_cap_rank == 0 {
                return Err(ProviderError::invalid_response(format!(
                    "{} has market cap rank 0",
                    entry.id
                )));
            }
            if !ranks.insert(entry.market_cap_rank) {
                return Err(ProviderError::invalid_response(format!(
                    "duplicate market cap rank {} ({})",
                    entry.market_cap_rank, entry.id
                )));
            }
            if !ids.insert(entry.id.as_str()) {
                return Err(ProviderError::invalid_response(format!(
                    "duplicate id {}",
                    entry.id
                )));
            }
            for (field, value) in [
                ("current_price", entry.current_price),
                ("market_cap", entry.market_cap),
                ("total_volume", entry.total_volume),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ProviderError::invalid_response(format!(
                        "{} has invalid {}: {}",
                        entry.id, field, value
                    )));
                }
            }
            if !entry.price_change_percentage_24h.is_finite() {
                return Err(ProviderError::invalid_response(format!(
                    "{} has non-finite 24h change",
                    entry.id
                )));
            }
        }

        Ok(())
    }

    /// Entries in provider order
    pub fn entries(&self) -> &[MarketEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A coin from the trending search list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub id: String,
    pub name: String,
    pub symbol: String,
    /// Thumbnail URL
    pub thumb: String,
    /// Market cap rank, absent for unranked coins
    pub market_cap_rank: Option<u32>,
    /// Price denominated in BTC
    pub price_btc: f64,
}

impl TrendingEntry {
    /// Route of the per-coin detail view
    pub fn detail_path(&self) -> String {
        format!("/cryptocurrencies/{}", self.id)
    }

    /// Rank label, "N/A" when the coin is unranked
    pub fn rank_label(&self) -> String {
        match self.market_cap_rank {
            Some(rank) if rank > 0 => rank.to_string(),
            _ => "N/A".to_string(),
        }
    }
}

/// A reference asset's share of total market capitalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dominance {
    /// Lower-case asset symbol ("btc", "eth")
    pub symbol: String,
    /// Share of total market cap in percent
    pub percentage: f64,
}

/// Aggregate totals for the whole market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    /// Total market capitalization in the quote currency
    pub total_market_cap: f64,
    /// Total 24h volume in the quote currency
    pub total_volume: f64,
    /// Dominance of up to two reference assets, largest first
    pub dominance: Vec<Dominance>,
    /// 24h change of the total market cap in percent
    pub market_cap_change_percentage_24h: f64,
}

impl GlobalStats {
    /// Dominance percentage for a reference asset, if reported
    pub fn dominance_of(&self, symbol: &str) -> Option<f64> {
        self.dominance
            .iter()
            .find(|d| d.symbol.eq_ignore_ascii_case(symbol))
            .map(|d| d.percentage)
    }
}

/// One point of a chart series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Parameters of a market listing request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketsQuery {
    pub vs_currency: String,
    pub per_page: u16,
    pub page: u32,
}

impl MarketsQuery {
    /// First page of the listing ordered by market cap, descending
    ///
    /// `per_page` is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn top(vs_currency: &str, per_page: u16) -> Self {
        Self {
            vs_currency: vs_currency.to_lowercase(),
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
            page: 1,
        }
    }

    /// Selects a page, 1-based
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Query string pairs in the order the endpoint documents them
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", self.vs_currency.clone()),
            ("order", COINGECKO_MARKET_ORDER.to_string()),
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
            ("sparkline", "false".to_string()),
            ("locale", "en".to_string()),
        ]
    }
}

/// What the fetcher does when a live read fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the failure and show the built-in fallback dataset
    #[default]
    UseFallback,
    /// Log the failure and hand it to the view, which renders a failed state
    SurfaceError,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fallback" | "use_fallback" | "use-fallback" => Ok(FailurePolicy::UseFallback),
            "surface" | "surface_error" | "surface-error" => Ok(FailurePolicy::SurfaceError),
            other => Err(format!(
                "unknown failure policy '{}', expected 'fallback' or 'surface'",
                other
            )),
        }
    }
}

/// Where a piece of displayed data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    /// Returned by the configured source
    Live,
    /// Substituted from the built-in fallback dataset
    Fallback,
}

/// Result of a fetch, tagged with its origin
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub data: T,
    pub origin: DataOrigin,
    pub fetched_at: DateTime<Utc>,
}

impl<T> Fetched<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            origin: DataOrigin::Live,
            fetched_at: Utc::now(),
        }
    }

    pub fn fallback(data: T) -> Self {
        Self {
            data,
            origin: DataOrigin::Fallback,
            fetched_at: Utc::now(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == DataOrigin::Fallback
    }
}
