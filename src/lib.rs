//! # Crypto Market Dashboard SDK
//!
//! Builds the pages of a cryptocurrency market dashboard from a market data
//! source such as CoinGecko: a ranked and sortable coin table, top gainers and
//! losers, trending coins, global market statistics and market-cap charts.
//!
//! Every view follows the same flow. It fetches once when mounted, falls back
//! to a built-in dataset if the fetch fails, derives its rows, and renders
//! them as plain text.
//!
//! ## Usage
//!
//! ```no_run
//! use crypto_dashboard_sdk::{DashboardConfig, SnapshotFetcher, RankedListView, SortField};
//! use crypto_dashboard_sdk::providers::CoinGeckoSource;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DashboardConfig::from_env()?;
//! let fetcher = SnapshotFetcher::new(Arc::new(CoinGeckoSource::new()?), config.failure_policy);
//!
//! // Top 50 coins, most expensive first
//! let mut table = RankedListView::table(&config.vs_currency);
//! table.set_sort(SortField::Price);
//! table.set_sort(SortField::Price);
//! table.mount(&fetcher).await;
//!
//! for row in table.rows() {
//!     println!("{} {} {} {}", row.rank, row.name, row.price, row.change);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod metrics;
pub mod provider;
pub mod providers;
pub mod shell;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, TableOptions};
pub use error::{DashboardError, ProviderError};
pub use fetcher::SnapshotFetcher;
pub use metrics::FetchMetrics;
pub use provider::MarketDataSource;
pub use shell::Route;
pub use types::{
    DataOrigin, FailurePolicy, Fetched, GlobalStats, MarketEntry, MarketSnapshot, MarketsQuery,
    TrendingEntry,
};
pub use view::{RankedListView, SortDirection, SortField, ViewState};
