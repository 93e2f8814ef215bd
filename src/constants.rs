//! Constants for the crypto market dashboard
//!
//! Compile-time defaults for every setting. `config::DashboardConfig` reads
//! environment overrides on top of these; nothing else is configurable.

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Paginated market listing endpoint
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// Global aggregate statistics endpoint
pub const COINGECKO_GLOBAL_ENDPOINT: &str = "/global";

/// Trending coins endpoint
pub const COINGECKO_TRENDING_ENDPOINT: &str = "/search/trending";

/// Listing order requested from `/coins/markets`
pub const COINGECKO_MARKET_ORDER: &str = "market_cap_desc";

/// Quote currency used for listings and global totals
pub const DEFAULT_VS_CURRENCY: &str = "usd";

/// Display prefix for every formatted price and magnitude
pub const CURRENCY_SYMBOL: &str = "$";

/// HTTP request timeout (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "crypto-dashboard-sdk/0.1.0";

/// Largest page a market listing may request
pub const MAX_PAGE_SIZE: u16 = 100;

/// Page size of the dashboard's top cryptocurrencies list
pub const TOP_LIST_PAGE_SIZE: u16 = 10;

/// Page size of the cryptocurrencies table
pub const TABLE_PAGE_SIZE: u16 = 50;

/// Page size of the listing the gainers/losers panels filter
pub const MOVERS_PAGE_SIZE: u16 = 100;

/// Number of entries shown in the gainers and losers panels
pub const MOVERS_LIMIT: usize = 5;

/// Number of daily points in a generated chart series
pub const CHART_POINTS: usize = 31;

/// Starting value of the global market cap random walk
pub const RANDOM_WALK_BASE: f64 = 1_200_000_000_000.0;

/// Full width of one random walk step
pub const RANDOM_WALK_STEP: f64 = 50_000_000_000.0;

/// Floor of the market overview's uniform band
pub const UNIFORM_BAND_BASE: f64 = 1_000_000_000_000.0;

/// Height of the market overview's uniform band
pub const UNIFORM_BAND_SPREAD: f64 = 500_000_000_000.0;

/// Seed for the synthetic table fallback so it stays fixed across runs
pub const TABLE_FALLBACK_SEED: u64 = 0x00C0_FFEE;

/// Brand mark shown in the page header and footer
pub const BRAND_NAME: &str = "CryptoTracker";
