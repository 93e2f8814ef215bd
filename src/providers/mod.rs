//! Market data source implementations

pub mod cached;
pub mod coingecko;
pub mod fallback;

pub use cached::CachingSource;
pub use coingecko::CoinGeckoSource;
pub use fallback::FallbackSource;
