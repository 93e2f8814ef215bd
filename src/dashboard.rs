//! Page composition
//!
//! A `Dashboard` owns one fetcher and builds fresh views for every page render,
//! mounting them concurrently before laying them out inside the shell.

use crate::{
    config::DashboardConfig,
    error::DashboardError,
    fetcher::SnapshotFetcher,
    metrics::FetchMetrics,
    provider::MarketDataSource,
    providers::{CachingSource, CoinGeckoSource, FallbackSource},
    shell::{self, Route},
    view::{
        ChartView, DominanceView, MarketStatsView, MoversView, RankedListView, SeriesKind,
        SortField, SummaryCards, TrendingView,
    },
};
use chrono::{Datelike, Utc};
use std::sync::Arc;

/// Chart height in rows
const CHART_HEIGHT: usize = 10;

/// Sorting and search applied to the cryptocurrencies table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOptions {
    pub sort: Option<SortField>,
    pub descending: bool,
    pub search: Option<String>,
}

/// Entry point for rendering dashboard pages
///
/// # Example
/// ```no_run
/// use crypto_dashboard_sdk::{Dashboard, DashboardConfig, Route, TableOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dashboard = Dashboard::new(DashboardConfig::from_env()?)?;
/// let page = dashboard.render(Route::Market, &TableOptions::default()).await;
/// println!("{}", page);
/// # Ok(())
/// # }
/// ```
pub struct Dashboard {
    config: DashboardConfig,
    fetcher: SnapshotFetcher,
}

impl Dashboard {
    /// Creates a dashboard with the source the configuration selects
    ///
    /// Offline mode serves the built-in datasets. Otherwise the CoinGecko
    /// source is used, behind a shared cache when a TTL is configured.
    pub fn new(config: DashboardConfig) -> Result<Self, DashboardError> {
        config.validate()?;

        let source: Arc<dyn MarketDataSource> = if config.offline {
            Arc::new(FallbackSource::new())
        } else {
            let live = CoinGeckoSource::with_settings(
                &config.api_url,
                &config.vs_currency,
                config.request_timeout,
            )
            .map_err(|e| DashboardError::internal(format!("failed to build HTTP client: {}", e)))?;

            match config.cache_ttl {
                Some(ttl) => Arc::new(CachingSource::new(Arc::new(live), ttl)),
                None => Arc::new(live),
            }
        };

        tracing::info!(
            source = source.source_name(),
            policy = ?config.failure_policy,
            vs_currency = %config.vs_currency,
            cache_ttl_secs = config.cache_ttl.map(|ttl| ttl.as_secs()),
            "Dashboard initialized"
        );

        Ok(Self::with_source(source, config))
    }

    /// Creates a dashboard over a custom source
    ///
    /// This is primarily for testing with mock sources.
    pub fn with_source(source: Arc<dyn MarketDataSource>, config: DashboardConfig) -> Self {
        let fetcher = SnapshotFetcher::new(source, config.failure_policy);
        Self { config, fetcher }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &SnapshotFetcher {
        &self.fetcher
    }

    /// Renders a full page, chrome included
    pub async fn render(&self, route: Route, options: &TableOptions) -> String {
        tracing::info!(route = %route, "Rendering page");

        let body = match route {
            Route::Dashboard => self.dashboard_page().await,
            Route::Cryptocurrencies => self.cryptocurrencies_page(options).await,
            Route::Market => self.market_page().await,
        };

        shell::wrap(route, Utc::now().year(), &body)
    }

    /// Gets fetch metrics for everything rendered so far
    pub async fn metrics(&self) -> FetchMetrics {
        self.fetcher.metrics().await
    }

    async fn dashboard_page(&self) -> String {
        let vs = &self.config.vs_currency;
        let mut cards = SummaryCards::new();
        let mut top = RankedListView::top_list(vs);
        let mut trending = TrendingView::new();
        let mut chart = ChartView::new(SeriesKind::UniformBand);
        chart.mount();

        futures::join!(
            cards.mount(&self.fetcher),
            top.mount(&self.fetcher),
            trending.mount(&self.fetcher),
        );

        [
            "Dashboard\n\n".to_string(),
            cards.render(),
            "\nTop Cryptocurrencies\n\n".to_string(),
            top.render_cards(),
            "\nTrending Coins\n\n".to_string(),
            trending.render(),
            "\n".to_string(),
            chart.render(CHART_HEIGHT),
        ]
        .concat()
    }

    async fn cryptocurrencies_page(&self, options: &TableOptions) -> String {
        let mut table = RankedListView::table(&self.config.vs_currency);
        if let Some(field) = options.sort {
            if field != table.sort_field() {
                table.set_sort(field);
            }
        }
        if options.descending {
            // Selecting the active column again flips it
            table.set_sort(table.sort_field());
        }
        if let Some(query) = &options.search {
            table.set_search(query);
        }

        table.mount(&self.fetcher).await;

        let mut out = String::from("Cryptocurrencies\n\n");
        if let Some(query) = options.search.as_deref().filter(|q| !q.trim().is_empty()) {
            out.push_str(&format!("Search: {}\n\n", query.trim()));
        }
        out.push_str(&table.render_table());
        out
    }

    async fn market_page(&self) -> String {
        let vs = &self.config.vs_currency;
        let mut stats = MarketStatsView::new();
        let mut gainers = MoversView::gainers(vs);
        let mut losers = MoversView::losers(vs);
        let mut dominance = DominanceView::new();
        let mut chart = ChartView::new(SeriesKind::RandomWalk);
        chart.mount();

        futures::join!(
            stats.mount(&self.fetcher),
            gainers.mount(&self.fetcher),
            losers.mount(&self.fetcher),
            dominance.mount(&self.fetcher),
        );

        [
            "Market Overview\n\n".to_string(),
            stats.render(),
            "\n".to_string(),
            chart.render(CHART_HEIGHT),
            "\n".to_string(),
            gainers.render(),
            "\n".to_string(),
            losers.render(),
            "\n".to_string(),
            dominance.render(),
        ]
        .concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::{entry, MockSource};
    use crate::types::FailurePolicy;

    fn mock_dashboard(mock: Arc<MockSource>, policy: FailurePolicy) -> Dashboard {
        let config = DashboardConfig {
            failure_policy: policy,
            ..DashboardConfig::default()
        };
        Dashboard::with_source(mock, config)
    }

    #[tokio::test]
    async fn test_dashboard_page_sections() {
        let mock = Arc::new(MockSource::new());
        let dashboard = mock_dashboard(mock.clone(), FailurePolicy::UseFallback);

        let page = dashboard.render(Route::Dashboard, &TableOptions::default()).await;

        assert!(page.contains("[Dashboard]"));
        assert!(page.contains("Total Market Cap"));
        assert!(page.contains("Top Cryptocurrencies"));
        assert!(page.contains("Trending Coins"));
        assert!(page.contains("Market Overview"));
        assert!(page.contains("CryptoTracker. All rights reserved."));
        // Cards, top list and trending each fetch once
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_table_sorted_and_searched() {
        let mock = Arc::new(MockSource::new());
        mock.set_entries(vec![
            entry("bitcoin", 1, 43521.0, 2.5),
            entry("ethereum", 2, 2285.0, -1.2),
            entry("bitcoin-cash", 3, 240.0, 0.7),
        ]);
        let dashboard = mock_dashboard(mock, FailurePolicy::UseFallback);

        let options = TableOptions {
            sort: Some(SortField::Price),
            descending: false,
            search: Some("BIT".to_string()),
        };
        let page = dashboard.render(Route::Cryptocurrencies, &options).await;

        assert!(page.contains("Search: BIT"));
        assert!(!page.contains("ethereum"));
        let cash = page.find("bitcoin-cash").unwrap();
        let btc = page.find("$43,521").unwrap();
        assert!(cash < btc);
    }

    #[tokio::test]
    async fn test_descending_rank() {
        let mock = Arc::new(MockSource::new());
        mock.set_entries(vec![entry("aaa", 1, 2.0, 1.0), entry("bbb", 2, 1.0, 1.0)]);
        let dashboard = mock_dashboard(mock, FailurePolicy::UseFallback);

        let options = TableOptions {
            descending: true,
            ..TableOptions::default()
        };
        let page = dashboard.render(Route::Cryptocurrencies, &options).await;

        assert!(page.find("bbb").unwrap() < page.find("aaa").unwrap());
    }

    #[tokio::test]
    async fn test_market_page_falls_back_when_source_fails() {
        let mock = Arc::new(MockSource::new());
        mock.set_failing(true);
        let dashboard = mock_dashboard(mock, FailurePolicy::UseFallback);

        let page = dashboard.render(Route::Market, &TableOptions::default()).await;

        assert!(page.contains("Market Statistics"));
        assert!(page.contains("$1.24T"));
        assert!(page.contains("Top Gainers (24h)"));
        assert!(page.contains("Top Losers (24h)"));
        assert!(page.contains("Others"));
        assert!(!page.contains("Failed to load"));

        let metrics = dashboard.metrics().await;
        assert_eq!(metrics.fallbacks_served, 4);
    }

    #[tokio::test]
    async fn test_surface_policy_shows_failures() {
        let mock = Arc::new(MockSource::new());
        mock.set_failing(true);
        let dashboard = mock_dashboard(mock, FailurePolicy::SurfaceError);

        let page = dashboard.render(Route::Cryptocurrencies, &TableOptions::default()).await;
        assert!(page.contains("Failed to load market listing"));
    }

    #[tokio::test]
    async fn test_offline_dashboard_uses_builtin_data() {
        let config = DashboardConfig {
            offline: true,
            ..DashboardConfig::default()
        };
        let dashboard = Dashboard::new(config).unwrap();
        assert_eq!(dashboard.fetcher().source_name(), "fallback");

        let page = dashboard.render(Route::Cryptocurrencies, &TableOptions::default()).await;
        assert!(page.contains("Bitcoin BTC"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DashboardConfig {
            vs_currency: String::new(),
            ..DashboardConfig::default()
        };
        assert!(Dashboard::new(config).is_err());
    }
}
