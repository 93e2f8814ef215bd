//! Snapshot fetcher: one read per call, with the failure policy applied
//!
//! Transport errors, non-success statuses and parse failures all take the
//! same path: the failure is logged and then either replaced by a fallback
//! dataset or handed back to the caller, depending on `FailurePolicy`.

use crate::{
    error::{DashboardError, ProviderError},
    metrics::{FetchMetrics, FetchOutcome, MetricsCollector},
    provider::MarketDataSource,
    providers::fallback,
    types::{FailurePolicy, Fetched, GlobalStats, MarketSnapshot, MarketsQuery, TrendingEntry},
};
use std::sync::Arc;
use std::time::Instant;

/// Reads market data from a source and applies the failure policy
#[derive(Clone)]
pub struct SnapshotFetcher {
    source: Arc<dyn MarketDataSource>,
    policy: FailurePolicy,
    metrics: Arc<MetricsCollector>,
}

impl SnapshotFetcher {
    pub fn new(source: Arc<dyn MarketDataSource>, policy: FailurePolicy) -> Self {
        let metrics = Arc::new(MetricsCollector::new(source.source_name()));
        Self {
            source,
            policy,
            metrics,
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Returns the name of the underlying source
    pub fn source_name(&self) -> &'static str {
        self.source.source_name()
    }

    /// Fetches a market listing
    ///
    /// # Arguments
    /// * `query` - Listing parameters
    /// * `fallback` - Dataset shown if the fetch fails under `UseFallback`
    pub async fn markets(
        &self,
        query: &MarketsQuery,
        fallback: fn() -> MarketSnapshot,
    ) -> Result<Fetched<MarketSnapshot>, DashboardError> {
        let started = Instant::now();
        let result = self.source.list_markets(query).await;
        self.settle("market listing", started, result, fallback).await
    }

    /// Fetches global market statistics
    pub async fn global_stats(&self) -> Result<Fetched<GlobalStats>, DashboardError> {
        let started = Instant::now();
        let result = self.source.global_stats().await;
        self.settle("global stats", started, result, fallback::global_stats).await
    }

    /// Fetches the trending coins list
    pub async fn trending(&self) -> Result<Fetched<Vec<TrendingEntry>>, DashboardError> {
        let started = Instant::now();
        let result = self.source.trending().await;
        self.settle("trending coins", started, result, fallback::trending).await
    }

    /// Gets fetch metrics including latency percentiles and fallback counts
    pub async fn metrics(&self) -> FetchMetrics {
        self.metrics.get_metrics().await
    }

    async fn settle<T>(
        &self,
        resource: &str,
        started: Instant,
        result: Result<T, ProviderError>,
        fallback: impl FnOnce() -> T,
    ) -> Result<Fetched<T>, DashboardError> {
        let elapsed = started.elapsed();

        match result {
            Ok(data) => {
                let fetched = Fetched::live(data);
                tracing::debug!(
                    resource,
                    source = self.source_name(),
                    latency_ms = elapsed.as_millis() as u64,
                    fetched_at = %fetched.fetched_at,
                    "Fetched live data"
                );
                self.metrics.record(elapsed, FetchOutcome::Live).await;
                Ok(fetched)
            }
            Err(e) => match self.policy {
                FailurePolicy::UseFallback => {
                    tracing::warn!(
                        resource,
                        source = self.source_name(),
                        error = %e,
                        "Fetch failed, showing fallback data"
                    );
                    self.metrics.record(elapsed, FetchOutcome::Fallback).await;
                    Ok(Fetched::fallback(fallback()))
                }
                FailurePolicy::SurfaceError => {
                    tracing::warn!(
                        resource,
                        source = self.source_name(),
                        error = %e,
                        "Fetch failed"
                    );
                    self.metrics.record(elapsed, FetchOutcome::Failed).await;
                    Err(DashboardError::fetch_failed(resource, &e))
                }
            },
        }
    }
}
