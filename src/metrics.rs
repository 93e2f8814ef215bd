//! Fetch metrics collection and reporting
//!
//! Tracks latency percentiles, failure counts and how often the fallback
//! dataset stood in for live data.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of samples to keep for metrics calculation
const MAX_SAMPLES: usize = 100;

/// Snapshot of a fetcher's metrics
#[derive(Debug, Clone)]
pub struct FetchMetrics {
    /// Name of the data source
    pub source_name: String,
    /// 50th percentile latency of successful fetches in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency of successful fetches in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of fetches tracked
    pub total_requests: u64,
    /// Number of failed fetches
    pub failed_requests: u64,
    /// Number of failed fetches answered with fallback data
    pub fallbacks_served: u64,
}

impl FetchMetrics {
    /// Creates metrics with no data
    pub fn empty(source_name: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            total_requests: 0,
            failed_requests: 0,
            fallbacks_served: 0,
        }
    }
}

/// How a fetch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Live,
    Fallback,
    Failed,
}

#[derive(Debug, Clone)]
struct LatencySample {
    duration_ms: f64,
    success: bool,
}

#[derive(Debug, Default)]
struct Counters {
    samples: VecDeque<LatencySample>,
    total: u64,
    failed: u64,
    fallbacks: u64,
}

/// Collects and computes metrics for one fetcher
pub struct MetricsCollector {
    source_name: String,
    counters: RwLock<Counters>,
}

impl MetricsCollector {
    /// Creates a new metrics collector for a source
    pub fn new(source_name: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            counters: RwLock::new(Counters {
                samples: VecDeque::with_capacity(MAX_SAMPLES),
                ..Counters::default()
            }),
        }
    }

    /// Records a fetch with its duration and outcome
    pub async fn record(&self, duration: Duration, outcome: FetchOutcome) {
        let success = outcome == FetchOutcome::Live;
        let mut counters = self.counters.write().await;

        counters.total += 1;
        if !success {
            counters.failed += 1;
        }
        if outcome == FetchOutcome::Fallback {
            counters.fallbacks += 1;
        }

        if counters.samples.len() >= MAX_SAMPLES {
            counters.samples.pop_front();
        }
        counters.samples.push_back(LatencySample {
            duration_ms: duration.as_secs_f64() * 1000.0,
            success,
        });
    }

    /// Computes current metrics from collected samples
    pub async fn get_metrics(&self) -> FetchMetrics {
        let counters = self.counters.read().await;

        if counters.total == 0 {
            return FetchMetrics::empty(&self.source_name);
        }

        let mut latencies: Vec<f64> = counters
            .samples
            .iter()
            .filter(|s| s.success)
            .map(|s| s.duration_ms)
            .collect();
        latencies.sort_by(f64::total_cmp);

        FetchMetrics {
            source_name: self.source_name.clone(),
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            success_rate: (counters.total - counters.failed) as f64 / counters.total as f64,
            total_requests: counters.total,
            failed_requests: counters.failed,
            fallbacks_served: counters.fallbacks,
        }
    }
}

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_collector() {
        let collector = MetricsCollector::new("test");

        collector
            .record(Duration::from_millis(100), FetchOutcome::Live)
            .await;
        collector
            .record(Duration::from_millis(200), FetchOutcome::Live)
            .await;
        collector
            .record(Duration::from_millis(150), FetchOutcome::Fallback)
            .await;
        collector
            .record(Duration::from_millis(900), FetchOutcome::Failed)
            .await;

        let metrics = collector.get_metrics().await;

        assert_eq!(metrics.source_name, "test");
        assert_eq!(metrics.total_requests, 4);
        assert_eq!(metrics.failed_requests, 2);
        assert_eq!(metrics.fallbacks_served, 1);
        assert_eq!(metrics.success_rate, 0.5);
        assert!(metrics.latency_p99_ms <= 200.0);
    }

    #[tokio::test]
    async fn test_empty_metrics() {
        let metrics = MetricsCollector::new("idle").get_metrics().await;
        assert_eq!(metrics.total_requests, 0);
        assert_eq!(metrics.success_rate, 1.0);
    }

    #[test]
    fn test_percentile() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        assert_eq!(percentile(&values, 50.0), 5.0);
        assert_eq!(percentile(&values, 99.0), 9.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }
}
