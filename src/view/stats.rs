//! Views over global market statistics
//!
//! All three read `GlobalStats` through their own mount, so the dashboard's
//! summary cards and the market page's panels settle independently.

use crate::{
    fetcher::SnapshotFetcher,
    format::{format_dominance, format_magnitude},
    types::GlobalStats,
    view::{
        row::ChangeIndicator,
        skeleton,
        state::{Mount, ViewState},
    },
};

/// Width of a full dominance bar in cells
const BAR_WIDTH: usize = 40;

/// Shared mount logic for the global-stats views
async fn mount_global(
    mount: &Mount,
    state: &mut ViewState<GlobalStats>,
    fetcher: &SnapshotFetcher,
    view: &'static str,
) {
    if !state.is_loading() {
        return;
    }

    let outcome = fetcher.global_stats().await;
    state.settle(outcome);

    tracing::debug!(
        mount_id = %mount.id,
        settle_ms = mount.elapsed_ms(),
        view,
        state = state.label(),
        "Global stats view mounted"
    );
}

fn dominance_label(stats: &GlobalStats, symbol: &str) -> String {
    stats
        .dominance_of(symbol)
        .map(format_dominance)
        .unwrap_or_else(|| "-".to_string())
}

/// Market statistics panel on the market page
pub struct MarketStatsView {
    mount: Mount,
    state: ViewState<GlobalStats>,
}

impl Default for MarketStatsView {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketStatsView {
    pub fn new() -> Self {
        Self {
            mount: Mount::new(),
            state: ViewState::Loading,
        }
    }

    pub fn state(&self) -> &ViewState<GlobalStats> {
        &self.state
    }

    pub async fn mount(&mut self, fetcher: &SnapshotFetcher) {
        mount_global(&self.mount, &mut self.state, fetcher, "market_stats").await;
    }

    /// Label and value pairs in display order
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let Some(stats) = self.state.data() else {
            return Vec::new();
        };

        vec![
            ("Total Market Cap", format_magnitude(stats.total_market_cap)),
            ("24h Trading Volume", format_magnitude(stats.total_volume)),
            ("BTC Dominance", dominance_label(stats, "btc")),
            ("ETH Dominance", dominance_label(stats, "eth")),
            (
                "24h Market Cap Change",
                ChangeIndicator::from_change(stats.market_cap_change_percentage_24h).to_string(),
            ),
        ]
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Market Statistics\n\n");
        match &self.state {
            ViewState::Loading => out.push_str(&skeleton(5)),
            ViewState::Failed(message) => {
                out.push_str(message);
                out.push('\n');
            }
            ViewState::Populated(_) | ViewState::Fallback(_) => {
                for (label, value) in self.rows() {
                    out.push_str(&format!("{:<24}{:>16}\n", label, value));
                }
            }
        }
        out
    }
}

/// One headline card on the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCard {
    pub title: &'static str,
    pub value: String,
    pub subtitle: String,
}

/// Headline cards at the top of the dashboard
pub struct SummaryCards {
    mount: Mount,
    state: ViewState<GlobalStats>,
}

impl Default for SummaryCards {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryCards {
    pub fn new() -> Self {
        Self {
            mount: Mount::new(),
            state: ViewState::Loading,
        }
    }

    pub fn state(&self) -> &ViewState<GlobalStats> {
        &self.state
    }

    pub async fn mount(&mut self, fetcher: &SnapshotFetcher) {
        mount_global(&self.mount, &mut self.state, fetcher, "summary_cards").await;
    }

    pub fn cards(&self) -> Vec<SummaryCard> {
        let Some(stats) = self.state.data() else {
            return Vec::new();
        };

        let change = ChangeIndicator::from_change(stats.market_cap_change_percentage_24h);
        vec![
            SummaryCard {
                title: "Total Market Cap",
                value: format_magnitude(stats.total_market_cap),
                subtitle: format!("{} from last 24h", change),
            },
            SummaryCard {
                title: "24h Volume",
                value: format_magnitude(stats.total_volume),
                subtitle: "Across all exchanges".to_string(),
            },
            SummaryCard {
                title: "BTC Dominance",
                value: dominance_label(stats, "btc"),
                subtitle: "Share of total market cap".to_string(),
            },
        ]
    }

    pub fn render(&self) -> String {
        match &self.state {
            ViewState::Loading => skeleton(3),
            ViewState::Failed(message) => format!("{}\n", message),
            ViewState::Populated(_) | ViewState::Fallback(_) => self
                .cards()
                .iter()
                .map(|card| format!("{}\n  {}\n  {}\n", card.title, card.value, card.subtitle))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Market dominance bars
pub struct DominanceView {
    mount: Mount,
    state: ViewState<GlobalStats>,
}

impl Default for DominanceView {
    fn default() -> Self {
        Self::new()
    }
}

impl DominanceView {
    pub fn new() -> Self {
        Self {
            mount: Mount::new(),
            state: ViewState::Loading,
        }
    }

    pub fn state(&self) -> &ViewState<GlobalStats> {
        &self.state
    }

    pub async fn mount(&mut self, fetcher: &SnapshotFetcher) {
        mount_global(&self.mount, &mut self.state, fetcher, "dominance").await;
    }

    /// Reported shares followed by the remainder as "Others"
    pub fn shares(&self) -> Vec<(String, f64)> {
        let Some(stats) = self.state.data() else {
            return Vec::new();
        };

        let mut shares: Vec<(String, f64)> = stats
            .dominance
            .iter()
            .filter(|d| d.percentage.is_finite())
            .map(|d| (d.symbol.to_uppercase(), d.percentage))
            .collect();

        let reported: f64 = shares.iter().map(|(_, pct)| pct).sum();
        shares.push(("Others".to_string(), (100.0 - reported).max(0.0)));
        shares
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Market Dominance\n\n");
        match &self.state {
            ViewState::Loading => out.push_str(&skeleton(3)),
            ViewState::Failed(message) => {
                out.push_str(message);
                out.push('\n');
            }
            ViewState::Populated(_) | ViewState::Fallback(_) => {
                for (label, pct) in self.shares() {
                    let filled =
                        ((pct.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
                    out.push_str(&format!(
                        "{:<8}{}{} {:>6}\n",
                        label,
                        "█".repeat(filled),
                        "░".repeat(BAR_WIDTH - filled),
                        format_dominance(pct)
                    ));
                }
            }
        }
        out
    }
}
