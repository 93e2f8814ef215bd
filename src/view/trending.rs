//! Trending coins grid

use crate::{
    fetcher::SnapshotFetcher,
    types::TrendingEntry,
    view::{
        skeleton,
        state::{Mount, ViewState},
    },
};

pub struct TrendingView {
    mount: Mount,
    state: ViewState<Vec<TrendingEntry>>,
}

impl Default for TrendingView {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendingView {
    pub fn new() -> Self {
        Self {
            mount: Mount::new(),
            state: ViewState::Loading,
        }
    }

    pub fn state(&self) -> &ViewState<Vec<TrendingEntry>> {
        &self.state
    }

    pub async fn mount(&mut self, fetcher: &SnapshotFetcher) {
        if !self.state.is_loading() {
            return;
        }

        let outcome = fetcher.trending().await;
        self.state.settle(outcome);

        tracing::debug!(
            mount_id = %self.mount.id,
            settle_ms = self.mount.elapsed_ms(),
            state = self.state.label(),
            "Trending coins mounted"
        );
    }

    pub fn render(&self) -> String {
        let coins = match &self.state {
            ViewState::Loading => return skeleton(6),
            ViewState::Failed(message) => return format!("{}\n", message),
            ViewState::Populated(coins) | ViewState::Fallback(coins) => coins,
        };

        let mut out = String::new();
        for coin in coins {
            out.push_str(&format!(
                "{} ({})  [Trending]\n  Rank #{}  View -> {}\n\n",
                coin.name,
                coin.symbol,
                coin.rank_label(),
                coin.detail_path()
            ));
        }
        out
    }
}
