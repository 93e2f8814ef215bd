//! Top gainers and top losers panels

use crate::{
    constants::{MOVERS_LIMIT, MOVERS_PAGE_SIZE},
    fetcher::SnapshotFetcher,
    providers::fallback,
    types::{MarketEntry, MarketSnapshot, MarketsQuery},
    view::{
        ranked_list::{sort_entries, SortDirection, SortField},
        row::MarketRow,
        skeleton,
        state::{Mount, ViewState},
    },
};

/// Which end of the 24h change distribution a panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoverKind {
    Gainers,
    Losers,
}

impl MoverKind {
    pub fn title(&self) -> &'static str {
        match self {
            MoverKind::Gainers => "Top Gainers (24h)",
            MoverKind::Losers => "Top Losers (24h)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MoverKind::Gainers => "Cryptocurrencies with highest price increase",
            MoverKind::Losers => "Cryptocurrencies with highest price decrease",
        }
    }

    fn fallback(&self) -> fn() -> MarketSnapshot {
        match self {
            MoverKind::Gainers => fallback::top_gainers,
            MoverKind::Losers => fallback::top_losers,
        }
    }
}

/// Entries with a strictly positive 24h change, largest first, at most `limit`
pub fn top_gainers(entries: &[MarketEntry], limit: usize) -> Vec<MarketEntry> {
    let rising: Vec<MarketEntry> = entries
        .iter()
        .filter(|e| e.price_change_percentage_24h > 0.0)
        .cloned()
        .collect();

    let mut sorted = sort_entries(&rising, SortField::Change24h, SortDirection::Descending);
    sorted.truncate(limit);
    sorted
}

/// Entries with a strictly negative 24h change, most negative first, at most `limit`
pub fn top_losers(entries: &[MarketEntry], limit: usize) -> Vec<MarketEntry> {
    let falling: Vec<MarketEntry> = entries
        .iter()
        .filter(|e| e.price_change_percentage_24h < 0.0)
        .cloned()
        .collect();

    let mut sorted = sort_entries(&falling, SortField::Change24h, SortDirection::Ascending);
    sorted.truncate(limit);
    sorted
}

/// A gainers or losers panel over a 100-coin listing
pub struct MoversView {
    kind: MoverKind,
    mount: Mount,
    query: MarketsQuery,
    state: ViewState<MarketSnapshot>,
}

impl MoversView {
    pub fn new(kind: MoverKind, vs_currency: &str) -> Self {
        Self {
            kind,
            mount: Mount::new(),
            query: MarketsQuery::top(vs_currency, MOVERS_PAGE_SIZE),
            state: ViewState::Loading,
        }
    }

    pub fn gainers(vs_currency: &str) -> Self {
        Self::new(MoverKind::Gainers, vs_currency)
    }

    pub fn losers(vs_currency: &str) -> Self {
        Self::new(MoverKind::Losers, vs_currency)
    }

    pub fn kind(&self) -> MoverKind {
        self.kind
    }

    pub fn state(&self) -> &ViewState<MarketSnapshot> {
        &self.state
    }

    pub async fn mount(&mut self, fetcher: &SnapshotFetcher) {
        if !self.state.is_loading() {
            return;
        }

        let outcome = fetcher.markets(&self.query, self.kind.fallback()).await;
        self.state.settle(outcome);

        tracing::debug!(
            mount_id = %self.mount.id,
            settle_ms = self.mount.elapsed_ms(),
            kind = ?self.kind,
            state = self.state.label(),
            "Movers panel mounted"
        );
    }

    /// The selected entries for this panel
    pub fn entries(&self) -> Vec<MarketEntry> {
        let Some(snapshot) = self.state.data() else {
            return Vec::new();
        };

        match self.kind {
            MoverKind::Gainers => top_gainers(snapshot.entries(), MOVERS_LIMIT),
            MoverKind::Losers => top_losers(snapshot.entries(), MOVERS_LIMIT),
        }
    }

    pub fn rows(&self) -> Vec<MarketRow> {
        self.entries().iter().map(MarketRow::from_entry).collect()
    }

    pub fn render(&self) -> String {
        let mut out = format!("{}\n{}\n\n", self.kind.title(), self.kind.description());

        match &self.state {
            ViewState::Loading => {
                out.push_str(&skeleton(MOVERS_LIMIT));
                return out;
            }
            ViewState::Failed(message) => {
                out.push_str(message);
                out.push('\n');
                return out;
            }
            ViewState::Populated(_) | ViewState::Fallback(_) => {}
        }

        for row in self.rows() {
            out.push_str(&format!(
                "{:<20} {:<6} {:>14} {:>10}\n",
                row.name,
                row.symbol,
                row.price,
                row.change.to_string()
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::{entry, MockSource};
    use crate::types::FailurePolicy;
    use std::sync::Arc;

    fn listing() -> Vec<MarketEntry> {
        vec![
            entry("a", 1, 1.0, 3.0),
            entry("b", 2, 1.0, -7.5),
            entry("c", 3, 1.0, 12.0),
            entry("d", 4, 1.0, 0.0),
            entry("e", 5, 1.0, 0.4),
            entry("f", 6, 1.0, -0.1),
            entry("g", 7, 1.0, 5.5),
            entry("h", 8, 1.0, 3.0),
            entry("i", 9, 1.0, 8.1),
            entry("j", 10, 1.0, -2.0),
        ]
    }

    #[test]
    fn test_gainers_are_positive_descending_and_capped() {
        let gainers = top_gainers(&listing(), 5);
        let ids: Vec<&str> = gainers.iter().map(|e| e.id.as_str()).collect();

        // Equal changes keep the reversed id order of a descending sort
        assert_eq!(ids, vec!["c", "i", "g", "h", "a"]);
        assert!(gainers.iter().all(|e| e.price_change_percentage_24h > 0.0));
    }

    #[test]
    fn test_losers_are_negative_ascending() {
        let losers = top_losers(&listing(), 5);
        let ids: Vec<&str> = losers.iter().map(|e| e.id.as_str()).collect();

        assert_eq!(ids, vec!["b", "j", "f"]);
        assert!(losers.iter().all(|e| e.price_change_percentage_24h < 0.0));
    }

    #[test]
    fn test_zero_change_is_neither() {
        let flat = vec![entry("x", 1, 1.0, 0.0)];
        assert!(top_gainers(&flat, 5).is_empty());
        assert!(top_losers(&flat, 5).is_empty());
    }

    #[tokio::test]
    async fn test_panels_over_live_listing() {
        let mock = Arc::new(MockSource::new());
        mock.set_entries(listing());
        let fetcher = SnapshotFetcher::new(mock, FailurePolicy::UseFallback);

        let mut gainers = MoversView::gainers("usd");
        let mut losers = MoversView::losers("usd");
        gainers.mount(&fetcher).await;
        losers.mount(&fetcher).await;

        assert_eq!(gainers.entries().len(), 5);
        assert_eq!(losers.entries().len(), 3);
        assert!(gainers.render().contains("Top Gainers (24h)"));
    }

    #[tokio::test]
    async fn test_panels_fall_back() {
        let mock = Arc::new(MockSource::new());
        mock.set_failing(true);
        let fetcher = SnapshotFetcher::new(mock, FailurePolicy::UseFallback);

        let mut losers = MoversView::losers("usd");
        losers.mount(&fetcher).await;

        assert!(matches!(losers.state(), ViewState::Fallback(_)));
        let rows = losers.rows();
        assert_eq!(rows[0].name, "Dogecoin");
        assert_eq!(rows[1].price, "$0.00001800");
        assert!(losers.render().contains("▼ 4.50%"));
    }

    #[tokio::test]
    async fn test_surfaced_failure_renders_message() {
        let mock = Arc::new(MockSource::new());
        mock.set_failing(true);
        let fetcher = SnapshotFetcher::new(mock, FailurePolicy::SurfaceError);

        let mut gainers = MoversView::gainers("usd");
        gainers.mount(&fetcher).await;

        assert!(gainers.entries().is_empty());
        assert!(gainers.render().contains("Failed to load market listing"));
    }
}
