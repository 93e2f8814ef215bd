//! Sortable, searchable market list
//!
//! The stored snapshot is never reordered. `derived_order` builds a fresh,
//! sorted copy from provider order every time it is called.

use crate::{
    constants::{TABLE_PAGE_SIZE, TOP_LIST_PAGE_SIZE},
    fetcher::SnapshotFetcher,
    providers::fallback,
    types::{MarketEntry, MarketSnapshot, MarketsQuery},
    view::{
        row::MarketRow,
        skeleton,
        state::{Mount, ViewState},
        text_table, Align,
    },
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Field a ranked list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Rank,
    Name,
    Price,
    Change24h,
    MarketCap,
    Volume,
}

impl SortField {
    pub fn all() -> &'static [SortField] {
        &[
            SortField::Rank,
            SortField::Name,
            SortField::Price,
            SortField::Change24h,
            SortField::MarketCap,
            SortField::Volume,
        ]
    }

    /// Column header
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Rank => "#",
            SortField::Name => "Name",
            SortField::Price => "Price",
            SortField::Change24h => "24h %",
            SortField::MarketCap => "Market Cap",
            SortField::Volume => "Volume (24h)",
        }
    }

    /// Compares two entries on this field alone, ascending
    pub fn compare(&self, a: &MarketEntry, b: &MarketEntry) -> Ordering {
        match self {
            SortField::Rank => a.market_cap_rank.cmp(&b.market_cap_rank),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Price => a.current_price.total_cmp(&b.current_price),
            SortField::Change24h => a
                .price_change_percentage_24h
                .total_cmp(&b.price_change_percentage_24h),
            SortField::MarketCap => a.market_cap.total_cmp(&b.market_cap),
            SortField::Volume => a.total_volume.total_cmp(&b.total_volume),
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rank" | "market_cap_rank" | "#" => Ok(SortField::Rank),
            "name" => Ok(SortField::Name),
            "price" | "current_price" => Ok(SortField::Price),
            "change" | "24h" | "price_change_percentage_24h" => Ok(SortField::Change24h),
            "market_cap" | "market-cap" | "cap" => Ok(SortField::MarketCap),
            "volume" | "total_volume" => Ok(SortField::Volume),
            other => Err(format!("unknown sort field '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn marker(self) -> char {
        match self {
            SortDirection::Ascending => '↑',
            SortDirection::Descending => '↓',
        }
    }
}

/// Total order over entries: the field first, then `id` ascending
///
/// Descending reverses the whole comparison, so a descending sort is the exact
/// reverse of the ascending one.
pub fn compare_entries(
    a: &MarketEntry,
    b: &MarketEntry,
    field: SortField,
    direction: SortDirection,
) -> Ordering {
    let ordering = field.compare(a, b).then_with(|| a.id.cmp(&b.id));
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Returns a sorted copy of `entries`
pub fn sort_entries(
    entries: &[MarketEntry],
    field: SortField,
    direction: SortDirection,
) -> Vec<MarketEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| compare_entries(a, b, field, direction));
    sorted
}

/// A market listing that can be re-sorted and searched
pub struct RankedListView {
    mount: Mount,
    query: MarketsQuery,
    fallback: fn() -> MarketSnapshot,
    state: ViewState<MarketSnapshot>,
    sort_field: SortField,
    sort_direction: SortDirection,
    search: Option<String>,
}

impl RankedListView {
    /// Creates an unmounted view, sorted by rank ascending
    pub fn new(query: MarketsQuery, fallback: fn() -> MarketSnapshot) -> Self {
        Self {
            mount: Mount::new(),
            query,
            fallback,
            state: ViewState::Loading,
            sort_field: SortField::Rank,
            sort_direction: SortDirection::Ascending,
            search: None,
        }
    }

    /// The cryptocurrencies page table (50 coins)
    pub fn table(vs_currency: &str) -> Self {
        Self::new(
            MarketsQuery::top(vs_currency, TABLE_PAGE_SIZE),
            fallback::crypto_table,
        )
    }

    /// The dashboard's top cryptocurrencies list (10 coins)
    pub fn top_list(vs_currency: &str) -> Self {
        Self::new(
            MarketsQuery::top(vs_currency, TOP_LIST_PAGE_SIZE),
            fallback::top_cryptos,
        )
    }

    /// Fetches the snapshot for this mount
    ///
    /// Does nothing if the view has already settled; use `remount` to refetch.
    pub async fn mount(&mut self, fetcher: &SnapshotFetcher) {
        if !self.state.is_loading() {
            tracing::debug!(mount_id = %self.mount.id, "Ranked list already settled");
            return;
        }

        let outcome = fetcher.markets(&self.query, self.fallback).await;
        self.state.settle(outcome);

        tracing::debug!(
            mount_id = %self.mount.id,
            settle_ms = self.mount.elapsed_ms(),
            state = self.state.label(),
            entries = self.state.data().map(|s| s.len()).unwrap_or(0),
            "Ranked list mounted"
        );
    }

    /// Discards the snapshot and fetches a new one under a fresh mount
    pub async fn remount(&mut self, fetcher: &SnapshotFetcher) {
        self.mount = Mount::new();
        self.state = ViewState::Loading;
        self.mount(fetcher).await;
    }

    /// Selects a sort column
    ///
    /// Choosing the active column flips the direction; choosing another column
    /// switches to it in ascending order.
    pub fn set_sort(&mut self, field: SortField) {
        if field == self.sort_field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Ascending;
        }
    }

    /// Filters rows to names or symbols containing `query`, case-insensitively
    ///
    /// A blank query clears the filter.
    pub fn set_search(&mut self, query: &str) {
        let trimmed = query.trim();
        self.search = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        };
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn state(&self) -> &ViewState<MarketSnapshot> {
        &self.state
    }

    pub fn mount_info(&self) -> Mount {
        self.mount
    }

    fn matches_search(&self, entry: &MarketEntry) -> bool {
        match &self.search {
            None => true,
            Some(needle) => {
                entry.name.to_lowercase().contains(needle)
                    || entry.symbol.to_lowercase().contains(needle)
            }
        }
    }

    /// Entries after search filtering, in the active sort order
    pub fn derived_order(&self) -> Vec<MarketEntry> {
        let Some(snapshot) = self.state.data() else {
            return Vec::new();
        };

        let visible: Vec<MarketEntry> = snapshot
            .entries()
            .iter()
            .filter(|entry| self.matches_search(entry))
            .cloned()
            .collect();

        sort_entries(&visible, self.sort_field, self.sort_direction)
    }

    pub fn rows(&self) -> Vec<MarketRow> {
        self.derived_order()
            .iter()
            .map(MarketRow::from_entry)
            .collect()
    }

    fn header(&self, field: SortField) -> String {
        if field == self.sort_field {
            format!("{} {}", field.label(), self.sort_direction.marker())
        } else {
            field.label().to_string()
        }
    }

    /// Renders the sortable table
    pub fn render_table(&self) -> String {
        match &self.state {
            ViewState::Loading => return skeleton(10),
            ViewState::Failed(message) => return format!("{}\n", message),
            ViewState::Populated(_) | ViewState::Fallback(_) => {}
        }

        let headers: Vec<(String, Align)> = SortField::all()
            .iter()
            .map(|field| {
                let align = match field {
                    SortField::Rank | SortField::Name => Align::Left,
                    _ => Align::Right,
                };
                (self.header(*field), align)
            })
            .collect();

        let rows: Vec<Vec<String>> = self
            .rows()
            .into_iter()
            .map(|row| {
                vec![
                    row.rank.to_string(),
                    format!("{} {}", row.name, row.symbol),
                    row.price,
                    row.change.to_string(),
                    row.market_cap,
                    row.volume,
                ]
            })
            .collect();

        if rows.is_empty() {
            return "No cryptocurrencies match the search.\n".to_string();
        }

        text_table(&headers, &rows)
    }

    /// Renders the card list used on the dashboard
    pub fn render_cards(&self) -> String {
        match &self.state {
            ViewState::Loading => return skeleton(5),
            ViewState::Failed(message) => return format!("{}\n", message),
            ViewState::Populated(_) | ViewState::Fallback(_) => {}
        }

        let mut out = String::new();
        for row in self.rows() {
            out.push_str(&format!(
                "{} ({})  {}  {}\n  Market Cap: {}  View -> {}\n\n",
                row.name, row.symbol, row.price, row.change, row.market_cap, row.link
            ));
        }
        out.push_str("[ View All Cryptocurrencies ]  /cryptocurrencies\n");
        out
    }
}
