//! Dashboard views
//!
//! Each view owns one mount: it fetches once through a `SnapshotFetcher`,
//! settles into a `ViewState`, and renders itself as plain text.

pub mod chart;
pub mod movers;
pub mod ranked_list;
pub mod row;
pub mod state;
pub mod stats;
pub mod trending;

pub use chart::{ChartView, SeriesKind};
pub use movers::{MoverKind, MoversView};
pub use ranked_list::{RankedListView, SortDirection, SortField};
pub use row::{ChangeIndicator, Direction, MarketRow, Tone};
pub use state::{Mount, ViewState};
pub use stats::{DominanceView, MarketStatsView, SummaryCards};
pub use trending::TrendingView;

/// Column alignment in a text table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Right,
}

/// Renders rows under a header and a rule, padding each column to its widest cell
pub(crate) fn text_table(headers: &[(String, Align)], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|(h, _)| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(headers.iter().zip(&widths))
            .map(|(cell, ((_, align), width))| match align {
                Align::Left => format!("{:<width$}", cell, width = *width),
                Align::Right => format!("{:>width$}", cell, width = *width),
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers.iter().map(|(h, _)| h.as_str()).collect()));
    out.push('\n');
    let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&"─".repeat(total));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

/// Placeholder block shown while a view is loading
pub(crate) fn skeleton(lines: usize) -> String {
    let mut out = String::from("Loading...\n");
    for _ in 0..lines {
        out.push_str("░░░░░░░░░░░░░░░░░░░░░░░░\n");
    }
    out
}
