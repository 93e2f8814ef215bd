//! Presentation model of one market entry

use crate::{
    format::{format_magnitude, format_percent, format_price},
    types::MarketEntry,
};
use serde::Serialize;

/// Direction of a 24h change; zero counts as down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// Color a change is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Emerald,
    Red,
}

/// Glyph, color and unsigned percentage describing a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeIndicator {
    pub direction: Direction,
    pub tone: Tone,
    pub glyph: char,
    pub text: String,
}

impl ChangeIndicator {
    pub fn from_change(change: f64) -> Self {
        let (direction, tone, glyph) = if change > 0.0 {
            (Direction::Up, Tone::Emerald, '▲')
        } else {
            (Direction::Down, Tone::Red, '▼')
        };

        Self {
            direction,
            tone,
            glyph,
            text: format_percent(change),
        }
    }
}

impl std::fmt::Display for ChangeIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.glyph, self.text)
    }
}

/// One rendered row of a ranked list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketRow {
    pub rank: u32,
    pub name: String,
    pub symbol: String,
    pub image: String,
    pub link: String,
    pub price: String,
    pub change: ChangeIndicator,
    pub market_cap: String,
    pub volume: String,
}

impl MarketRow {
    pub fn from_entry(entry: &MarketEntry) -> Self {
        Self {
            rank: entry.market_cap_rank,
            name: entry.name.clone(),
            symbol: entry.display_symbol(),
            image: entry.image.clone(),
            link: entry.detail_path(),
            price: format_price(entry.current_price),
            change: ChangeIndicator::from_change(entry.price_change_percentage_24h),
            market_cap: format_magnitude(entry.market_cap),
            volume: format_magnitude(entry.total_volume),
        }
    }
}
