//! Synthetic market-cap charts
//!
//! No history endpoint backs these charts. Series are generated locally from
//! an injected `Rng`, one point per day, ending on the given date.

use crate::{
    constants::{
        CHART_POINTS, RANDOM_WALK_BASE, RANDOM_WALK_STEP, UNIFORM_BAND_BASE, UNIFORM_BAND_SPREAD,
    },
    format::{format_axis_date, format_magnitude},
    types::{Fetched, TimeSeriesPoint},
    view::{
        skeleton,
        state::{Mount, ViewState},
    },
};
use chrono::{NaiveDate, TimeDelta, Utc};
use rand::Rng;

/// Width reserved for y-axis labels
const Y_LABEL_WIDTH: usize = 10;

/// Spacing between labelled x ticks, in points
const X_TICK_EVERY: usize = 10;

/// How a chart's series is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Walk from 1.2e12 in steps of `(u - 0.5) * 5e10`
    RandomWalk,
    /// Independent draws in `[1e12, 1.5e12)`
    UniformBand,
}

impl SeriesKind {
    pub fn title(&self) -> &'static str {
        match self {
            SeriesKind::RandomWalk => "Global Market Cap",
            SeriesKind::UniformBand => "Market Overview",
        }
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, end: NaiveDate) -> Vec<TimeSeriesPoint> {
        match self {
            SeriesKind::RandomWalk => random_walk(rng, end),
            SeriesKind::UniformBand => uniform_band(rng, end),
        }
    }
}

fn day(end: NaiveDate, index: usize) -> NaiveDate {
    let back = (CHART_POINTS - 1 - index) as i64;
    end - TimeDelta::days(back)
}

/// 31 daily points; each step is applied before its point is emitted
pub fn random_walk<R: Rng + ?Sized>(rng: &mut R, end: NaiveDate) -> Vec<TimeSeriesPoint> {
    let mut value = RANDOM_WALK_BASE;
    (0..CHART_POINTS)
        .map(|i| {
            value += (rng.random::<f64>() - 0.5) * RANDOM_WALK_STEP;
            TimeSeriesPoint {
                date: day(end, i),
                value,
            }
        })
        .collect()
}

pub fn uniform_band<R: Rng + ?Sized>(rng: &mut R, end: NaiveDate) -> Vec<TimeSeriesPoint> {
    (0..CHART_POINTS)
        .map(|i| TimeSeriesPoint {
            date: day(end, i),
            value: UNIFORM_BAND_BASE + rng.random::<f64>() * UNIFORM_BAND_SPREAD,
        })
        .collect()
}

/// A filled area chart over a synthetic series
pub struct ChartView {
    kind: SeriesKind,
    mount: Mount,
    state: ViewState<Vec<TimeSeriesPoint>>,
}

impl ChartView {
    pub fn new(kind: SeriesKind) -> Self {
        Self {
            kind,
            mount: Mount::new(),
            state: ViewState::Loading,
        }
    }

    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn state(&self) -> &ViewState<Vec<TimeSeriesPoint>> {
        &self.state
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        self.state.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Generates the series ending today with the thread-local RNG
    pub fn mount(&mut self) {
        let today = Utc::now().date_naive();
        self.mount_with(&mut rand::rng(), today);
    }

    pub fn mount_with<R: Rng + ?Sized>(&mut self, rng: &mut R, end: NaiveDate) {
        if !self.state.is_loading() {
            return;
        }

        let series = self.kind.generate(rng, end);
        self.state.settle(Ok(Fetched::live(series)));

        tracing::debug!(
            mount_id = %self.mount.id,
            settle_ms = self.mount.elapsed_ms(),
            kind = ?self.kind,
            points = self.points().len(),
            "Chart mounted"
        );
    }

    /// Labelled x ticks as (point index, label)
    pub fn x_ticks(&self) -> Vec<(usize, String)> {
        self.points()
            .iter()
            .enumerate()
            .filter(|(i, _)| i % X_TICK_EVERY == 0)
            .map(|(i, p)| (i, format_axis_date(p.date)))
            .collect()
    }

    /// `count` evenly spaced y labels from the series minimum to its maximum
    pub fn y_ticks(&self, count: usize) -> Vec<String> {
        let Some((min, max)) = self.bounds() else {
            return Vec::new();
        };
        if count < 2 {
            return vec![format_magnitude(max)];
        }

        (0..count)
            .map(|i| min + (max - min) * i as f64 / (count - 1) as f64)
            .map(format_magnitude)
            .collect()
    }

    fn bounds(&self) -> Option<(f64, f64)> {
        let points = self.points();
        if points.is_empty() {
            return None;
        }
        let min = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
        let max = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    /// Draws the area chart `height` rows tall
    pub fn render(&self, height: usize) -> String {
        let mut out = format!("{}\n\n", self.kind.title());
        let Some((min, max)) = self.bounds() else {
            out.push_str(&skeleton(height));
            return out;
        };

        let height = height.max(1);
        let span = max - min;
        let levels: Vec<usize> = self
            .points()
            .iter()
            .map(|p| {
                if span <= 0.0 {
                    height
                } else {
                    1 + (((p.value - min) / span) * (height - 1) as f64).round() as usize
                }
            })
            .collect();

        for row in (1..=height).rev() {
            let label = if row == height {
                format_magnitude(max)
            } else if row == 1 {
                format_magnitude(min)
            } else {
                String::new()
            };
            let cells: String = levels
                .iter()
                .map(|&level| if level >= row { '█' } else { ' ' })
                .collect();
            out.push_str(&format!("{:>width$} │{}\n", label, cells, width = Y_LABEL_WIDTH));
        }

        out.push_str(&format!(
            "{:>width$} └{}\n",
            "",
            "─".repeat(levels.len()),
            width = Y_LABEL_WIDTH
        ));
        out.push_str(&format!(
            "{:>width$}  {}\n",
            "",
            self.x_axis_line(),
            width = Y_LABEL_WIDTH
        ));
        out
    }

    fn x_axis_line(&self) -> String {
        let mut line = String::new();
        for (index, label) in self.x_ticks() {
            let column = line.chars().count();
            if index > column {
                line.push_str(&" ".repeat(index - column));
            } else if column > 0 {
                line.push(' ');
            }
            line.push_str(&label);
        }
        line
    }
}
