pub mod axis;
pub mod geometry;

pub use geometry::{Geometry, HIT_TOLERANCE, Margins};

use exchange::{Series, TimeSeriesPoint};

/// What the chart shows.
///
/// Starts out [`ChartData::Empty`]; [`ChartData::set_series`] is the only way
/// out of it and always lands in [`ChartData::Populated`], even for an empty
/// series, which then draws the same "no data" message.
#[derive(Debug, Clone, Default)]
pub enum ChartData {
    #[default]
    Empty,
    Populated {
        symbol: String,
        series: Series,
        revision: u64,
    },
}

impl ChartData {
    /// Swaps the whole series in one step and bumps the revision so cached
    /// drawings get discarded.
    pub fn set_series(&mut self, symbol: impl Into<String>, series: Series) {
        let revision = self.revision().wrapping_add(1);

        *self = ChartData::Populated {
            symbol: symbol.into(),
            series,
            revision,
        };
    }

    pub fn series(&self) -> Option<&Series> {
        match self {
            ChartData::Empty => None,
            ChartData::Populated { series, .. } => Some(series),
        }
    }

    pub fn symbol(&self) -> Option<&str> {
        match self {
            ChartData::Empty => None,
            ChartData::Populated { symbol, .. } => Some(symbol),
        }
    }

    pub fn revision(&self) -> u64 {
        match self {
            ChartData::Empty => 0,
            ChartData::Populated { revision, .. } => *revision,
        }
    }

    /// True for both the initial state and an empty series.
    pub fn has_no_points(&self) -> bool {
        self.series().is_none_or(Series::is_empty)
    }
}

/// A point picked by clicking on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PointInfo {
    pub index: usize,
    pub date: String,
    pub price: f64,
}

impl PointInfo {
    pub fn new(index: usize, point: TimeSeriesPoint) -> Self {
        Self {
            index,
            date: point.label,
            price: point.close,
        }
    }

    pub fn price_text(&self) -> String {
        axis::format_currency(self.price)
    }
}

impl std::fmt::Display for PointInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.date, self.price_text())
    }
}
