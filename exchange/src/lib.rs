pub mod adapter;
pub mod parse;

pub use adapter::{AdapterError, Fetched};

use serde::{Deserialize, Serialize};

/// Default cap on how many entries a single response contributes to a chart.
pub const DEFAULT_MAX_POINTS: usize = 200;

/// One entry of a price history: the date (or date-time) label and its closing price.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub label: String,
    pub close: f64,
}

/// Labels and closing prices kept in lockstep.
///
/// Index `i` of [`Series::labels`] always belongs to index `i` of [`Series::closes`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    labels: Vec<String>,
    closes: Vec<f64>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, close: f64) {
        self.labels.push(label.into());
        self.closes.push(close);
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn get(&self, index: usize) -> Option<TimeSeriesPoint> {
        let label = self.labels.get(index)?;
        let close = self.closes.get(index)?;

        Some(TimeSeriesPoint {
            label: label.clone(),
            close: *close,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.closes.iter().copied())
    }

    /// Flips the order of both columns at once.
    ///
    /// Responses list the newest entry first, charts want the oldest first.
    pub fn reverse(&mut self) {
        self.labels.reverse();
        self.closes.reverse();
    }
}

/// Which price history the provider is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Function {
    #[default]
    Daily,
    Hourly,
}

impl Function {
    pub const ALL: [Function; 2] = [Function::Daily, Function::Hourly];

    pub fn query_params(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Function::Daily => &[("function", "TIME_SERIES_DAILY"), ("outputsize", "compact")],
            Function::Hourly => &[
                ("function", "TIME_SERIES_INTRADAY"),
                ("interval", "60min"),
                ("outputsize", "compact"),
            ],
        }
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Function::Daily => "Daily",
                Function::Hourly => "Hourly (60min)",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_keeps_labels_and_closes_paired() {
        let mut series = Series::new();
        series.push("2024-01-03", 3.0);
        series.push("2024-01-02", 2.0);
        series.push("2024-01-01", 1.0);

        series.reverse();

        let pairs: Vec<_> = series.iter().collect();
        assert_eq!(
            pairs,
            vec![("2024-01-01", 1.0), ("2024-01-02", 2.0), ("2024-01-03", 3.0)]
        );
        assert_eq!(series.labels().len(), series.closes().len());
    }

    #[test]
    fn get_out_of_range_is_none() {
        let mut series = Series::new();
        series.push("2024-01-01", 1.0);

        assert!(series.get(1).is_none());
        assert_eq!(series.get(0).map(|p| p.close), Some(1.0));
        assert!(Series::new().get(0).is_none());
    }
}
