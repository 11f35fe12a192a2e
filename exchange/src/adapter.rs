pub mod alphavantage;

use crate::{Function, Series, parse};

#[derive(thiserror::Error, Debug)]
pub enum AdapterError {
    #[error("{0}")]
    FetchError(reqwest::Error),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Everything a worker hands back to the UI after one request.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub symbol: String,
    pub function: Function,
    /// Response body, or an `"Error fetching data: ..."` payload.
    pub raw: String,
    /// Chronological, oldest first.
    pub series: Series,
}

impl Fetched {
    pub fn is_transport_error(&self) -> bool {
        self.raw.starts_with(alphavantage::ERROR_PREFIX)
    }
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub symbol: String,
    pub api_key: String,
    pub function: Function,
    pub strategy: parse::Strategy,
    pub max_points: usize,
}

/// Network I/O, parsing and reordering, all off the UI thread.
pub async fn fetch_series(request: FetchRequest) -> Fetched {
    let FetchRequest {
        symbol,
        api_key,
        function,
        strategy,
        max_points,
    } = request;

    let raw = alphavantage::fetch_time_series(&symbol, &api_key, function).await;

    let mut series = parse::parse_with(strategy, &raw, max_points);
    series.reverse();

    log::debug!(
        "Parsed {} points for {symbol} ({function}, {strategy})",
        series.len()
    );

    Fetched {
        symbol,
        function,
        raw,
        series,
    }
}
