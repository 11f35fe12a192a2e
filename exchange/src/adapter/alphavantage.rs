use super::AdapterError;
use crate::Function;

use reqwest::Url;

use std::time::Duration;

const API_DOMAIN: &str = "https://www.alphavantage.co/query";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Prefix of the payload returned in place of a body when the transport fails.
pub const ERROR_PREFIX: &str = "Error fetching data: ";

pub fn query_url(symbol: &str, api_key: &str, function: Function) -> Result<Url, AdapterError> {
    let mut params: Vec<(&str, &str)> = function.query_params().to_vec();
    params.push(("symbol", symbol));
    params.push(("apikey", api_key));

    Url::parse_with_params(API_DOMAIN, params)
        .map_err(|e| AdapterError::InvalidRequest(e.to_string()))
}

/// Raw response text for `symbol`.
///
/// Transport failures do not surface as errors: the returned text starts with
/// [`ERROR_PREFIX`] instead, which no parser recognizes as a series.
pub async fn fetch_time_series(symbol: &str, api_key: &str, function: Function) -> String {
    match try_fetch(symbol, api_key, function).await {
        Ok(body) => body,
        Err(e) => {
            log::warn!("Fetching {symbol} failed: {e}");
            error_payload(&e)
        }
    }
}

pub fn error_payload(err: &AdapterError) -> String {
    format!("{ERROR_PREFIX}{err}")
}

async fn try_fetch(
    symbol: &str,
    api_key: &str,
    function: Function,
) -> Result<String, AdapterError> {
    let url = query_url(symbol, api_key, function)?;

    // reqwest errors echo the request URL, which carries the key
    let hide_url = |e: reqwest::Error| AdapterError::FetchError(e.without_url());

    let client = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(hide_url)?;

    let response = client.get(url).send().await.map_err(hide_url)?;

    let status = response.status();
    if !status.is_success() {
        log::warn!("{symbol}: provider answered {status}");
    }

    response.text().await.map_err(hide_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn daily_query_encodes_symbol_and_key() {
        let url = query_url("BRK.B & co", "k/e y", Function::Daily).unwrap();

        assert_eq!(param(&url, "function").as_deref(), Some("TIME_SERIES_DAILY"));
        assert_eq!(param(&url, "outputsize").as_deref(), Some("compact"));
        assert_eq!(param(&url, "symbol").as_deref(), Some("BRK.B & co"));
        assert_eq!(param(&url, "apikey").as_deref(), Some("k/e y"));
        assert!(!url.as_str().contains("BRK.B & co"));
    }

    #[test]
    fn hourly_query_requests_sixty_minute_bars() {
        let url = query_url("IBM", "demo", Function::Hourly).unwrap();

        assert_eq!(
            param(&url, "function").as_deref(),
            Some("TIME_SERIES_INTRADAY")
        );
        assert_eq!(param(&url, "interval").as_deref(), Some("60min"));
    }

    #[test]
    fn error_payload_is_prefixed() {
        let err = AdapterError::InvalidRequest("bad url".to_string());

        assert_eq!(
            error_payload(&err),
            "Error fetching data: Invalid request: bad url"
        );
        assert!(crate::parse::parse(&error_payload(&err), 200).is_empty());
    }
}
