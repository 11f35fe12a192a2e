//! Extraction of closing-price histories from raw provider responses.
//!
//! The default [`Strategy::Lines`] scanner works on the pretty-printed text one
//! line at a time and never builds a document tree. It is a heuristic: it relies
//! on the provider emitting one key per line, and minified responses are not
//! recognized. [`Strategy::Structural`] is the opt-in alternative that parses the
//! whole document first and applies the same key rules to the tree.
//!
//! Both strategies return entries in document order, which for the provider is
//! newest first. Reversing into chronological order is the caller's job.

use crate::Series;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Block markers, tried in this order.
const MARKERS: [&str; 3] = [
    "\"Time Series (Daily)\"",
    "\"Time Series (60min)\"",
    "\"Time Series",
];

const CLOSE_FIELD: &str = "\"4. close\"";
const CLOSE_KEY: &str = "4. close";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strategy {
    #[default]
    Lines,
    Structural,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Lines, Strategy::Structural];
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Lines => write!(f, "Line scan"),
            Strategy::Structural => write!(f, "Structural"),
        }
    }
}

pub fn parse_with(strategy: Strategy, raw: &str, max_points: usize) -> Series {
    match strategy {
        Strategy::Lines => parse(raw, max_points),
        Strategy::Structural => parse_structural(raw, max_points),
    }
}

/// Line-scan extraction of `(date, close)` pairs.
///
/// Never fails: anything that is not recognized yields an empty [`Series`].
pub fn parse(raw: &str, max_points: usize) -> Series {
    let mut series = Series::new();

    if max_points == 0 {
        return series;
    }

    let Some(marker) = MARKERS.into_iter().find(|m| raw.contains(m)) else {
        log::debug!("No time series marker in response ({} bytes)", raw.len());
        return series;
    };

    let mut lines = raw.lines().map(str::trim);

    if !lines.by_ref().any(|line| line.starts_with(marker)) {
        log::debug!("Marker {marker} never starts a line, nothing to scan");
        return series;
    }

    while let Some(line) = lines.next() {
        if line == "}" || line.starts_with("}\"") {
            break;
        }

        let Some(date) = date_key(line) else {
            continue;
        };

        // Compact entries carry their fields on the key line itself.
        let close_line = match line.find(CLOSE_FIELD) {
            Some(at) => Some(&line[at..]),
            None => lines.by_ref().find(|l| l.starts_with(CLOSE_FIELD)),
        };

        let Some(close_line) = close_line else {
            log::debug!("No close field after {date}, input exhausted");
            break;
        };

        match close_value(close_line) {
            Some(close) => series.push(date, close),
            None => {
                log::debug!("Skipping {date}: unusable close field {close_line:?}");
                continue;
            }
        }

        if series.len() >= max_points {
            break;
        }
    }

    series
}

/// Tree-based extraction with the same marker, date-key and close-field rules.
pub fn parse_structural(raw: &str, max_points: usize) -> Series {
    let mut series = Series::new();

    if max_points == 0 {
        return series;
    }

    let root = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(root)) => root,
        Ok(_) => return series,
        Err(e) => {
            log::debug!("Response is not a JSON document: {e}");
            return series;
        }
    };

    let block = MARKERS.iter().find_map(|marker| {
        let name = marker.trim_matches('"');
        root.iter()
            .find(|(key, _)| {
                if marker.ends_with('"') {
                    key.as_str() == name
                } else {
                    key.starts_with(name)
                }
            })
            .map(|(_, value)| value)
    });

    let Some(Value::Object(entries)) = block else {
        log::debug!("No time series block in document");
        return series;
    };

    for (key, entry) in entries {
        if !is_date_key(key) {
            continue;
        }

        let close = match entry.get(CLOSE_KEY) {
            Some(Value::String(s)) => parse_price(s),
            Some(Value::Number(n)) => n.as_f64().filter(|v| is_price(*v)),
            _ => None,
        };

        let Some(close) = close else {
            log::debug!("Skipping {key}: missing or unusable close field");
            continue;
        };

        series.push(key.as_str(), close);

        if series.len() >= max_points {
            break;
        }
    }

    series
}

/// The quoted token at the start of `line`, if it looks like a date.
fn date_key(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('"')?;
    let end = rest.find('"')?;
    let key = &rest[..end];

    is_date_key(key).then_some(key)
}

fn is_date_key(key: &str) -> bool {
    key.as_bytes()
        .get(..4)
        .is_some_and(|year| year.iter().all(u8::is_ascii_digit))
}

fn close_value(line: &str) -> Option<f64> {
    let (_, value) = line.split_once(':')?;
    let value = value.split('}').next().unwrap_or_default();
    let cleaned: String = value.chars().filter(|c| !matches!(c, '"' | ',')).collect();

    parse_price(&cleaned)
}

fn parse_price(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| is_price(*v))
}

fn is_price(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAILY: &str = r#"{
    "Meta Data": {
        "1. Information": "Daily Prices (open, high, low, close) and Volumes",
        "2. Symbol": "IBM",
        "3. Last Refreshed": "2025-12-19",
        "4. Output Size": "Compact",
        "5. Time Zone": "US/Eastern"
    },
    "Time Series (Daily)": {
        "2025-12-19": {
            "1. open": "300.1000",
            "2. high": "305.0000",
            "3. low": "299.5000",
            "4. close": "304.2500",
            "5. volume": "4211000"
        },
        "2025-12-18": {
            "1. open": "298.0000",
            "2. high": "301.0000",
            "3. low": "297.2000",
            "4. close": "300.0000",
            "5. volume": "3810000"
        },
        "2025-12-17": {
            "1. open": "295.0000",
            "2. high": "298.9000",
            "3. low": "294.1000",
            "4. close": "297.7500",
            "5. volume": "3507000"
        }
    }
}"#;

    fn pairs(series: &Series) -> Vec<(String, f64)> {
        series.iter().map(|(l, c)| (l.to_string(), c)).collect()
    }

    #[test]
    fn pretty_printed_daily_response() {
        let mut series = parse(DAILY, 200);

        assert_eq!(
            pairs(&series),
            vec![
                ("2025-12-19".to_string(), 304.25),
                ("2025-12-18".to_string(), 300.0),
                ("2025-12-17".to_string(), 297.75),
            ]
        );

        series.reverse();
        assert_eq!(series.labels()[0], "2025-12-17");
        assert_eq!(series.closes(), &[297.75, 300.0, 304.25]);
    }

    #[test]
    fn compact_entries_on_one_line() {
        let raw = "\"Time Series (Daily)\"\n  \"2024-01-02\": { \"1. open\": \"10\", \"4. close\": \"10.50\" }\n  \"2024-01-01\": { \"1. open\": \"9\", \"4. close\": \"9.75\" }\n}\n";

        let mut series = parse(raw, 200);
        assert_eq!(
            pairs(&series),
            vec![
                ("2024-01-02".to_string(), 10.50),
                ("2024-01-01".to_string(), 9.75),
            ]
        );

        series.reverse();
        assert_eq!(
            pairs(&series),
            vec![
                ("2024-01-01".to_string(), 9.75),
                ("2024-01-02".to_string(), 10.50),
            ]
        );
    }

    #[test]
    fn max_points_keeps_first_entries_in_document_order() {
        let series = parse(DAILY, 2);

        assert_eq!(series.len(), 2);
        assert_eq!(series.labels(), &["2025-12-19", "2025-12-18"]);

        assert!(parse(DAILY, 0).is_empty());
    }

    #[test]
    fn field_lines_are_never_dates() {
        let raw = "\"Time Series (Daily)\": {\n\"1. open\": \"123.45\",\n\"4. close\": \"123.45\",\n\"abc\": \"1\",\n\"12\": \"1\"\n}";

        assert!(parse(raw, 200).is_empty());
    }

    #[test]
    fn closing_brace_ends_the_block() {
        let raw = "\"Time Series (Daily)\": {\n\"2024-01-02\": {\n\"4. close\": \"10.50\"\n},\n\"2024-01-01\": {\n\"4. close\": \"9.75\"\n}\n}\n\"Time Series (Weekly)\": {\n\"2023-12-29\": {\n\"4. close\": \"8.00\"\n}\n}";

        let series = parse(raw, 200);
        assert_eq!(
            pairs(&series),
            vec![
                ("2024-01-02".to_string(), 10.50),
                ("2024-01-01".to_string(), 9.75),
            ]
        );
    }

    #[test]
    fn brace_followed_by_key_ends_the_block() {
        let raw = "\"Time Series (Daily)\": {\n\"2024-01-02\": {\n\"4. close\": \"10.50\"\n},\n}\"Weekly\": {\n\"2023-12-29\": {\n\"4. close\": \"8.00\"\n}\n}";

        assert_eq!(parse(raw, 200).labels(), &["2024-01-02"]);
    }

    #[test]
    fn garbage_and_empty_input() {
        assert!(parse("", 200).is_empty());
        assert!(parse("   \n\t  ", 200).is_empty());
        assert!(parse("not json at all", 200).is_empty());
        assert!(parse("Error fetching data: connection refused", 200).is_empty());
    }

    #[test]
    fn minified_input_is_not_recognized() {
        let raw = r#"{"Time Series (Daily)":{"2024-01-02":{"4. close":"10.50"}}}"#;

        assert!(parse(raw, 200).is_empty());
        assert_eq!(parse_structural(raw, 200).closes(), &[10.50]);
    }

    #[test]
    fn bad_close_values_are_skipped() {
        let raw = "\"Time Series (Daily)\": {\n\"2024-01-03\": {\n\"4. close\": \"n/a\",\n},\n\"2024-01-02\": {\n\"4. close\": \"-4.0\",\n},\n\"2024-01-01\": {\n\"4. close\": \"9.75\",\n}\n}";

        let series = parse(raw, 200);
        assert_eq!(pairs(&series), vec![("2024-01-01".to_string(), 9.75)]);
    }

    #[test]
    fn missing_close_line_ends_scan_without_panicking() {
        let raw = "\"Time Series (Daily)\": {\n\"2024-01-02\": {\n\"1. open\": \"10\"";

        assert!(parse(raw, 200).is_empty());
    }

    #[test]
    fn hourly_marker_and_datetime_keys() {
        let raw = "{\n\"Time Series (60min)\": {\n\"2025-12-19 16:00:00\": {\n\"4. close\": \"12.5\"\n},\n\"2025-12-19 15:00:00\": {\n\"4. close\": \"12.0\"\n}\n}\n}";

        let series = parse(raw, 200);
        assert_eq!(series.labels(), &["2025-12-19 16:00:00", "2025-12-19 15:00:00"]);
    }

    #[test]
    fn generic_marker_is_the_last_resort() {
        let raw = "{\n\"Time Series (5min)\": {\n\"2025-12-19 16:00:00\": {\n\"4. close\": \"1.25\"\n}\n}\n}";

        assert_eq!(parse(raw, 200).closes(), &[1.25]);
    }

    #[test]
    fn structural_matches_line_scan_on_pretty_input() {
        assert_eq!(parse_structural(DAILY, 200), parse(DAILY, 200));
        assert_eq!(parse_structural(DAILY, 1).labels(), &["2025-12-19"]);
    }

    #[test]
    fn structural_rejects_non_documents() {
        assert!(parse_structural("", 200).is_empty());
        assert!(parse_structural("not json at all", 200).is_empty());
        assert!(parse_structural("[1, 2, 3]", 200).is_empty());
        assert!(parse_structural(r#"{"Note": "rate limited"}"#, 200).is_empty());
    }

    #[test]
    fn short_keys_do_not_panic() {
        assert!(!is_date_key(""));
        assert!(!is_date_key("202"));
        assert!(is_date_key("2024"));
        assert_eq!(date_key("\"\""), None);
        assert_eq!(date_key("\"20"), None);
    }
}
