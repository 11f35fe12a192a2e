use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use std::sync::LazyLock;

/// Upper bound on time-axis labels, keeps them from overlapping.
pub const MAX_TIME_LABELS: usize = 6;

static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));
static DATE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2} ").expect("valid date-time pattern"));

/// Evenly spaced indices over `[0, len - 1]`, at most `max_labels` of them.
pub fn label_indices(len: usize, max_labels: usize) -> Vec<usize> {
    let count = max_labels.min(len);
    let last = len.saturating_sub(1);

    match count {
        0 => vec![],
        1 => vec![0],
        _ => (0..count)
            .map(|i| {
                let idx = (i as f64 / (count - 1) as f64 * last as f64).round() as usize;
                idx.min(last)
            })
            .collect(),
    }
}

/// Short label for the time axis.
///
/// Dates show their month, date-times show month and day. Anything else keeps
/// its last five characters. Never fails, worst case the input comes back.
pub fn format_time_label(label: &str) -> String {
    if DATE.is_match(label) {
        return NaiveDate::parse_from_str(label, "%Y-%m-%d")
            .map(|d| d.format("%b").to_string())
            .unwrap_or_else(|_| label.to_string());
    }

    if DATE_TIME.is_match(label) {
        return NaiveDateTime::parse_from_str(label, "%Y-%m-%d %H:%M:%S")
            .map(|dt| dt.format("%b %-d").to_string())
            .unwrap_or_else(|_| label.to_string());
    }

    let len = label.chars().count();
    if len >= 5 {
        label.chars().skip(len - 5).collect()
    } else {
        label.to_string()
    }
}

pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}

/// Price as shown in the point inspector.
pub fn format_currency(value: f64) -> String {
    format!("${value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_cover_both_ends() {
        assert_eq!(label_indices(100, 6), vec![0, 20, 40, 59, 79, 99]);
        assert_eq!(label_indices(3, 6), vec![0, 1, 2]);
        assert_eq!(label_indices(10, 2), vec![0, 9]);
    }

    #[test]
    fn degenerate_label_counts() {
        assert!(label_indices(0, 6).is_empty());
        assert_eq!(label_indices(1, 6), vec![0]);
        assert_eq!(label_indices(50, 1), vec![0]);
        assert!(label_indices(50, 0).is_empty());
    }

    #[test]
    fn daily_labels_show_the_month() {
        assert_eq!(format_time_label("2025-12-19"), "Dec");
        assert_eq!(format_time_label("2024-01-02"), "Jan");
    }

    #[test]
    fn intraday_labels_show_month_and_day() {
        assert_eq!(format_time_label("2025-12-19 16:00:00"), "Dec 19");
        assert_eq!(format_time_label("2025-03-05 09:30:00"), "Mar 5");
    }

    #[test]
    fn unparseable_shapes_fall_back_to_raw() {
        assert_eq!(format_time_label("2025-13-45"), "2025-13-45");
        assert_eq!(format_time_label("2025-12-19 late"), "2025-12-19 late");
    }

    #[test]
    fn other_labels_keep_their_tail() {
        assert_eq!(format_time_label("week 2025-51"), "25-51");
        assert_eq!(format_time_label("Q4"), "Q4");
        assert_eq!(format_time_label(""), "");
        assert_eq!(format_time_label("día é"), "día é");
    }

    #[test]
    fn prices_have_two_decimals() {
        assert_eq!(format_price(304.25), "304.25");
        assert_eq!(format_currency(9.756), "$9.76");
        assert_eq!(format_currency(10.0), "$10.00");
    }
}
