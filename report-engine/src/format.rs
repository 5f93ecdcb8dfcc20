//! FILENAME: report-engine/src/format.rs
//! PURPOSE: Shared display formatting (dates, decimals, ratios).
//! CONTEXT: Output is Spanish only: dd/mm/yyyy dates and comma decimals.

use chrono::NaiveDate;

/// Token shown for an unset filter.
pub const ALL_TOKEN: &str = "Todos";

/// Delimiter used when a multi-valued field is flattened to one cell.
pub const DEFAULT_DELIMITER: &str = ", ";

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Formats with a fixed number of decimals and a comma separator.
pub fn format_decimal(value: f64, decimal_places: usize) -> String {
    format!("{:.*}", decimal_places, value).replace('.', ",")
}

/// "66,7 %" style percentage. `value` is already scaled to 0-100.
pub fn format_percentage(value: f64) -> String {
    format!("{} %", format_decimal(value, 1))
}

/// `part / whole * 100`, or None when `whole` is zero.
pub fn percentage(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 * 100.0 / whole as f64)
    }
}

/// Arithmetic mean, or None for an empty set.
pub fn mean(sum: u64, count: u64) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

/// Rounds to two decimals for display and comparison in reports.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Cuts `text` to at most `max_chars` characters, marking the cut with "...".
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - 3).collect();
    out.push_str("...");
    out
}
