//! Formatting utilities for consistent display across the application
//!
//! Provides functions for formatting byte sizes, server timestamps,
//! opaque tokens and other values for user display.

use crate::constants::TOKEN_PREVIEW_LEN;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

const K: u64 = 1024;
const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a file size into a human-readable string
///
/// Binary multiples, at most two decimals, trailing zeros dropped. Sizes
/// past the GB range stay in GB.
///
/// # Examples
///
/// ```
/// use cloudsim_pilot_core::formatting::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 B");
/// assert_eq!(format_file_size(1024), "1 KB");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// assert_eq!(format_file_size(1_048_576), "1 MB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut index = 0;
    let mut divisor = 1u64;
    while index < UNITS.len() - 1 && bytes / divisor >= K {
        divisor *= K;
        index += 1;
    }

    let value = (bytes as f64 / divisor as f64 * 100.0).round() / 100.0;
    format!("{} {}", value, UNITS[index])
}

/// Format a signed size, showing negatives as "0 B"
pub fn format_file_size_signed(bytes: i64) -> String {
    if bytes < 0 {
        "0 B".to_string()
    } else {
        format_file_size(bytes as u64)
    }
}

/// Format a server timestamp in local time
///
/// Accepts RFC 3339 or a naive `YYYY-MM-DDTHH:MM:SS[.f]` (taken as local
/// time). Anything else is returned as-is.
pub fn format_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(local) => local.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => raw.to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// Shorten an opaque token (digest, receipt handle) for display
///
/// # Examples
///
/// ```
/// use cloudsim_pilot_core::formatting::short_token;
///
/// assert_eq!(short_token("9e107d9d372bb6826bd81d3542a419d6"), "9e107d9d...");
/// ```
pub fn short_token(token: &str) -> String {
    let head: String = token.chars().take(TOKEN_PREVIEW_LEN).collect();
    format!("{}...", head)
}

/// Truncate a string to a maximum length with ellipsis
///
/// # Examples
///
/// ```
/// use cloudsim_pilot_core::formatting::truncate_string;
///
/// assert_eq!(truncate_string("Hello, World!", 10), "Hello, ...");
/// assert_eq!(truncate_string("Short", 10), "Short");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a count with singular/plural form
///
/// # Examples
///
/// ```
/// use cloudsim_pilot_core::formatting::pluralize;
///
/// assert_eq!(pluralize(1, "file", "files"), "1 file");
/// assert_eq!(pluralize(0, "message", "messages"), "0 messages");
/// ```
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
