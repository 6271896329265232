//! Shared utility functions for the Keyward server.

use chrono::{DateTime, SecondsFormat, Utc};

/// Current time as a Unix timestamp in seconds.
pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Format a Unix timestamp as an ISO-8601 UTC string, e.g. `2024-01-01T12:00:00Z`.
pub fn to_iso8601(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| timestamp.to_string())
}

/// Human-readable UTC time for the admin listing.
pub fn to_display(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
