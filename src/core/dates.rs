// src/core/dates.rs
//! Lenient date parsing.
//!
//! Historical CSVs were written by several generations of the pipeline, so a
//! `date` cell may hold `2025-10-19`, `2025-10-19 00:00:00`, an RFC 3339
//! timestamp or a Spanish-style `19/10/2025`. Anything we cannot read becomes
//! `None`; the row itself is always kept.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Canonical on-disk form.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

pub fn parse_lenient(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    // Trailing junk after an ISO date (offsets some exporters append).
    s.get(..10)
        .filter(|_| s.len() > 10 && !s.as_bytes()[10].is_ascii_digit())
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

/// Column form of [`parse_lenient`]: one output per input, in order.
pub fn normalize_column<'a, I>(values: I) -> Vec<Option<NaiveDate>>
where
    I: IntoIterator<Item = &'a str>,
{
    values.into_iter().map(parse_lenient).collect()
}

pub fn format_canonical(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(CANONICAL_FORMAT).to_string())
        .unwrap_or_default()
}
