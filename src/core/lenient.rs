// src/core/lenient.rs
//! `deserialize_with` adapters for CSV cells.
//!
//! A malformed cell must never fail the whole file: each adapter reads the raw
//! text and maps anything unreadable to `None`. Use together with
//! `#[serde(default)]` so a missing column also lands as `None`.

use std::fmt;

use chrono::NaiveDate;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

use super::{dates, sanitize};

/// A cell read as bytes; invalid UTF-8 is replaced, not rejected.
struct Cell(String);

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct CellVisitor;

        impl<'de> Visitor<'de> for CellVisitor {
            type Value = Cell;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a CSV cell")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Cell, E> {
                Ok(Cell(s!(v)))
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Cell, E> {
                Ok(Cell(String::from_utf8_lossy(v).into_owned()))
            }
        }

        d.deserialize_bytes(CellVisitor)
    }
}

fn raw<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Cell>::deserialize(d)?.map(|Cell(s)| s))
}

/// Empty and whitespace-only cells become `None`; everything else is trimmed.
pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(raw(d)?
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

pub fn opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(raw(d)?
        .as_deref()
        .and_then(sanitize::parse_whole)
        .and_then(|v| u32::try_from(v).ok()))
}

pub fn opt_i32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    Ok(raw(d)?
        .as_deref()
        .and_then(sanitize::parse_whole)
        .and_then(|v| i32::try_from(v).ok()))
}

/// Plain integer first, then the site's `€ 1.234.567` rendering. A dot is a
/// thousands separator here (`2.000` is two thousand), except for the `.0`
/// that float-typed exports append.
pub fn opt_money<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(raw(d)?.as_deref().and_then(|s| {
        let s = s.trim();
        let s = s.strip_suffix(".0").unwrap_or(s);
        s.parse::<i64>().ok().or_else(|| sanitize::parse_money(s))
    }))
}

pub fn opt_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    Ok(raw(d)?.as_deref().and_then(dates::parse_lenient))
}
