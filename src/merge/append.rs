// src/merge/append.rs
//! Plain append for the untyped snapshot tables (market, fixtures, price moves).
//!
//! These tables are concatenated run after run. Their columns are whatever the
//! extractor produced that day, so the merged header is the union of both
//! sides: history's columns in order, then any column only the snapshot has.
//! Cells missing on one side are left empty.
//!
//! A snapshot row that matches a stored row cell for cell (after the date
//! column is normalized) is already in history and is not appended again, so
//! re-running the same snapshot leaves the table unchanged. Repeats inside one
//! snapshot are kept.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::core::dates;
use crate::store::DataSet;

/// Column normalized to `YYYY-MM-DD` after the append, if present.
pub const DATE_COLUMN: &str = "date";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppendMerge {
    pub data: DataSet,
    /// Snapshot rows skipped because history already held them.
    pub duplicates: usize,
}

pub fn append_snapshots(history: DataSet, new: DataSet) -> AppendMerge {
    let mut headers = history.headers;
    for h in &new.headers {
        if !headers.contains(h) {
            headers.push(h.clone());
        }
    }

    let width = headers.len();
    let index: HashMap<&str, usize> = headers.iter().enumerate().map(|(i, h)| (h.as_str(), i)).collect();

    // History rows keep their positions; only padding is needed.
    let mut rows: Vec<Vec<String>> = history
        .rows
        .into_iter()
        .map(|mut r| {
            r.resize(width, s!());
            r
        })
        .collect();
    let stored = rows.len();

    let slots: Vec<usize> = new.headers.iter().filter_map(|h| index.get(h.as_str()).copied()).collect();
    for r in new.rows {
        let mut out = vec![s!(); width];
        for (cell, &slot) in r.into_iter().zip(&slots) {
            out[slot] = cell;
        }
        rows.push(out);
    }

    if let Some(&col) = index.get(DATE_COLUMN) {
        let parsed = dates::normalize_column(rows.iter().map(|r| r[col].as_str()));
        let unreadable = rows
            .iter()
            .zip(&parsed)
            .filter(|(r, d)| d.is_none() && !r[col].trim().is_empty())
            .count();
        for (r, d) in rows.iter_mut().zip(parsed) {
            r[col] = dates::format_canonical(d);
        }
        if unreadable > 0 {
            debug!(unreadable, "Dates cleared during append");
        }
    }

    let fresh = rows.split_off(stored);
    let incoming = fresh.len();
    let keep: Vec<bool> = {
        let seen: HashSet<&Vec<String>> = rows.iter().collect();
        fresh.iter().map(|r| !seen.contains(r)).collect()
    };
    rows.extend(fresh.into_iter().zip(keep).filter_map(|(r, k)| k.then_some(r)));
    let duplicates = incoming - (rows.len() - stored);
    if duplicates > 0 {
        debug!(duplicates, "Snapshot rows already stored");
    }

    AppendMerge { data: DataSet { headers, rows }, duplicates }
}
