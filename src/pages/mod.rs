// src/pages/mod.rs
//! # Table kinds and their record shapes
//!
//! One module per page of the league site that ends up in a CSV store. Each
//! module owns the **column shape** of its table and nothing else: loading and
//! saving live in `store`, merging in `merge`, orchestration in `runner`.
//!
//! ## Conventions & invariants
//! - Column names are the ones already present in the historical stores, so a
//!   store written by an earlier pipeline loads unchanged.
//! - Every column is always written, in the order of [`Record::COLUMNS`],
//!   whatever merge path produced the rows. Absent values are empty cells.
//! - Loading is lenient per cell (bad number/date → `None`) but strict per
//!   file: a missing [`Record::REQUIRED`] column rejects the whole file.
//!
//! ## Current kinds
//! - `notifications`: the newest-first feed (transfers, bonuses, markers).
//! - `classification` / `pools`: per-round standings, replaced round by round.
//! - `gameweek`: per-fixture, per-player facts, appended under a composite key.
//! - `market`, `fixtures`, `price_moves`: untyped snapshots, plain append.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub mod classification;
pub mod gameweek;
pub mod notifications;

pub use classification::{Classification, PoolStanding};
pub use gameweek::GameweekRow;
pub use notifications::{Bonus, Category, Event, Marker, Notification, NotificationRow, Transfer};

/// A typed CSV row.
pub trait Record: Serialize + DeserializeOwned {
    /// Header names, in on-disk order. Must match the serde field order.
    const COLUMNS: &'static [&'static str];
    /// Columns a file must carry for its rows to be mergeable.
    const REQUIRED: &'static [&'static str];
}

/// How a table kind reconciles a new snapshot with its history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergePolicy {
    /// Newest-first feed, cut at the newest shared transfer.
    Feed,
    /// Every round present in the snapshot replaces that round in history.
    ReplaceRounds,
    /// History first, then new rows whose composite key is not yet known.
    AppendUnique,
    /// Plain concatenation after date normalization.
    Append,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Notifications,
    Classification,
    Pools,
    Gameweek,
    Market,
    Fixtures,
    PriceMoves,
}

impl TableKind {
    pub const ALL: [TableKind; 7] = [
        TableKind::Notifications,
        TableKind::Classification,
        TableKind::Pools,
        TableKind::Gameweek,
        TableKind::Market,
        TableKind::Fixtures,
        TableKind::PriceMoves,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TableKind::Notifications => "notifications",
            TableKind::Classification => "classification",
            TableKind::Pools => "pools",
            TableKind::Gameweek => "gameweek",
            TableKind::Market => "market",
            TableKind::Fixtures => "fixtures",
            TableKind::PriceMoves => "price_moves",
        }
    }

    /// File name used in both the source and the destination directory.
    pub fn default_file(&self) -> &'static str {
        match self {
            TableKind::Notifications => "notificaciones.csv",
            TableKind::Classification => "clasificaciones.csv",
            TableKind::Pools => "quinielas.csv",
            TableKind::Gameweek => "gameweek.csv",
            TableKind::Market => "mercado.csv",
            TableKind::Fixtures => "jornadas.csv",
            TableKind::PriceMoves => "subidas_bajadas.csv",
        }
    }

    pub fn policy(&self) -> MergePolicy {
        match self {
            TableKind::Notifications => MergePolicy::Feed,
            TableKind::Classification | TableKind::Pools => MergePolicy::ReplaceRounds,
            TableKind::Gameweek => MergePolicy::AppendUnique,
            TableKind::Market | TableKind::Fixtures | TableKind::PriceMoves => MergePolicy::Append,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        TableKind::ALL
            .into_iter()
            .find(|k| k.label() == wanted)
            .ok_or_else(|| format!("Unknown table kind: {s}"))
    }
}
