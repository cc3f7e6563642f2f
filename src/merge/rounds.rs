// src/merge/rounds.rs
use std::collections::{BTreeSet, HashSet};

use tracing::{debug, warn};

/// A row partitioned by league round, one row per participant.
pub trait RoundKeyed {
    fn round(&self) -> Option<u32>;
    fn participant(&self) -> Option<&str>;
}

#[derive(Clone, Debug)]
pub struct RoundMerge<T> {
    pub rows: Vec<T>,
    /// Rounds present in the new snapshot. `None` stands for rows whose round
    /// could not be read.
    pub replaced_rounds: BTreeSet<Option<u32>>,
    /// History rows dropped because their round was re-scraped.
    pub dropped: usize,
    /// Snapshot rows dropped because a later row had the same round and
    /// participant.
    pub repeats: usize,
}

/// Every round present in `new` replaces that round in `history` wholesale.
/// Untouched rounds keep their rows and their order; new rows go after them.
///
/// Within the snapshot the last row for a (round, participant) pair wins.
/// Rows without a readable participant are all kept.
pub fn replace_rounds<T: RoundKeyed>(history: Vec<T>, new: Vec<T>) -> RoundMerge<T> {
    let incoming = new.len();
    let mut seen: HashSet<(Option<u32>, String)> = HashSet::new();
    let mut new: Vec<T> = new
        .into_iter()
        .rev()
        .filter(|r| match r.participant() {
            Some(p) => seen.insert((r.round(), s!(p))),
            None => true,
        })
        .collect();
    new.reverse();
    let repeats = incoming - new.len();
    if repeats > 0 {
        warn!(repeats, "Snapshot repeats round/participant pairs; keeping the last of each");
    }

    let replaced_rounds: BTreeSet<Option<u32>> = new.iter().map(RoundKeyed::round).collect();

    let before = history.len();
    let mut rows: Vec<T> = history
        .into_iter()
        .filter(|r| !replaced_rounds.contains(&r.round()))
        .collect();
    let dropped = before - rows.len();

    debug!(rounds = ?replaced_rounds, dropped, incoming = new.len(), "Replacing rounds");
    rows.extend(new);

    RoundMerge { rows, replaced_rounds, dropped, repeats }
}
