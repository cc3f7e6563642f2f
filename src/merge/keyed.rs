// src/merge/keyed.rs
use std::collections::HashSet;
use std::hash::Hash;

use tracing::debug;

/// A row with a composite natural key.
pub trait Keyed {
    type Key: Eq + Hash;
    fn key(&self) -> Self::Key;
}

#[derive(Clone, Debug)]
pub struct KeyedMerge<T> {
    pub rows: Vec<T>,
    /// Rows dropped because their key was already seen.
    pub duplicates: usize,
}

/// History first, then new; the first row seen under a key wins.
///
/// Duplicates inside history itself are collapsed as well, so a store that
/// was once written by a blind append heals on the next run.
pub fn append_unique<T: Keyed>(history: Vec<T>, new: Vec<T>) -> KeyedMerge<T> {
    let total = history.len() + new.len();
    let mut seen: HashSet<T::Key> = HashSet::with_capacity(total);

    let rows: Vec<T> = history
        .into_iter()
        .chain(new)
        .filter(|r| seen.insert(r.key()))
        .collect();

    let duplicates = total - rows.len();
    debug!(kept = rows.len(), duplicates, "Appended unique rows");
    KeyedMerge { rows, duplicates }
}
