// src/merge/feed.rs
//! Overlap merge for the newest-first notification feed.
//!
//! Neither the stored feed nor a fresh scrape has a primary key, and the
//! scrape window overlaps the stored feed by an unknown amount (possibly
//! none). Transfers carry a content identity, so the newest stored transfer
//! (the *anchor*) is looked up in the scrape:
//!
//! ```text
//! new:      [T7, T6, T5, T4]        anchor = T5 (newest stored transfer)
//! history:          [T5, T4, T3]
//! merged:   [T7, T6] ++ [T5, T4, T3]
//! ```
//!
//! Everything strictly above the anchor in the scrape is new and gets the run
//! date; the anchor and everything below it come from history untouched.
//! Without an anchor the whole scrape is put on top of history. Bonus and
//! marker cards have no identity, so that fallback may repeat some of them;
//! callers are told which path was taken.

use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::core::TransferId;
use crate::pages::Notification;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// History is empty or holds no transfer.
    NoKnownTransfer,
    /// The scrape does not reach back to the newest stored transfer.
    AnchorNotInNew,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoKnownTransfer => f.write_str("no transfer in history"),
            FallbackReason::AnchorNotInNew => f.write_str("anchor not found in new feed"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedPath {
    Anchored { anchor: TransferId, i_new: usize, i_hist: usize },
    Fallback(FallbackReason),
}

impl fmt::Display for FeedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedPath::Anchored { i_new, i_hist, .. } => {
                write!(f, "anchored (new[..{i_new}] + history[{i_hist}..])")
            }
            FeedPath::Fallback(reason) => write!(f, "fallback: {reason}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FeedMerge {
    /// Newest first.
    pub entries: Vec<Notification>,
    pub path: FeedPath,
    /// How many entries at the front came from the new feed.
    pub added: usize,
}

impl FeedMerge {
    pub fn is_fallback(&self) -> bool {
        matches!(self.path, FeedPath::Fallback(_))
    }
}

/// Merge a freshly scraped feed into the stored one. Both newest first.
pub fn merge_feed(history: Vec<Notification>, new: Vec<Notification>, today: NaiveDate) -> FeedMerge {
    let Some(anchor) = history.iter().find_map(Notification::identity).cloned() else {
        warn!(
            new = new.len(),
            history = history.len(),
            "No transfer in stored feed; prepending the whole new feed"
        );
        return fallback(history, new, today, FallbackReason::NoKnownTransfer);
    };

    // Located by value, not assumed to be the first transfer position.
    let i_hist = history
        .iter()
        .position(|n| n.identity() == Some(&anchor))
        .unwrap_or_default();

    let Some(i_new) = locate_anchor(&new, &history[i_hist..], &anchor) else {
        warn!(
            %anchor,
            new = new.len(),
            history = history.len(),
            "Anchor transfer not in new feed; prepending the whole new feed"
        );
        return fallback(history, new, today, FallbackReason::AnchorNotInNew);
    };

    let mut entries: Vec<Notification> = new.into_iter().take(i_new).collect();
    stamp(&mut entries, today);
    let added = entries.len();
    entries.extend(history.into_iter().skip(i_hist));

    info!(%anchor, i_new, i_hist, added, total = entries.len(), "Feed merged at anchor");
    FeedMerge { entries, path: FeedPath::Anchored { anchor, i_new, i_hist }, added }
}

fn fallback(
    history: Vec<Notification>,
    mut new: Vec<Notification>,
    today: NaiveDate,
    reason: FallbackReason,
) -> FeedMerge {
    stamp(&mut new, today);
    let added = new.len();
    new.extend(history);
    FeedMerge { entries: new, path: FeedPath::Fallback(reason), added }
}

fn stamp(entries: &mut [Notification], today: NaiveDate) {
    for n in entries {
        n.date = Some(today);
    }
}

/// Position of the anchor inside `new`.
///
/// The same (player, from, to, price) can legitimately occur twice, e.g. a
/// player sold back and forth at the same price. With several candidates,
/// each one is checked against `known` (history from the anchor down): the
/// transfers below the candidate must repeat the stored transfers one for
/// one. The candidate with the longest such agreement wins; a tie goes to
/// the deeper candidate, which never drops new rows. If no candidate agrees
/// the first one is used, as a single-candidate scrape would.
fn locate_anchor(new: &[Notification], known: &[Notification], anchor: &TransferId) -> Option<usize> {
    let candidates: Vec<usize> = new
        .iter()
        .enumerate()
        .filter(|(_, n)| n.identity() == Some(anchor))
        .map(|(i, _)| i)
        .collect();

    match candidates.as_slice() {
        [] => None,
        [only] => Some(*only),
        many => {
            let known_ids: Vec<&TransferId> = known.iter().filter_map(Notification::identity).collect();

            let mut best: Option<(usize, usize)> = None; // (index, agreeing transfers)
            for &c in many {
                let below: Vec<&TransferId> = new[c..].iter().filter_map(Notification::identity).collect();
                let agree = below.iter().zip(&known_ids).take_while(|(a, b)| a == b).count();
                let consistent = agree == below.len().min(known_ids.len());
                debug!(candidate = c, agree, consistent, "Anchor candidate");
                if consistent && best.is_none_or(|(_, n)| agree >= n) {
                    best = Some((c, agree));
                }
            }

            match best {
                Some((c, _)) => Some(c),
                None => {
                    warn!(
                        %anchor,
                        candidates = ?many,
                        "Anchor repeats in new feed and no occurrence lines up with history; using the first"
                    );
                    Some(many[0])
                }
            }
        }
    }
}
