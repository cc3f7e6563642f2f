// src/merge/mod.rs
//! Merge engines, one per [`MergePolicy`](crate::pages::MergePolicy).
//!
//! All engines are pure: they take the loaded history and the new snapshot by
//! value and return the merged rows plus what happened. None of them touches
//! the filesystem.

pub mod append;
pub mod feed;
pub mod keyed;
pub mod rounds;

pub use append::{append_snapshots, AppendMerge};
pub use feed::{merge_feed, FallbackReason, FeedMerge, FeedPath};
pub use keyed::{append_unique, Keyed, KeyedMerge};
pub use rounds::{replace_rounds, RoundKeyed, RoundMerge};
