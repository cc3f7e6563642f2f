// src/runner.rs
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{error, info, info_span, warn};

use crate::{
    config::AppOptions,
    merge::{self, FeedPath},
    pages::{
        Classification, GameweekRow, MergePolicy, Notification, NotificationRow, PoolStanding,
        Record, TableKind,
    },
    progress::Progress,
    store::{self, Loaded, StoreError},
};

/// What a merge did, beyond the row counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeNote {
    /// No snapshot for this table; nothing was written.
    NothingNew,
    Feed(FeedPath),
    Rounds { replaced: Vec<Option<u32>>, dropped: usize, repeats: usize },
    Unique { duplicates: usize },
    Appended { duplicates: usize },
}

impl fmt::Display for MergeNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeNote::NothingNew => f.write_str("nothing new"),
            MergeNote::Feed(path) => write!(f, "{path}"),
            MergeNote::Rounds { replaced, dropped, repeats } => {
                let rounds: Vec<String> = replaced
                    .iter()
                    .map(|r| r.map_or_else(|| s!("?"), |n| n.to_string()))
                    .collect();
                write!(f, "replaced rounds [{}], {dropped} old rows dropped", rounds.join(", "))?;
                if *repeats > 0 {
                    write!(f, ", {repeats} repeated rows collapsed")?;
                }
                Ok(())
            }
            MergeNote::Unique { duplicates } => write!(f, "{duplicates} duplicates skipped"),
            MergeNote::Appended { duplicates: 0 } => f.write_str("appended"),
            MergeNote::Appended { duplicates } => write!(f, "appended, {duplicates} stored rows skipped"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeStats {
    /// Rows in history before the merge.
    pub before: usize,
    /// Rows in the new snapshot.
    pub incoming: usize,
    /// Rows written.
    pub after: usize,
    pub note: MergeNote,
}

impl MergeStats {
    fn nothing_new(before: usize) -> Self {
        Self { before, incoming: 0, after: before, note: MergeNote::NothingNew }
    }

    pub fn wrote(&self) -> bool {
        self.note != MergeNote::NothingNew
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.note, MergeNote::Feed(FeedPath::Fallback(_)))
    }
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} -> {} ({})", self.before, self.incoming, self.after, self.note)
    }
}

#[derive(Debug)]
pub struct TableReport {
    pub kind: TableKind,
    pub outcome: Result<MergeStats, StoreError>,
}

/// Summary of one pipeline run, in processing order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub tables: Vec<TableReport>,
}

impl RunSummary {
    pub fn failed(&self) -> impl Iterator<Item = &TableReport> {
        self.tables.iter().filter(|t| t.outcome.is_err())
    }

    pub fn all_ok(&self) -> bool {
        self.failed().next().is_none()
    }

    pub fn get(&self, kind: TableKind) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.kind == kind)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in &self.tables {
            match &t.outcome {
                Ok(stats) => writeln!(f, "{:<15} {stats}", t.kind.label())?,
                Err(e) => writeln!(f, "{:<15} FAILED: {e}", t.kind.label())?,
            }
        }
        Ok(())
    }
}

/// One sequential pass over `kinds`: load history and snapshot, merge, save.
/// A failing table is reported and skipped; the others still run.
pub fn run(
    opts: &AppOptions,
    kinds: &[TableKind],
    today: NaiveDate,
    mut progress: Option<&mut dyn Progress>,
) -> RunSummary {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(kinds.len());
    }
    info!(
        source = %opts.paths.source_dir.display(),
        dest = %opts.paths.dest_dir.display(),
        %today,
        tables = kinds.len(),
        "Run started"
    );

    let mut summary = RunSummary::default();
    for &kind in kinds {
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("Merging {kind}..."));
        }

        let dest = opts.paths.dest(kind);
        let outcome = merge_files(kind, &dest, &opts.paths.source(kind), &dest, today);

        match &outcome {
            Ok(stats) => {
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(kind.label());
                }
                if stats.is_fallback() {
                    warn!(table = %kind, %stats, "Merged without overlap; non-transfer cards may repeat");
                }
            }
            Err(e) => {
                error!(table = %kind, error = %e, "Table skipped; history left as is");
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(kind.label(), &e.to_string());
                }
            }
        }
        summary.tables.push(TableReport { kind, outcome });
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    info!(tables = summary.tables.len(), failed = summary.failed().count(), "Run finished");
    summary
}

/// Merge the snapshot at `new` into the history at `history` and write the
/// result to `out` (which may be `history` itself). Nothing is written when
/// there is no snapshot or when either side cannot be loaded.
pub fn merge_files(
    kind: TableKind,
    history: &Path,
    new: &Path,
    out: &Path,
    today: NaiveDate,
) -> Result<MergeStats, StoreError> {
    let _span = info_span!("merge", table = %kind).entered();

    let stats = match kind.policy() {
        MergePolicy::Feed => merge_typed::<NotificationRow, _>(history, new, out, |old, fresh| {
            let old = old.into_iter().map(Notification::from).collect();
            let fresh = fresh.into_iter().map(Notification::from).collect();
            let m = merge::merge_feed(old, fresh, today);
            let rows = m.entries.iter().map(NotificationRow::from).collect();
            (rows, MergeNote::Feed(m.path))
        })?,
        MergePolicy::ReplaceRounds => match kind {
            TableKind::Pools => merge_typed(history, new, out, by_round::<PoolStanding>)?,
            _ => merge_typed(history, new, out, by_round::<Classification>)?,
        },
        MergePolicy::AppendUnique => merge_typed::<GameweekRow, _>(history, new, out, |old, fresh| {
            let m = merge::append_unique(old, fresh);
            (m.rows, MergeNote::Unique { duplicates: m.duplicates })
        })?,
        MergePolicy::Append => merge_untyped(history, new, out)?,
    };

    info!(%stats, "Merged");
    Ok(stats)
}

fn by_round<R: merge::RoundKeyed>(old: Vec<R>, fresh: Vec<R>) -> (Vec<R>, MergeNote) {
    let m = merge::replace_rounds(old, fresh);
    let note = MergeNote::Rounds {
        replaced: m.replaced_rounds.into_iter().collect(),
        dropped: m.dropped,
        repeats: m.repeats,
    };
    (m.rows, note)
}

fn merge_typed<R, F>(history: &Path, new: &Path, out: &Path, combine: F) -> Result<MergeStats, StoreError>
where
    R: Record,
    F: FnOnce(Vec<R>, Vec<R>) -> (Vec<R>, MergeNote),
{
    let old = store::load_table::<R>(history)?.unwrap_or_empty();
    let Loaded::Found(fresh) = store::load_table::<R>(new)? else {
        return Ok(MergeStats::nothing_new(old.len()));
    };

    let (before, incoming) = (old.len(), fresh.len());
    let (rows, note) = combine(old, fresh);
    store::save_table(out, &rows)?;
    Ok(MergeStats { before, incoming, after: rows.len(), note })
}

fn merge_untyped(history: &Path, new: &Path, out: &Path) -> Result<MergeStats, StoreError> {
    let old = store::load_dataset(history)?.unwrap_or_empty();
    let Loaded::Found(fresh) = store::load_dataset(new)? else {
        return Ok(MergeStats::nothing_new(old.len()));
    };

    let (before, incoming) = (old.len(), fresh.len());
    let m = merge::append_snapshots(old, fresh);
    store::save_dataset(out, &m.data)?;
    let note = MergeNote::Appended { duplicates: m.duplicates };
    Ok(MergeStats { before, incoming, after: m.data.len(), note })
}
