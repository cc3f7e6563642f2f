// src/store.rs
//! CSV persistence for every table kind.
//!
//! Loading distinguishes three outcomes:
//! - no file yet → [`Loaded::Missing`], which callers treat as an empty table;
//! - a readable file → [`Loaded::Found`];
//! - a file that exists but cannot be used (I/O, broken CSV, a required
//!   column absent) → [`StoreError`]. That is never folded into "empty": a
//!   merge against an empty history would overwrite the real one.
//!
//! Header names are trimmed before anything looks at them. Rows are read as
//! bytes, so a cell with invalid UTF-8 costs that cell, not the file.
//!
//! Saving writes the full header first (even for zero rows), then the rows,
//! into a sibling `.tmp` file that replaces the target only once complete.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder, Trim, WriterBuilder};
use thiserror::Error;
use tracing::debug;

use crate::file::{ensure_parent, staging_path};
use crate::pages::Record;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{} is missing required column `{column}`", path.display())]
    MissingColumn { path: PathBuf, column: String },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io { path: path.to_path_buf(), source }
    }

    fn csv(path: &Path, source: csv::Error) -> Self {
        StoreError::Csv { path: path.to_path_buf(), source }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Loaded<T> {
    Missing,
    Found(T),
}

impl<T: Default> Loaded<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Loaded::Missing)
    }

    pub fn unwrap_or_empty(self) -> T {
        match self {
            Loaded::Missing => T::default(),
            Loaded::Found(t) => t,
        }
    }
}

/// Untyped table: a header row plus string cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

/* ---------------- Load ---------------- */

fn open_reader(path: &Path) -> Result<Option<csv::Reader<fs::File>>, StoreError> {
    match fs::File::open(path) {
        Ok(f) => Ok(Some(
            ReaderBuilder::new().flexible(true).trim(Trim::Headers).from_reader(f),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// A file of blank header cells (or no bytes at all) holds no table.
fn is_blank(headers: &ByteRecord) -> bool {
    headers.iter().all(|h| h.is_empty())
}

fn lossy(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

pub fn load_table<R: Record>(path: &Path) -> Result<Loaded<Vec<R>>, StoreError> {
    let Some(mut rdr) = open_reader(path)? else {
        debug!(path = %path.display(), "No stored table");
        return Ok(Loaded::Missing);
    };

    let headers = rdr.byte_headers().map_err(|e| StoreError::csv(path, e))?.clone();
    if is_blank(&headers) {
        return Ok(Loaded::Found(Vec::new()));
    }
    if let Some(column) = R::REQUIRED.iter().find(|c| !headers.iter().any(|h| h == c.as_bytes())) {
        return Err(StoreError::MissingColumn { path: path.to_path_buf(), column: s!(*column) });
    }

    let mut rows = Vec::new();
    let mut rec = ByteRecord::new();
    while rdr.read_byte_record(&mut rec).map_err(|e| StoreError::csv(path, e))? {
        rows.push(rec.deserialize::<R>(Some(&headers)).map_err(|e| StoreError::csv(path, e))?);
    }
    debug!(path = %path.display(), rows = rows.len(), "Loaded table");
    Ok(Loaded::Found(rows))
}

pub fn load_dataset(path: &Path) -> Result<Loaded<DataSet>, StoreError> {
    let Some(mut rdr) = open_reader(path)? else {
        debug!(path = %path.display(), "No stored table");
        return Ok(Loaded::Missing);
    };

    let headers = rdr.byte_headers().map_err(|e| StoreError::csv(path, e))?.clone();
    if is_blank(&headers) {
        return Ok(Loaded::Found(DataSet::default()));
    }

    let mut rows = Vec::new();
    for rec in rdr.byte_records() {
        let rec = rec.map_err(|e| StoreError::csv(path, e))?;
        rows.push(rec.iter().map(lossy).collect());
    }
    Ok(Loaded::Found(DataSet { headers: headers.iter().map(lossy).collect(), rows }))
}

/* ---------------- Save ---------------- */

fn write_staged<F>(path: &Path, fill: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut csv::Writer<fs::File>) -> Result<(), csv::Error>,
{
    ensure_parent(path).map_err(|e| StoreError::io(path, e))?;
    let tmp = staging_path(path);

    let mut w = WriterBuilder::new()
        .has_headers(false)
        .from_path(&tmp)
        .map_err(|e| StoreError::csv(&tmp, e))?;
    fill(&mut w).map_err(|e| StoreError::csv(&tmp, e))?;
    w.flush().map_err(|e| StoreError::io(&tmp, e))?;
    drop(w);

    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))
}

pub fn save_table<R: Record>(path: &Path, rows: &[R]) -> Result<(), StoreError> {
    write_staged(path, |w| {
        w.write_record(R::COLUMNS)?;
        for r in rows {
            w.serialize(r)?;
        }
        Ok(())
    })?;
    debug!(path = %path.display(), rows = rows.len(), "Saved table");
    Ok(())
}

pub fn save_dataset(path: &Path, ds: &DataSet) -> Result<(), StoreError> {
    write_staged(path, |w| {
        if !ds.headers.is_empty() {
            w.write_record(&ds.headers)?;
        }
        for r in &ds.rows {
            w.write_record(r)?;
        }
        Ok(())
    })?;
    debug!(path = %path.display(), rows = ds.len(), "Saved table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::{Classification, GameweekRow};

    fn tmp(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("mister_sync_store_rs");
        fs::create_dir_all(&dir).unwrap();
        let p = dir.join(name);
        let _ = fs::remove_file(&p);
        p
    }

    #[test]
    fn missing_file_is_a_sentinel_not_an_error() {
        let p = tmp("nope.csv");
        assert!(load_table::<Classification>(&p).unwrap().is_missing());
        assert!(load_dataset(&p).unwrap().is_missing());
    }

    #[test]
    fn empty_table_still_writes_header() {
        let p = tmp("empty_classification.csv");
        save_table::<Classification>(&p, &[]).unwrap();
        let text = fs::read_to_string(&p).unwrap();
        assert_eq!(text.trim_end(), "jornada,nombre,posicion,puntos,valor_equipo");
        assert_eq!(load_table::<Classification>(&p).unwrap(), Loaded::Found(Vec::new()));
        assert!(!staging_path(&p).exists());
    }

    #[test]
    fn required_column_absent_is_an_error() {
        let p = tmp("no_key.csv");
        fs::write(&p, "Jornada,EquipoLocal,Manager\n1,2,Ana\n").unwrap();
        match load_table::<GameweekRow>(&p) {
            Err(StoreError::MissingColumn { column, .. }) => assert_eq!(column, "EquipoVisitante"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn blank_file_is_an_empty_table() {
        let p = tmp("blank.csv");
        fs::write(&p, "").unwrap();
        assert_eq!(load_table::<Classification>(&p).unwrap(), Loaded::Found(Vec::new()));
        assert_eq!(load_dataset(&p).unwrap(), Loaded::Found(DataSet::default()));
    }

    #[test]
    fn extra_columns_and_bad_cells_are_tolerated() {
        let p = tmp("indexed_classification.csv");
        fs::write(
            &p,
            ",jornada,nombre,posicion,puntos,valor_equipo\n\
             0,1,Ana,1,30,\"12.500.000 €\"\n\
             1,x,Luis,,n/a,\n",
        )
        .unwrap();
        let rows = load_table::<Classification>(&p).unwrap().unwrap_or_empty();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].squad_value, Some(12_500_000));
        assert_eq!(rows[1].round, None);
        assert_eq!(rows[1].points, None);
        assert_eq!(rows[1].participant.as_deref(), Some("Luis"));
    }

    #[test]
    fn padded_headers_still_map_to_fields() {
        let p = tmp("padded_headers.csv");
        fs::write(&p, " jornada , nombre ,posicion,puntos\n4,Ana,1,12\n").unwrap();
        let rows = load_table::<Classification>(&p).unwrap().unwrap_or_empty();
        assert_eq!(rows[0].round, Some(4));
        assert_eq!(rows[0].participant.as_deref(), Some("Ana"));
        assert_eq!(rows[0].points, Some(12));

        fs::write(&p, " jugador ,date\nPedri,2025-10-19\n").unwrap();
        let ds = load_dataset(&p).unwrap().unwrap_or_empty();
        assert_eq!(ds.headers, strings!["jugador", "date"]);
    }

    #[test]
    fn invalid_utf8_cell_keeps_the_table() {
        let p = tmp("latin1_classification.csv");
        fs::write(&p, b"jornada,nombre,posicion,puntos\n5,N\xfa\xf1ez,1,9\n5,Luis,2,\xff\n").unwrap();
        let rows = load_table::<Classification>(&p).unwrap().unwrap_or_empty();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].participant.as_deref(), Some("N\u{FFFD}\u{FFFD}ez"));
        assert_eq!(rows[0].round, Some(5));
        assert_eq!(rows[1].points, None);

        let ds = load_dataset(&p).unwrap().unwrap_or_empty();
        assert_eq!(ds.rows[1], strings!["5", "Luis", "2", "\u{FFFD}"]);
    }

    #[test]
    fn accented_names_are_kept_as_written() {
        let p = tmp("accented_classification.csv");
        let rows = vec![Classification {
            round: Some(1),
            participant: Some(s!("Núñez-Peña (C)")),
            ..Classification::default()
        }];
        save_table(&p, &rows).unwrap();
        assert_eq!(load_table::<Classification>(&p).unwrap(), Loaded::Found(rows));
    }

    #[test]
    fn dataset_round_trip() {
        let p = tmp("market.csv");
        let ds = DataSet {
            headers: strings!["jugador", "precio", "date"],
            rows: vec![strings!["Pedri", "1.000.000", "2025-10-19"], strings!["Gavi, Pablo", "", ""]],
        };
        save_dataset(&p, &ds).unwrap();
        assert_eq!(load_dataset(&p).unwrap(), Loaded::Found(ds));
    }
}
