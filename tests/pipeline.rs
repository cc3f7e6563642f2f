// tests/pipeline.rs
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use mister_sync::config::AppOptions;
use mister_sync::merge::{FallbackReason, FeedPath};
use mister_sync::pages::TableKind;
use mister_sync::runner::{self, MergeNote};
use mister_sync::store::StoreError;

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("mister_sync_it_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(p.join("new")).unwrap();
    p
}

fn opts_for(root: &Path) -> AppOptions {
    let mut opts = AppOptions::default();
    opts.paths.source_dir = root.join("new");
    opts.paths.dest_dir = root.to_path_buf();
    opts
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
}

const FEED_HEADER: &str = "type,subtype,mensaje,jugador,de_equipo,a_equipo,precio,posicionJugador,puntosJugador,equipoLiga,name,money,position,aciertos,points,jornada,date,idTransfer";

fn transfer(player: &str, date: &str) -> String {
    format!("transfer,mercado,,{player},Mister,Ana,1.000.000,,,,,,,,,,{date},")
}

fn players_in(path: &Path) -> Vec<String> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    let col = rdr.headers().unwrap().iter().position(|h| h == "jugador").unwrap();
    rdr.records().map(|r| r.unwrap()[col].to_string()).collect()
}

#[test]
fn full_run_merges_every_table() {
    let root = tmp_dir("full_run");
    let opts = opts_for(&root);

    // History
    fs::write(
        root.join("notificaciones.csv"),
        [FEED_HEADER, &transfer("T5", "2025-10-01"), &transfer("T4", "2025-10-01"), &transfer("T3", "2025-09-30")].join("\n"),
    )
    .unwrap();
    fs::write(
        root.join("clasificaciones.csv"),
        "jornada,nombre,posicion,puntos,valor_equipo\n1,Ana,1,10,\n1,Luis,2,8,\n2,Ana,1,20,\n2,Luis,2,18,\n",
    )
    .unwrap();
    fs::write(root.join("mercado.csv"), "jugador,precio,date\nPedri,1.000,2025-10-01 00:00:00\n").unwrap();

    // Snapshots
    fs::write(
        root.join("new").join("notificaciones.csv"),
        [FEED_HEADER, &transfer("T7", ""), &transfer("T6", ""), &transfer("T5", ""), &transfer("T4", "")].join("\n"),
    )
    .unwrap();
    fs::write(
        root.join("new").join("clasificaciones.csv"),
        "jornada,nombre,posicion,puntos,valor_equipo\n2,Ana,2,25,\n2,Luis,1,30,\n",
    )
    .unwrap();
    fs::write(root.join("new").join("mercado.csv"), "jugador,precio,date\nGavi,2.000,19/10/2025\n").unwrap();

    let summary = runner::run(&opts, &TableKind::ALL, day(19), None);
    assert!(summary.all_ok(), "{summary}");

    // Feed: overlap cut.
    assert_eq!(players_in(&root.join("notificaciones.csv")), ["T7", "T6", "T5", "T4", "T3"]);
    let stats = summary.get(TableKind::Notifications).unwrap().outcome.as_ref().unwrap();
    assert!(matches!(stats.note, MergeNote::Feed(FeedPath::Anchored { .. })));
    assert_eq!((stats.before, stats.incoming, stats.after), (3, 4, 5));

    let text = fs::read_to_string(root.join("notificaciones.csv")).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], FEED_HEADER);
    assert!(lines[1].contains(",2025-10-19,"));
    assert!(lines[3].contains(",2025-10-01,"));

    // Classification: round 2 replaced whole.
    let cls = fs::read_to_string(root.join("clasificaciones.csv")).unwrap();
    assert_eq!(
        cls.lines().collect::<Vec<_>>(),
        [
            "jornada,nombre,posicion,puntos,valor_equipo",
            "1,Ana,1,10,",
            "1,Luis,2,8,",
            "2,Ana,2,25,",
            "2,Luis,1,30,",
        ]
    );

    // Market: appended, dates normalized.
    let market = fs::read_to_string(root.join("mercado.csv")).unwrap();
    assert_eq!(
        market.lines().collect::<Vec<_>>(),
        ["jugador,precio,date", "Pedri,1.000,2025-10-01", "Gavi,2.000,2025-10-19"]
    );

    // No snapshot, no file.
    let gw = summary.get(TableKind::Gameweek).unwrap().outcome.as_ref().unwrap();
    assert_eq!(gw.note, MergeNote::NothingNew);
    assert!(!root.join("gameweek.csv").exists());
}

#[test]
fn rerunning_the_same_snapshot_is_idempotent() {
    let root = tmp_dir("idempotent");
    let opts = opts_for(&root);

    fs::write(
        root.join("new").join("notificaciones.csv"),
        [FEED_HEADER, &transfer("T2", ""), &transfer("T1", "")].join("\n"),
    )
    .unwrap();
    fs::write(
        root.join("new").join("gameweek.csv"),
        "Date,Jornada,EquipoLocal,ResultadoLocal,EquipoVisitante,ResultadoVisitante,EquipoJugador,Manager,NombreJugador,Puntos\n\
         2025-10-18,8,3,2,7,1,3,Ana,Pedri,9\n\
         2025-10-18,8,3,2,7,1,7,Luis,Gavi,4\n",
    )
    .unwrap();

    let kinds = [TableKind::Notifications, TableKind::Gameweek];
    let first = runner::run(&opts, &kinds, day(19), None);
    assert!(first.all_ok(), "{first}");
    let feed_once = fs::read_to_string(root.join("notificaciones.csv")).unwrap();
    let gw_once = fs::read_to_string(root.join("gameweek.csv")).unwrap();

    let second = runner::run(&opts, &kinds, day(19), None);
    assert!(second.all_ok(), "{second}");
    assert_eq!(fs::read_to_string(root.join("notificaciones.csv")).unwrap(), feed_once);
    assert_eq!(fs::read_to_string(root.join("gameweek.csv")).unwrap(), gw_once);

    let gw = second.get(TableKind::Gameweek).unwrap().outcome.as_ref().unwrap();
    assert_eq!(gw.note, MergeNote::Unique { duplicates: 2 });
}

#[test]
fn rerunning_an_append_snapshot_adds_nothing() {
    let root = tmp_dir("append_rerun");
    let opts = opts_for(&root);

    fs::write(root.join("new").join("mercado.csv"), "jugador,precio,date\nGavi,2.000,2025-10-19\n").unwrap();
    fs::write(
        root.join("new").join("subidas_bajadas.csv"),
        "jugador,cambio,date\nPedri,+250.000,19/10/2025\nPedri,+250.000,19/10/2025\n",
    )
    .unwrap();

    let kinds = [TableKind::Market, TableKind::PriceMoves];
    let first = runner::run(&opts, &kinds, day(19), None);
    assert!(first.all_ok(), "{first}");
    let market_once = fs::read_to_string(root.join("mercado.csv")).unwrap();
    let moves_once = fs::read_to_string(root.join("subidas_bajadas.csv")).unwrap();
    assert_eq!(market_once.lines().count(), 2);
    assert_eq!(moves_once.lines().count(), 3);

    let second = runner::run(&opts, &kinds, day(19), None);
    assert!(second.all_ok(), "{second}");
    assert_eq!(fs::read_to_string(root.join("mercado.csv")).unwrap(), market_once);
    assert_eq!(fs::read_to_string(root.join("subidas_bajadas.csv")).unwrap(), moves_once);

    let market = second.get(TableKind::Market).unwrap().outcome.as_ref().unwrap();
    assert_eq!(market.note, MergeNote::Appended { duplicates: 1 });
    assert_eq!((market.before, market.incoming, market.after), (1, 1, 1));
}

#[test]
fn broken_history_is_left_untouched() {
    let root = tmp_dir("broken_history");
    let opts = opts_for(&root);

    // The key column EquipoVisitante is gone from history.
    let broken = "Jornada,EquipoLocal,EquipoJugador,Manager,NombreJugador\n8,3,3,Ana,Pedri\n";
    fs::write(root.join("gameweek.csv"), broken).unwrap();
    fs::write(
        root.join("new").join("gameweek.csv"),
        "Jornada,EquipoLocal,EquipoVisitante,EquipoJugador,Manager,NombreJugador\n9,3,7,3,Ana,Pedri\n",
    )
    .unwrap();
    fs::write(
        root.join("new").join("quinielas.csv"),
        "jornada,nombre,posicion,puntos\n8,Ana,1,9\n",
    )
    .unwrap();

    let summary = runner::run(&opts, &[TableKind::Gameweek, TableKind::Pools], day(19), None);
    assert!(!summary.all_ok());

    match &summary.get(TableKind::Gameweek).unwrap().outcome {
        Err(StoreError::MissingColumn { column, .. }) => assert_eq!(column, "EquipoVisitante"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(root.join("gameweek.csv")).unwrap(), broken);

    // Other tables still run.
    assert!(summary.get(TableKind::Pools).unwrap().outcome.is_ok());
    assert!(root.join("quinielas.csv").exists());
}

#[test]
fn schema_is_the_same_on_every_feed_path() {
    let root = tmp_dir("schema");

    let write_feed = |name: &str, players: &[&str]| -> PathBuf {
        let p = root.join(name);
        let mut lines = vec![String::from(FEED_HEADER)];
        lines.extend(players.iter().map(|pl| transfer(pl, "")));
        fs::write(&p, lines.join("\n")).unwrap();
        p
    };
    let header_of = |p: &Path| fs::read_to_string(p).unwrap().lines().next().unwrap().to_string();

    let new = write_feed("snap.csv", &["T7", "T6", "T5"]);

    // Empty history.
    let out_empty = root.join("out_empty.csv");
    let s = runner::merge_files(TableKind::Notifications, &root.join("none.csv"), &new, &out_empty, day(19)).unwrap();
    assert_eq!(s.note, MergeNote::Feed(FeedPath::Fallback(FallbackReason::NoKnownTransfer)));

    // No overlap.
    let far = write_feed("far.csv", &["T1", "T0"]);
    let out_far = root.join("out_far.csv");
    let s = runner::merge_files(TableKind::Notifications, &far, &new, &out_far, day(19)).unwrap();
    assert_eq!(s.note, MergeNote::Feed(FeedPath::Fallback(FallbackReason::AnchorNotInNew)));

    // Overlap. A history written with only some of the columns still comes
    // back with all of them.
    let slim = root.join("slim.csv");
    fs::write(&slim, "type,jugador,de_equipo,a_equipo,precio,idTransfer\ntransfer,T5,Mister,Ana,1.000.000,legacy\n").unwrap();
    let out_cut = root.join("out_cut.csv");
    let s = runner::merge_files(TableKind::Notifications, &slim, &new, &out_cut, day(19)).unwrap();
    assert!(matches!(s.note, MergeNote::Feed(FeedPath::Anchored { .. })));

    assert_eq!(header_of(&out_empty), FEED_HEADER);
    assert_eq!(header_of(&out_far), FEED_HEADER);
    assert_eq!(header_of(&out_cut), FEED_HEADER);
    assert_eq!(players_in(&out_cut), ["T7", "T6", "T5"]);
}

#[test]
fn feed_without_identity_column_is_rejected() {
    let root = tmp_dir("no_identity");
    let history = root.join("hist.csv");
    let body = [FEED_HEADER, &transfer("T1", "2025-10-01")].join("\n");
    fs::write(&history, &body).unwrap();

    let new = root.join("snap.csv");
    fs::write(&new, "type,jugador,de_equipo,a_equipo,precio\ntransfer,T2,Mister,Ana,1\n").unwrap();

    let err = runner::merge_files(TableKind::Notifications, &history, &new, &history, day(19)).unwrap_err();
    assert!(matches!(err, StoreError::MissingColumn { ref column, .. } if column == "idTransfer"));
    assert_eq!(fs::read_to_string(&history).unwrap(), body);
}
