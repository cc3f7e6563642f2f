// src/pages/gameweek.rs
//! Played fixtures, one row per (fixture, manager, player).
//!
//! A finished fixture never changes, so once a row is known it is kept as
//! first seen. The scrape date is recorded but is not part of the identity:
//! the same fixture seen on another day is the same row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::lenient;
use crate::merge::Keyed;

use super::Record;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameweekRow {
    #[serde(rename = "Date", default, deserialize_with = "lenient::opt_date")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "Jornada", default, deserialize_with = "lenient::opt_u32")]
    pub round: Option<u32>,
    /// Team ids as used by the site.
    #[serde(rename = "EquipoLocal", default, deserialize_with = "lenient::opt_u32")]
    pub home_team: Option<u32>,
    #[serde(rename = "ResultadoLocal", default, deserialize_with = "lenient::opt_u32")]
    pub home_score: Option<u32>,
    #[serde(rename = "EquipoVisitante", default, deserialize_with = "lenient::opt_u32")]
    pub away_team: Option<u32>,
    #[serde(rename = "ResultadoVisitante", default, deserialize_with = "lenient::opt_u32")]
    pub away_score: Option<u32>,
    #[serde(rename = "EquipoJugador", default, deserialize_with = "lenient::opt_u32")]
    pub player_team: Option<u32>,
    #[serde(rename = "Manager", default, deserialize_with = "lenient::text")]
    pub manager: Option<String>,
    #[serde(rename = "NombreJugador", default, deserialize_with = "lenient::text")]
    pub player: Option<String>,
    #[serde(rename = "Posicion", default, deserialize_with = "lenient::opt_u32")]
    pub position: Option<u32>,
    #[serde(rename = "Puntos", default, deserialize_with = "lenient::opt_i32")]
    pub points: Option<i32>,
    /// 1 when the player came off the bench.
    #[serde(rename = "Suplente", default, deserialize_with = "lenient::opt_u32")]
    pub substitute: Option<u32>,
    /// 1 when the player was substituted.
    #[serde(rename = "Cambio", default, deserialize_with = "lenient::opt_u32")]
    pub substituted: Option<u32>,
    #[serde(rename = "Goles", default, deserialize_with = "lenient::opt_u32")]
    pub goals: Option<u32>,
    #[serde(rename = "Asistencias", default, deserialize_with = "lenient::opt_u32")]
    pub assists: Option<u32>,
    #[serde(rename = "GolPropia", default, deserialize_with = "lenient::opt_u32")]
    pub own_goals: Option<u32>,
    #[serde(rename = "PenaltiMarcado", default, deserialize_with = "lenient::opt_u32")]
    pub penalties_scored: Option<u32>,
    #[serde(rename = "PenaltiFallado", default, deserialize_with = "lenient::opt_u32")]
    pub penalties_missed: Option<u32>,
    #[serde(rename = "PenaltiParado", default, deserialize_with = "lenient::opt_u32")]
    pub penalties_saved: Option<u32>,
    #[serde(rename = "Amarilla", default, deserialize_with = "lenient::opt_u32")]
    pub yellow_cards: Option<u32>,
    #[serde(rename = "Roja", default, deserialize_with = "lenient::opt_u32")]
    pub red_cards: Option<u32>,
}

pub const KEY_COLUMNS: [&str; 6] = [
    "Jornada", "EquipoLocal", "EquipoVisitante", "EquipoJugador", "Manager", "NombreJugador",
];

impl Record for GameweekRow {
    const COLUMNS: &'static [&'static str] = &[
        "Date", "Jornada", "EquipoLocal", "ResultadoLocal", "EquipoVisitante",
        "ResultadoVisitante", "EquipoJugador", "Manager", "NombreJugador", "Posicion",
        "Puntos", "Suplente", "Cambio", "Goles", "Asistencias", "GolPropia",
        "PenaltiMarcado", "PenaltiFallado", "PenaltiParado", "Amarilla", "Roja",
    ];
    const REQUIRED: &'static [&'static str] = &KEY_COLUMNS;
}

/// (round, home, away, player's team, manager, player)
pub type GameweekKey = (
    Option<u32>,
    Option<u32>,
    Option<u32>,
    Option<u32>,
    Option<String>,
    Option<String>,
);

impl Keyed for GameweekRow {
    type Key = GameweekKey;

    fn key(&self) -> GameweekKey {
        (
            self.round,
            self.home_team,
            self.away_team,
            self.player_team,
            self.manager.clone(),
            self.player.clone(),
        )
    }
}
