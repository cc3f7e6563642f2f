// src/pages/classification.rs
//! Per-round standings: the league classification and the pools (quiniela).
//!
//! Both are scraped as "the table for round N" and stored as one long table.
//! A re-scrape of round N is authoritative for the whole round.

use serde::{Deserialize, Serialize};

use crate::core::lenient;
use crate::merge::RoundKeyed;

use super::Record;

/// Columns: jornada, nombre, posicion, puntos, valor_equipo
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "jornada", default, deserialize_with = "lenient::opt_u32")]
    pub round: Option<u32>,
    #[serde(rename = "nombre", default, deserialize_with = "lenient::text")]
    pub participant: Option<String>,
    #[serde(rename = "posicion", default, deserialize_with = "lenient::opt_u32")]
    pub rank: Option<u32>,
    #[serde(rename = "puntos", default, deserialize_with = "lenient::opt_i32")]
    pub points: Option<i32>,
    /// Squad value in euros.
    #[serde(rename = "valor_equipo", default, deserialize_with = "lenient::opt_money")]
    pub squad_value: Option<i64>,
}

impl Record for Classification {
    const COLUMNS: &'static [&'static str] =
        &["jornada", "nombre", "posicion", "puntos", "valor_equipo"];
    const REQUIRED: &'static [&'static str] = &["jornada", "nombre"];
}

impl RoundKeyed for Classification {
    fn round(&self) -> Option<u32> { self.round }
    fn participant(&self) -> Option<&str> { self.participant.as_deref() }
}

/// Columns: jornada, nombre, posicion, puntos
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStanding {
    #[serde(rename = "jornada", default, deserialize_with = "lenient::opt_u32")]
    pub round: Option<u32>,
    #[serde(rename = "nombre", default, deserialize_with = "lenient::text")]
    pub participant: Option<String>,
    #[serde(rename = "posicion", default, deserialize_with = "lenient::opt_u32")]
    pub rank: Option<u32>,
    #[serde(rename = "puntos", default, deserialize_with = "lenient::opt_i32")]
    pub points: Option<i32>,
}

impl Record for PoolStanding {
    const COLUMNS: &'static [&'static str] = &["jornada", "nombre", "posicion", "puntos"];
    const REQUIRED: &'static [&'static str] = &["jornada", "nombre"];
}

impl RoundKeyed for PoolStanding {
    fn round(&self) -> Option<u32> { self.round }
    fn participant(&self) -> Option<&str> { self.participant.as_deref() }
}
