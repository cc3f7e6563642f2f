// src/pages/notifications.rs
//! Notification feed: the league's activity wall.
//!
//! The feed is a newest-first list of cards. Three categories matter:
//! - `transfer`: a player changed hands (market sale, agreement, release
//!   clause) or a losing bid on a sale. Carries a content identity.
//! - `bonificacion`: end-of-round payouts for the classification or the pools.
//! - `marks`: structural markers ("round N started", "market opened").
//!
//! On disk every category shares one flat row ([`NotificationRow`]); in
//! memory it is the tagged [`Notification`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{lenient, TransferId};

use super::Record;

pub const COLUMNS: [&str; 18] = [
    "type", "subtype", "mensaje", "jugador", "de_equipo", "a_equipo", "precio",
    "posicionJugador", "puntosJugador", "equipoLiga", "name", "money", "position",
    "aciertos", "points", "jornada", "date", "idTransfer",
];

/// Seller/buyer name the site uses for the league itself.
pub const LEAGUE_SELLER: &str = "Mister";

/* ---------------- On-disk row ---------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRow {
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub subtype: Option<String>,
    #[serde(rename = "mensaje", default, deserialize_with = "lenient::text")]
    pub message: Option<String>,
    #[serde(rename = "jugador", default, deserialize_with = "lenient::text")]
    pub player: Option<String>,
    #[serde(rename = "de_equipo", default, deserialize_with = "lenient::text")]
    pub from_team: Option<String>,
    #[serde(rename = "a_equipo", default, deserialize_with = "lenient::text")]
    pub to_team: Option<String>,
    #[serde(rename = "precio", default, deserialize_with = "lenient::text")]
    pub price: Option<String>,
    #[serde(rename = "posicionJugador", default, deserialize_with = "lenient::text")]
    pub player_position: Option<String>,
    #[serde(rename = "puntosJugador", default, deserialize_with = "lenient::text")]
    pub player_points: Option<String>,
    #[serde(rename = "equipoLiga", default, deserialize_with = "lenient::text")]
    pub league_team: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub money: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub position: Option<String>,
    #[serde(rename = "aciertos", default, deserialize_with = "lenient::text")]
    pub hits: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub points: Option<String>,
    #[serde(rename = "jornada", default, deserialize_with = "lenient::opt_u32")]
    pub round: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "idTransfer", default, deserialize_with = "lenient::text")]
    pub id_transfer: Option<String>,
}

impl Record for NotificationRow {
    const COLUMNS: &'static [&'static str] = &COLUMNS;
    const REQUIRED: &'static [&'static str] = &["type", "idTransfer"];
}

/* ---------------- Typed feed entry ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Transfer,
    Bonus,
    Marker,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Transfer => "transfer",
            Category::Bonus => "bonificacion",
            Category::Marker => "marks",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "transfer" => Some(Category::Transfer),
            "bonificacion" => Some(Category::Bonus),
            "marks" => Some(Category::Marker),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    /// `clausula`, `mercado`, `acuerdo` or `Puja`.
    pub subtype: Option<String>,
    pub player_position: Option<String>,
    pub player_points: Option<String>,
    /// Real-world club id of the player.
    pub league_team: Option<String>,
    player: Option<String>,
    from_team: Option<String>,
    to_team: Option<String>,
    price: Option<String>,
    id: TransferId,
}

impl Transfer {
    pub const CLAUSE: &'static str = "clausula";
    pub const MARKET: &'static str = "mercado";
    pub const AGREEMENT: &'static str = "acuerdo";
    pub const BID: &'static str = "Puja";

    /// Identity fields are fixed at construction; the id cannot go stale.
    /// Subtype is `mercado` when the league is on either side, else `acuerdo`.
    pub fn new(
        player: Option<String>,
        from_team: Option<String>,
        to_team: Option<String>,
        price: Option<String>,
    ) -> Self {
        let subtype = if from_team.as_deref() == Some(LEAGUE_SELLER)
            || to_team.as_deref() == Some(LEAGUE_SELLER)
        {
            Self::MARKET
        } else {
            Self::AGREEMENT
        };
        let id = TransferId::compute(
            player.as_deref(),
            from_team.as_deref(),
            to_team.as_deref(),
            price.as_deref(),
        );
        Self {
            subtype: Some(s!(subtype)),
            player_position: None,
            player_points: None,
            league_team: None,
            player,
            from_team,
            to_team,
            price,
            id,
        }
    }

    /// Mark as a release-clause payment.
    pub fn by_clause(mut self) -> Self {
        self.subtype = Some(s!(Self::CLAUSE));
        self
    }

    pub fn with_details(
        mut self,
        position: Option<String>,
        points: Option<String>,
        league_team: Option<String>,
    ) -> Self {
        self.player_position = position;
        self.player_points = points;
        self.league_team = league_team;
        self
    }

    /// A losing bid listed under this sale: same player and seller, the bidder
    /// as destination and the bid as price.
    pub fn bid(&self, bidder: Option<String>, amount: Option<String>) -> Self {
        let mut bid = Transfer::new(self.player.clone(), self.from_team.clone(), bidder, amount)
            .with_details(
                self.player_position.clone(),
                self.player_points.clone(),
                self.league_team.clone(),
            );
        bid.subtype = Some(s!(Self::BID));
        bid
    }

    pub fn id(&self) -> &TransferId { &self.id }
    pub fn player(&self) -> Option<&str> { self.player.as_deref() }
    pub fn from_team(&self) -> Option<&str> { self.from_team.as_deref() }
    pub fn to_team(&self) -> Option<&str> { self.to_team.as_deref() }
    pub fn price(&self) -> Option<&str> { self.price.as_deref() }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bonus {
    /// `clasificacion` or `quiniela`.
    pub subtype: Option<String>,
    pub name: Option<String>,
    pub money: Option<String>,
    pub position: Option<String>,
    pub points: Option<String>,
    pub hits: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Marker {
    /// `start_jornada` or `start_mercado`.
    pub subtype: Option<String>,
    pub message: Option<String>,
    pub round: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Transfer(Transfer),
    Bonus(Bonus),
    Marker(Marker),
    /// Category we do not model. Kept verbatim so a rewrite never loses it.
    Unrecognized(Box<NotificationRow>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub event: Event,
    /// Day the card was first ingested.
    pub date: Option<NaiveDate>,
}

impl Notification {
    pub fn new(event: Event) -> Self {
        Self { event, date: None }
    }

    pub fn transfer(t: Transfer) -> Self {
        Self::new(Event::Transfer(t))
    }

    pub fn dated(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Only transfers have one.
    pub fn identity(&self) -> Option<&TransferId> {
        match &self.event {
            Event::Transfer(t) => Some(t.id()),
            _ => None,
        }
    }

    pub fn category(&self) -> Option<Category> {
        match &self.event {
            Event::Transfer(_) => Some(Category::Transfer),
            Event::Bonus(_) => Some(Category::Bonus),
            Event::Marker(_) => Some(Category::Marker),
            Event::Unrecognized(_) => None,
        }
    }
}

/* ---------------- Row <-> entry ---------------- */

impl From<NotificationRow> for Notification {
    /// The stored `idTransfer` is not trusted: identity is recomputed from the
    /// content fields, so stores written with another digest still line up.
    fn from(row: NotificationRow) -> Self {
        let date = row.date;
        let category = row.category.as_deref().and_then(Category::parse);
        let event = match category {
            Some(Category::Transfer) => {
                let mut t = Transfer::new(row.player, row.from_team, row.to_team, row.price)
                    .with_details(row.player_position, row.player_points, row.league_team);
                t.subtype = row.subtype;
                Event::Transfer(t)
            }
            Some(Category::Bonus) => Event::Bonus(Bonus {
                subtype: row.subtype,
                name: row.name,
                money: row.money,
                position: row.position,
                points: row.points,
                hits: row.hits,
            }),
            Some(Category::Marker) => Event::Marker(Marker {
                subtype: row.subtype,
                message: row.message,
                round: row.round,
            }),
            None => Event::Unrecognized(Box::new(row)),
        };
        Notification { event, date }
    }
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        let mut row = match &n.event {
            Event::Transfer(t) => NotificationRow {
                category: Some(s!(Category::Transfer.as_str())),
                subtype: t.subtype.clone(),
                player: t.player.clone(),
                from_team: t.from_team.clone(),
                to_team: t.to_team.clone(),
                price: t.price.clone(),
                player_position: t.player_position.clone(),
                player_points: t.player_points.clone(),
                league_team: t.league_team.clone(),
                id_transfer: Some(t.id.to_string()),
                ..NotificationRow::default()
            },
            Event::Bonus(b) => NotificationRow {
                category: Some(s!(Category::Bonus.as_str())),
                subtype: b.subtype.clone(),
                name: b.name.clone(),
                money: b.money.clone(),
                position: b.position.clone(),
                points: b.points.clone(),
                hits: b.hits.clone(),
                ..NotificationRow::default()
            },
            Event::Marker(m) => NotificationRow {
                category: Some(s!(Category::Marker.as_str())),
                subtype: m.subtype.clone(),
                message: m.message.clone(),
                round: m.round,
                ..NotificationRow::default()
            },
            Event::Unrecognized(raw) => (**raw).clone(),
        };
        row.date = n.date;
        row
    }
}
