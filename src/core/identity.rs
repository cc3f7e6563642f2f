// src/core/identity.rs
//! Content identity for transfer notifications.
//!
//! A transfer is identified by what happened (player, seller, buyer, price),
//! never by when it was scraped. Two rows with the same four fields are the
//! same event.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 over the four identity fields. Always 64 chars.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(String);

impl TransferId {
    /// Absent fields hash exactly like empty strings.
    pub fn compute(
        player: Option<&str>,
        from_team: Option<&str>,
        to_team: Option<&str>,
        price: Option<&str>,
    ) -> Self {
        let mut hasher = Sha256::new();
        for field in [player, from_team, to_team, price] {
            let bytes = field.unwrap_or("").as_bytes();
            // Length prefix: no field value can bleed into its neighbour.
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
        TransferId(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(p: &str, f: &str, t: &str, price: &str) -> TransferId {
        TransferId::compute(Some(p), Some(f), Some(t), Some(price))
    }

    #[test]
    fn stable_and_fixed_length() {
        let a = id("Pedri", "Mister", "Ana", "12.500.000");
        let b = id("Pedri", "Mister", "Ana", "12.500.000");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn every_field_participates() {
        let base = id("Pedri", "Mister", "Ana", "12.500.000");
        assert_ne!(base, id("Gavi", "Mister", "Ana", "12.500.000"));
        assert_ne!(base, id("Pedri", "Luis", "Ana", "12.500.000"));
        assert_ne!(base, id("Pedri", "Mister", "Marta", "12.500.000"));
        assert_ne!(base, id("Pedri", "Mister", "Ana", "12.600.000"));
    }

    #[test]
    fn absent_is_empty() {
        assert_eq!(
            TransferId::compute(Some("Pedri"), None, Some("Ana"), None),
            id("Pedri", "", "Ana", ""),
        );
    }

    #[test]
    fn separator_in_value_does_not_collide() {
        assert_ne!(id("a", "b|", "", ""), id("a", "b", "|", ""));
        assert_ne!(id("a", "b,", "", ""), id("a", "b", ",", ""));
        assert_ne!(id("ab", "", "", ""), id("a", "b", "", ""));
    }
}
