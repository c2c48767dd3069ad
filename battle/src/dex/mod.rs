//! Read-only species and move metadata
//!
//! The tracker never hard-codes base stats or ability pools; it asks a [`Dex`].
//! [`builtin_dex`] covers common species, and [`JsonDex`] loads full
//! Showdown-shaped tables.

mod json;

use std::fmt;
use std::sync::{Arc, OnceLock};

use scry_protocol::server::Stat;

use crate::types::{BaseStats, Type};

pub use json::JsonDex;

/// Species metadata
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesData {
    pub name: String,
    pub types: Vec<Type>,
    pub base_stats: BaseStats,
    /// Ability ids the species can have
    pub abilities: Vec<String>,
    /// Id of the base forme ("silvally" for "silvallysteel")
    pub base_species: String,
    /// Level random battles assign this species
    pub random_battle_level: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Move metadata
#[derive(Debug, Clone, PartialEq)]
pub struct MoveData {
    pub name: String,
    pub move_type: Type,
    pub category: MoveCategory,
    pub priority: i8,
    pub pp: u8,
    pub target: String,
    /// Stages a status move raises on its user
    pub self_boosts: Vec<(Stat, i8)>,
    /// Two-turn move that charges first
    pub charge: bool,
    /// Restores the user's HP
    pub heal: bool,
}

impl MoveData {
    pub fn is_status(&self) -> bool {
        self.category == MoveCategory::Status
    }

    pub fn is_damaging(&self) -> bool {
        !self.is_status()
    }

    /// Status move that only raises the user's stats
    pub fn is_self_boosting(&self) -> bool {
        self.is_status() && !self.self_boosts.is_empty()
    }

    /// PP with every PP Up applied
    pub fn max_pp(&self) -> u8 {
        if self.pp <= 1 {
            return self.pp;
        }
        (self.pp as u16 * 8 / 5).min(u8::MAX as u16) as u8
    }
}

/// Lookup of species, moves and set pools by Showdown id
pub trait Dex: Send + Sync + fmt::Debug {
    fn species(&self, id: &str) -> Option<&SpeciesData>;

    fn move_data(&self, id: &str) -> Option<&MoveData>;

    /// Moves a set-restricted format can give this species
    fn possible_moves(&self, species: &str) -> Option<&[String]>;

    /// Ability pool, empty when the species is unknown
    fn abilities(&self, species: &str) -> &[String] {
        self.species(species)
            .map(|data| data.abilities.as_slice())
            .unwrap_or_default()
    }

    /// Priority of a move, 0 when unknown
    fn priority(&self, move_id: &str) -> i8 {
        self.move_data(move_id).map(|m| m.priority).unwrap_or(0)
    }
}

static BUILTIN: OnceLock<Arc<JsonDex>> = OnceLock::new();

/// The embedded table, parsed on first use
pub fn builtin_dex() -> Arc<dyn Dex> {
    let dex = BUILTIN.get_or_init(|| {
        let parsed = JsonDex::from_json(
            include_str!("../../data/pokedex.json"),
            include_str!("../../data/moves.json"),
            include_str!("../../data/sets.json"),
        );
        match parsed {
            Ok(dex) => Arc::new(dex),
            Err(err) => {
                tracing::warn!(%err, "embedded dex failed to parse; using an empty table");
                Arc::new(JsonDex::default())
            }
        }
    });
    dex.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_dex_species() {
        let dex = builtin_dex();
        let caterpie = dex.species("caterpie").unwrap();
        assert_eq!(caterpie.types, vec![Type::Bug]);
        assert_eq!(caterpie.base_stats.spe, 45);
        assert_eq!(
            dex.abilities("seismitoad"),
            &["swiftswim", "poisontouch", "waterabsorb"]
        );
        assert_eq!(dex.species("silvallysteel").unwrap().base_species, "silvally");
        assert!(dex.species("missingno").is_none());
        assert!(dex.abilities("missingno").is_empty());
    }

    #[test]
    fn test_builtin_dex_moves() {
        let dex = builtin_dex();
        let tackle = dex.move_data("tackle").unwrap();
        assert_eq!(tackle.category, MoveCategory::Physical);
        assert_eq!(tackle.max_pp(), 56);
        assert_eq!(dex.priority("quickattack"), 1);
        assert_eq!(dex.priority("notarealmove"), 0);

        let dragon_dance = dex.move_data("dragondance").unwrap();
        assert!(dragon_dance.is_self_boosting());
        assert!(!dex.move_data("scaleshot").unwrap().is_self_boosting());
        assert!(dex.move_data("phantomforce").unwrap().charge);
    }

    #[test]
    fn test_builtin_set_pools() {
        let dex = builtin_dex();
        let pool = dex.possible_moves("zoroark").unwrap();
        assert!(pool.iter().any(|m| m == "darkpulse"));
        assert!(dex.possible_moves("missingno").is_none());
    }

    #[test]
    fn test_max_pp() {
        let mv = MoveData {
            name: "Struggle".to_string(),
            move_type: Type::Normal,
            category: MoveCategory::Physical,
            priority: 0,
            pp: 1,
            target: "randomNormal".to_string(),
            self_boosts: Vec::new(),
            charge: false,
            heal: false,
        };
        assert_eq!(mv.max_pp(), 1);
    }
}
