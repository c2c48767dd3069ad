//! Dex backed by Showdown-shaped JSON tables

use std::collections::{BTreeMap, HashMap};

use scry_protocol::server::{Stat, to_id};
use serde::Deserialize;

use super::{Dex, MoveCategory, MoveData, SpeciesData};
use crate::error::TrackerError;
use crate::types::{BaseStats, Type};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSpecies {
    name: String,
    types: Vec<String>,
    base_stats: BaseStats,
    /// Slot ("0", "1", "H", "S") to display name
    abilities: BTreeMap<String, String>,
    #[serde(default)]
    base_species: Option<String>,
    #[serde(default)]
    random_battle_level: Option<u8>,
}

#[derive(Deserialize)]
struct RawMove {
    name: String,
    #[serde(rename = "type")]
    move_type: String,
    category: String,
    #[serde(default)]
    priority: i8,
    pp: u8,
    #[serde(default)]
    target: String,
    #[serde(default)]
    boosts: HashMap<String, i8>,
    #[serde(default)]
    flags: HashMap<String, u8>,
}

/// Ability slots in the order Showdown lists them
fn slot_order(slot: &str) -> u8 {
    match slot {
        "0" => 0,
        "1" => 1,
        "H" => 2,
        _ => 3,
    }
}

impl From<RawSpecies> for SpeciesData {
    fn from(raw: RawSpecies) -> Self {
        let mut slots: Vec<(&String, &String)> = raw.abilities.iter().collect();
        slots.sort_by_key(|(slot, _)| slot_order(slot));

        let mut abilities: Vec<String> = Vec::new();
        for (_, name) in slots {
            let id = to_id(name);
            if !abilities.contains(&id) {
                abilities.push(id);
            }
        }

        let base_species = raw
            .base_species
            .as_deref()
            .map(to_id)
            .unwrap_or_else(|| to_id(&raw.name));

        SpeciesData {
            types: raw.types.iter().filter_map(|t| Type::from_protocol(t)).collect(),
            base_stats: raw.base_stats,
            abilities,
            base_species,
            random_battle_level: raw.random_battle_level,
            name: raw.name,
        }
    }
}

impl From<RawMove> for MoveData {
    fn from(raw: RawMove) -> Self {
        let category = match raw.category.as_str() {
            "Physical" => MoveCategory::Physical,
            "Special" => MoveCategory::Special,
            _ => MoveCategory::Status,
        };

        let self_boosts = if category == MoveCategory::Status && raw.target == "self" {
            let mut boosts: Vec<(Stat, i8)> = raw
                .boosts
                .iter()
                .filter_map(|(stat, amount)| Stat::parse(stat).map(|s| (s, *amount)))
                .collect();
            boosts.sort_by_key(|(stat, _)| stat.as_str());
            boosts
        } else {
            Vec::new()
        };

        MoveData {
            move_type: Type::from_protocol(&raw.move_type).unwrap_or(Type::Normal),
            category,
            priority: raw.priority,
            pp: raw.pp,
            self_boosts,
            charge: raw.flags.contains_key("charge"),
            heal: raw.flags.contains_key("heal"),
            target: raw.target,
            name: raw.name,
        }
    }
}

/// Species, moves and set pools keyed by id
#[derive(Debug, Clone, Default)]
pub struct JsonDex {
    species: HashMap<String, SpeciesData>,
    moves: HashMap<String, MoveData>,
    sets: HashMap<String, Vec<String>>,
}

impl JsonDex {
    /// Load from a pokedex table, a move table, and a `{species: [move ids]}` set table
    pub fn from_json(pokedex: &str, moves: &str, sets: &str) -> Result<Self, TrackerError> {
        let species: HashMap<String, RawSpecies> =
            serde_json::from_str(pokedex).map_err(TrackerError::InvalidDexData)?;
        let moves: HashMap<String, RawMove> =
            serde_json::from_str(moves).map_err(TrackerError::InvalidDexData)?;
        let sets: HashMap<String, Vec<String>> =
            serde_json::from_str(sets).map_err(TrackerError::InvalidDexData)?;

        Ok(Self {
            species: species
                .into_iter()
                .map(|(id, raw)| (to_id(&id), raw.into()))
                .collect(),
            moves: moves
                .into_iter()
                .map(|(id, raw)| (to_id(&id), raw.into()))
                .collect(),
            sets: sets
                .into_iter()
                .map(|(id, pool)| (to_id(&id), pool.iter().map(|m| to_id(m)).collect()))
                .collect(),
        })
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }
}

impl Dex for JsonDex {
    fn species(&self, id: &str) -> Option<&SpeciesData> {
        self.species.get(id)
    }

    fn move_data(&self, id: &str) -> Option<&MoveData> {
        self.moves.get(id)
    }

    fn possible_moves(&self, species: &str) -> Option<&[String]> {
        self.sets.get(species).map(Vec::as_slice)
    }
}
