//! Pokemon state types

use std::collections::{BTreeSet, HashMap, HashSet};

use scry_protocol::server::{HpStatus, to_id};
use serde::{Deserialize, Serialize};

use super::knowledge::{CHOICE_ITEMS, ExclusionSet, Item, SpeedRange};
use super::pokemon_type::Type;
use super::stats::{BattleStats, StatSpread, StatStages};
use super::status::{Status, Volatile};
use crate::dex::SpeciesData;

/// Core Pokemon identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonIdentity {
    /// Species id including forme ("silvallysteel")
    pub species: String,

    /// Species before its first in-battle forme change
    pub base_name: String,

    /// Nickname shown in protocol identifiers, if different from the species
    pub nickname: Option<String>,

    /// Level (1-100)
    pub level: u8,

    pub gender: Option<char>,
    pub shiny: bool,
}

impl PokemonIdentity {
    pub fn new(species: &str, level: u8) -> Self {
        let species = to_id(species);
        Self {
            base_name: species.clone(),
            species,
            nickname: None,
            level,
            gender: None,
            shiny: false,
        }
    }

    /// Display name (nickname if set, otherwise species id)
    pub fn name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.species)
    }
}

/// A revealed move with its remaining pp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownMove {
    pub id: String,
    pub pp: u8,
    pub max_pp: u8,
    pub disabled: bool,
}

impl KnownMove {
    pub fn new(id: &str, max_pp: u8) -> Self {
        Self {
            id: to_id(id),
            pp: max_pp,
            max_pp,
            disabled: false,
        }
    }

    /// Whether two move ids name the same move, treating every Hidden Power
    /// variant ("hiddenpowerfire60", "hiddenpower") as one family
    pub fn matches(&self, id: &str) -> bool {
        if self.id == id {
            return true;
        }
        let family = |m: &str| {
            m.strip_prefix("hiddenpower")
                .map(|rest| rest.trim_end_matches(|c: char| c.is_ascii_digit()).to_string())
        };
        match (family(&self.id), family(id)) {
            (Some(a), Some(b)) => a == b || a.is_empty() || b.is_empty(),
            _ => false,
        }
    }
}

/// The parts of a Pokemon that Transform copies over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreTransform {
    pub moves: Vec<KnownMove>,
    pub ability: Option<String>,
    pub types: Vec<Type>,
    pub stats: BattleStats,
}

/// Pokemon state during battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonState {
    pub identity: PokemonIdentity,

    /// Team preview listed this Pokemon with a hidden forme ("Urshifu-*")
    pub unknown_forme: bool,

    // === HP ===
    /// Current HP; exact for our side, scaled to the estimated max for the opponent
    pub hp: u32,
    pub max_hp: u32,
    pub fainted: bool,

    pub stats: BattleStats,

    // === Status ===
    pub status: Option<Status>,
    pub sleep_turns: u8,
    /// Turns of Rest-induced sleep left (3 right after Rest)
    pub rest_turns: u8,
    pub gen3_consecutive_sleep_talks: u8,

    // === Combat state (cleared on switch) ===
    pub boosts: StatStages,
    pub volatiles: HashSet<Volatile>,
    #[serde(with = "pairs")]
    pub volatile_durations: HashMap<Volatile, u8>,
    pub substitute_hit: bool,
    pub moves_used_since_switch_in: BTreeSet<String>,

    // === Types ===
    pub types: Vec<Type>,
    pub tera_type: Option<Type>,
    pub terastallized: bool,

    // === Revealed and inferred information ===
    pub moves: Vec<KnownMove>,
    pub ability: Option<String>,
    /// Ability before Trace/Mummy/Transform-style overwrites
    pub original_ability: Option<String>,
    pub item: Item,
    /// Set when `item` came from inference rather than a reveal
    pub item_inferred: bool,
    /// Item taken away by Trick/Switcheroo/Knock Off
    pub removed_item: Option<String>,
    pub impossible_items: ExclusionSet,
    pub impossible_abilities: ExclusionSet,
    pub speed_range: SpeedRange,

    /// What Transform overwrote; restored on switch-out
    pub pre_transform: Option<Box<PreTransform>>,

    // === Illusion bookkeeping ===
    /// HP fraction when this Pokemon last switched in
    pub hp_at_switch_in: f64,
    pub status_at_switch_in: Option<Status>,
    /// Species this (active) Zoroark was inferred to be disguised as
    pub zoroark_disguised_as: Option<String>,
}

impl PokemonState {
    /// A Pokemon with nothing but a name and level; HP is on a 0-100 scale
    pub fn new(species: &str, level: u8) -> Self {
        Self {
            identity: PokemonIdentity::new(species, level),
            unknown_forme: false,
            hp: 100,
            max_hp: 100,
            fainted: false,
            stats: BattleStats::default(),
            status: None,
            sleep_turns: 0,
            rest_turns: 0,
            gen3_consecutive_sleep_talks: 0,
            boosts: StatStages::new(),
            volatiles: HashSet::new(),
            volatile_durations: HashMap::new(),
            substitute_hit: false,
            moves_used_since_switch_in: BTreeSet::new(),
            types: Vec::new(),
            tera_type: None,
            terastallized: false,
            moves: Vec::new(),
            ability: None,
            original_ability: None,
            item: Item::Unknown,
            item_inferred: false,
            removed_item: None,
            impossible_items: ExclusionSet::new(),
            impossible_abilities: ExclusionSet::new(),
            speed_range: SpeedRange::default(),
            pre_transform: None,
            hp_at_switch_in: 1.0,
            status_at_switch_in: None,
            zoroark_disguised_as: None,
        }
    }

    /// A Pokemon whose stats and types come from species data
    pub fn from_species(species: &str, level: u8, data: &SpeciesData, spread: StatSpread) -> Self {
        let mut pokemon = Self::new(species, level);
        pokemon.apply_species(data, spread);
        pokemon.hp = pokemon.max_hp;
        if let [only] = data.abilities.as_slice() {
            pokemon.ability = Some(only.clone());
            pokemon.original_ability = Some(only.clone());
        }
        pokemon
    }

    /// Re-derive types and estimated stats, keeping the current HP fraction
    pub fn apply_species(&mut self, data: &SpeciesData, spread: StatSpread) {
        let fraction = self.hp_fraction();
        self.types = data.types.clone();
        self.stats = BattleStats::estimate(&data.base_stats, self.identity.level, spread);
        self.max_hp = self.stats.hp.max(1);
        self.hp = (self.max_hp as f64 * fraction).round() as u32;
    }

    pub fn name(&self) -> &str {
        self.identity.name()
    }

    pub fn species(&self) -> &str {
        &self.identity.species
    }

    /// Whether a protocol name ("Sus", "Amoonguss", "Silvally-Steel") refers to this Pokemon
    pub fn answers_to(&self, name: &str) -> bool {
        let id = to_id(name);
        self.identity.nickname.as_deref() == Some(name)
            || self.identity.species == id
            || self.identity.base_name == id
    }

    pub fn is_alive(&self) -> bool {
        !self.fainted && self.hp > 0
    }

    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f64 / self.max_hp as f64
    }

    /// Apply an HP string; `exact` values (our side) replace max HP, others scale it
    pub fn apply_hp_status(&mut self, hp_status: &HpStatus, exact: bool) {
        if hp_status.is_fainted() {
            self.hp = 0;
            self.fainted = true;
            self.status = None;
            return;
        }

        match (exact, hp_status.max) {
            (true, Some(max)) => {
                self.max_hp = max;
                self.hp = hp_status.current;
            }
            (_, Some(max)) if max > 0 => {
                self.hp = (self.max_hp as f64 * hp_status.current as f64 / max as f64).round() as u32;
            }
            _ => self.hp = hp_status.current.min(self.max_hp),
        }
        self.fainted = self.hp == 0;
    }

    // === Moves ===

    pub fn get_move(&self, id: &str) -> Option<&KnownMove> {
        self.moves.iter().find(|m| m.matches(id))
    }

    pub fn get_move_mut(&mut self, id: &str) -> Option<&mut KnownMove> {
        self.moves.iter_mut().find(|m| m.matches(id))
    }

    /// Record a move, returning the existing entry if it was already known
    pub fn add_move(&mut self, id: &str, max_pp: u8) -> &mut KnownMove {
        let index = match self.moves.iter().position(|m| m.matches(id)) {
            Some(index) => index,
            None => {
                self.moves.push(KnownMove::new(id, max_pp));
                self.moves.len() - 1
            }
        };
        &mut self.moves[index]
    }

    pub fn remove_move(&mut self, id: &str) -> Option<KnownMove> {
        let index = self.moves.iter().position(|m| m.matches(id))?;
        Some(self.moves.remove(index))
    }

    // === Volatiles ===

    pub fn has_volatile(&self, v: &Volatile) -> bool {
        self.volatiles.contains(v)
    }

    pub fn add_volatile(&mut self, v: Volatile) {
        self.volatiles.insert(v);
    }

    /// Remove a volatile along with any duration it carried
    pub fn remove_volatile(&mut self, v: &Volatile) -> bool {
        self.volatile_durations.remove(v);
        self.volatiles.remove(v)
    }

    pub fn volatile_duration(&self, v: &Volatile) -> u8 {
        self.volatile_durations.get(v).copied().unwrap_or(0)
    }

    pub fn set_volatile_duration(&mut self, v: Volatile, turns: u8) {
        self.volatile_durations.insert(v, turns);
    }

    pub fn clear_volatiles(&mut self) {
        self.volatiles.clear();
        self.volatile_durations.clear();
    }

    // === Items and abilities ===

    /// An authoritative reveal of the held item
    pub fn reveal_item(&mut self, id: &str) {
        self.impossible_items.readmit(id);
        self.item = Item::held(id);
        self.item_inferred = false;
    }

    /// An inference that the Pokemon holds `id`
    pub fn infer_item(&mut self, id: &str) {
        if self.impossible_items.contains(id) {
            return;
        }
        self.item = Item::held(id);
        self.item_inferred = true;
    }

    /// Rule out an item, unless it is the one currently known to be held
    pub fn exclude_item(&mut self, id: &str) {
        if !self.item.is(id) {
            self.impossible_items.exclude(id);
        }
    }

    /// An authoritative reveal of the ability
    pub fn reveal_ability(&mut self, id: &str) {
        self.impossible_abilities.readmit(id);
        self.ability = Some(id.to_string());
    }

    pub fn exclude_ability(&mut self, id: &str) {
        if self.ability.as_deref() != Some(id) {
            self.impossible_abilities.exclude(id);
        }
    }

    /// Whether the Pokemon could be holding `id` as far as anything has shown
    pub fn can_have_item(&self, id: &str) -> bool {
        match &self.item {
            Item::Held(held) => held == id,
            Item::Empty => false,
            Item::Unknown => !self.impossible_items.contains(id),
        }
    }

    pub fn can_have_choice_item(&self) -> bool {
        match &self.item {
            Item::Held(_) => self.item.is_choice(),
            Item::Empty => false,
            Item::Unknown => CHOICE_ITEMS
                .iter()
                .any(|id| !self.impossible_items.contains(id)),
        }
    }

    /// Abilities still possible given the species' ability pool
    pub fn possible_abilities(&self, pool: &[String]) -> Vec<String> {
        if let Some(ability) = &self.ability {
            return vec![ability.clone()];
        }
        pool.iter()
            .filter(|a| !self.impossible_abilities.contains(a))
            .cloned()
            .collect()
    }

    /// Whether `ability` is still possible; an empty pool (unknown species) admits anything
    pub fn can_have_ability(&self, id: &str, pool: &[String]) -> bool {
        match &self.ability {
            Some(ability) => ability == id,
            None if pool.is_empty() => !self.impossible_abilities.contains(id),
            None => self.possible_abilities(pool).iter().any(|a| a == id),
        }
    }

    // === Types ===

    pub fn has_type(&self, t: Type) -> bool {
        if self.terastallized {
            return self.tera_type == Some(t);
        }
        self.types.contains(&t)
    }

    /// Types used for defensive matchups
    pub fn effective_types(&self) -> Vec<Type> {
        match (self.terastallized, self.tera_type) {
            (true, Some(tera)) => vec![tera],
            _ => self.types.clone(),
        }
    }
}

/// Serialize a map with structured keys as a list of pairs
mod pairs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;
    use std::hash::Hash;

    pub fn serialize<K, V, S>(map: &HashMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<HashMap<K, V>, D::Error>
    where
        K: Deserialize<'de> + Eq + Hash,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Vec::<(K, V)>::deserialize(deserializer).map(|pairs| pairs.into_iter().collect())
    }
}
