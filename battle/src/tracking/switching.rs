//! Switches, drags, team preview and illusion reveals

use std::sync::Arc;

use scry_protocol::server::{HpStatus, Player, Pokemon, PokemonDetails, Tags, to_id};
use tracing::debug;

use super::battle::TrackedBattle;
use crate::dex::Dex;
use crate::inference::illusion;
use crate::policy::{GenerationPolicy, SleepOnSwitch};
use crate::types::{
    LastUsedMove, PokemonState, SideCondition, SideRole, SideState, StatSpread, StatStages,
    Status, Terrain, Volatile, Weather,
};

/// Abilities that announce themselves when their holder switches in
const SWITCH_IN_ABILITIES: &[&str] = &[
    "intimidate",
    "drizzle",
    "drought",
    "sandstream",
    "snowwarning",
    "pressure",
    "moldbreaker",
    "teravolt",
    "turboblaze",
    "unnerve",
    "airlock",
    "cloudnine",
    "electricsurge",
    "grassysurge",
    "mistysurge",
    "psychicsurge",
    "neutralizinggas",
    "hadronengine",
    "orichalcumpulse",
    "desolateland",
    "primordialsea",
    "deltastream",
    "screencleaner",
    "forewarn",
    "download",
    "intrepidsword",
    "dauntlessshield",
    "supersweetsyrup",
];

const WEATHER_SETTERS: &[&str] = &[
    "drizzle",
    "drought",
    "sandstream",
    "snowwarning",
    "desolateland",
    "primordialsea",
    "deltastream",
    "orichalcumpulse",
];

/// A Pokemon with dex stats and types when the species is known
pub(crate) fn new_pokemon(dex: &dyn Dex, species: &str, level: u8) -> PokemonState {
    match dex.species(species) {
        Some(data) => PokemonState::from_species(species, level, data, StatSpread::RANDOM_BATTLE),
        None => PokemonState::new(species, level),
    }
}

pub(crate) fn is_zoroark_family(species: &str) -> bool {
    species.starts_with("zoroark")
}

/// Reserve index of the Pokemon a switch line names
///
/// Tries the exact species, then the nickname, then the base species (a forme
/// revealed after team preview or an earlier sighting), then the pre-forme-change name.
fn find_incoming(side: &SideState, species: &str, name: &str, base: &str) -> Option<usize> {
    let reserve = &side.reserve;
    reserve
        .iter()
        .position(|p| p.species() == species)
        .or_else(|| {
            reserve
                .iter()
                .position(|p| p.identity.nickname.as_deref() == Some(name))
        })
        .or_else(|| {
            reserve
                .iter()
                .position(|p| p.species() == base || p.identity.base_name == base)
        })
        .or_else(|| reserve.iter().position(|p| p.identity.base_name == species))
}

/// Undo everything that only lasts while a Pokemon is on the field
fn reset_outgoing(
    pokemon: &mut PokemonState,
    dex: &dyn Dex,
    policy: &GenerationPolicy,
    is_user: bool,
) {
    if matches!(pokemon.species(), "cramorantgulping" | "cramorantgorging") {
        pokemon.identity.species = "cramorant".to_string();
    }

    if let Some(pre) = pokemon.pre_transform.take() {
        pokemon.moves = pre.moves;
        pokemon.types = pre.types;
        pokemon.stats = pre.stats;
        pokemon.ability = pre.ability;
    } else if pokemon.has_volatile(&Volatile::Transform) {
        pokemon.moves.clear();
    }

    if pokemon.has_volatile(&Volatile::TypeChange) || pokemon.has_volatile(&Volatile::Transform)
    {
        if let Some(data) = dex.species(pokemon.species()) {
            pokemon.types = data.types.clone();
        }
    }

    if let Some(original) = &pokemon.original_ability {
        pokemon.ability = Some(original.clone());
    }

    if pokemon.status == Some(Status::Sleep) {
        match policy.sleep_on_switch {
            SleepOnSwitch::CarrySleepTalks => {
                let talks = pokemon.gen3_consecutive_sleep_talks;
                if pokemon.rest_turns > 0 {
                    pokemon.rest_turns = pokemon.rest_turns.saturating_add(talks);
                } else {
                    pokemon.sleep_turns = pokemon.sleep_turns.saturating_sub(talks);
                }
            }
            SleepOnSwitch::Keep => {}
            SleepOnSwitch::Reset => {
                if pokemon.rest_turns > 0 {
                    pokemon.rest_turns = 3;
                }
                pokemon.sleep_turns = 0;
            }
        }
    }
    pokemon.gen3_consecutive_sleep_talks = 0;

    if is_user
        && policy.regenerator
        && !pokemon.fainted
        && pokemon.ability.as_deref() == Some("regenerator")
    {
        pokemon.hp = (pokemon.hp + pokemon.max_hp / 3).min(pokemon.max_hp);
    }

    pokemon.boosts.clear();
    pokemon.clear_volatiles();
    pokemon.substitute_hit = false;
    pokemon.moves_used_since_switch_in.clear();
    pokemon.zoroark_disguised_as = None;
}

/// Rule out abilities that would have announced themselves on this switch-in
fn exclude_switch_in_abilities(
    pokemon: &mut PokemonState,
    weather: Option<Weather>,
    terrain: Option<Terrain>,
    policy: &GenerationPolicy,
) {
    for &ability in SWITCH_IN_ABILITIES {
        if ability == "pressure" && !policy.pressure_announced {
            continue;
        }
        if let Some(weather) = weather
            && WEATHER_SETTERS.contains(&ability)
            && (weather.is_primal() || weather.setter_ability() == ability)
        {
            continue;
        }
        if terrain.is_some_and(|t| t.setter_ability() == ability) {
            continue;
        }
        pokemon.exclude_ability(ability);
    }
    pokemon.exclude_item("airballoon");
}

impl TrackedBattle {
    pub(crate) fn create_pokemon(&self, species: &str, level: u8) -> PokemonState {
        new_pokemon(self.dex.as_ref(), species, level)
    }

    /// The bot's own Zoroark switching in under its disguise
    fn user_disguise(&self, drag: bool) -> Option<String> {
        let real = if drag {
            self.request.as_ref()?.active_pokemon()?.species_id()
        } else {
            let selected = self.battle.user.last_selected_move.as_ref()?;
            to_id(selected.action.strip_prefix("switch ")?)
        };
        is_zoroark_family(&real).then_some(real)
    }

    pub(crate) fn handle_switch(
        &mut self,
        ident: &Pokemon,
        details: &PokemonDetails,
        hp_status: Option<&HpStatus>,
        tags: &Tags,
        drag: bool,
    ) {
        let role = self.role(ident.player);
        let policy = self.battle.policy();
        let turn = self.battle.turn;
        let infer = self.config.infer_hidden_information;
        let dex = Arc::clone(&self.dex);

        let displayed = details.species_id();
        let disguise = match role {
            SideRole::User if policy.zoroark => self.user_disguise(drag),
            _ => None,
        };
        let (species, name, base) = match disguise {
            Some(real) if real != displayed => (real.clone(), real.clone(), real),
            _ => {
                let raw = details.species.trim_end_matches("-*");
                let base = dex
                    .species(&displayed)
                    .map(|d| d.base_species.clone())
                    .unwrap_or_else(|| to_id(raw.split('-').next().unwrap_or(raw)));
                (displayed, ident.name.clone(), base)
            }
        };

        let opposing_gas = self
            .battle
            .side(role.other())
            .active
            .as_ref()
            .is_some_and(|p| p.ability.as_deref() == Some("neutralizinggas"));
        let weather = self.battle.field.weather;
        let terrain = self.battle.field.terrain;
        let from = tags.from_id();

        // === Outgoing ===
        let side = self.battle.side_mut(role);
        let baton_pass = from.as_deref() == Some("batonpass")
            || side
                .last_used_move
                .as_ref()
                .and_then(|m| m.move_id())
                .is_some_and(|m| m == "batonpass");
        let shed_tail = side.shed_tailing || from.as_deref() == Some("shedtail");

        let mut carried: Option<(StatStages, Vec<Volatile>)> = None;
        if let Some(mut outgoing) = side.active.take() {
            if baton_pass {
                let passed = outgoing
                    .volatiles
                    .iter()
                    .filter(|v| v.is_baton_passable())
                    .cloned()
                    .collect();
                carried = Some((outgoing.boosts.clone(), passed));
            } else if shed_tail && outgoing.has_volatile(&Volatile::Substitute) {
                carried = Some((StatStages::new(), vec![Volatile::Substitute]));
            }
            reset_outgoing(&mut outgoing, dex.as_ref(), policy, role == SideRole::User);
            side.reserve.push(outgoing);
        }
        side.remove_condition(SideCondition::ToxicCount);
        side.shed_tailing = false;

        // === Incoming ===
        let mut incoming = match find_incoming(side, &species, &name, &base) {
            Some(index) => side.reserve.remove(index),
            None => {
                let mut created = new_pokemon(dex.as_ref(), &species, details.level_or_default());
                created.identity.gender = details.gender;
                created.identity.shiny = details.shiny;
                created
            }
        };

        if incoming.species() != species {
            debug!(from = incoming.species(), to = %species, "forme revealed on switch-in");
            incoming.identity.species = species.clone();
            if let Some(data) = dex.species(&species) {
                incoming.apply_species(data, StatSpread::RANDOM_BATTLE);
            }
        }
        incoming.unknown_forme = false;

        let name_id = to_id(&name);
        if incoming.identity.nickname.is_none() && name_id != species && name_id != base {
            incoming.identity.nickname = Some(name.clone());
        }

        if let Some(hp) = hp_status {
            incoming.apply_hp_status(hp, role == SideRole::User);
            if !incoming.fainted {
                incoming.status = hp.status.as_deref().and_then(Status::from_protocol);
            }
        }

        if let Some((boosts, volatiles)) = carried {
            incoming.boosts = boosts;
            for volatile in volatiles {
                incoming.add_volatile(volatile);
            }
        }

        incoming.hp_at_switch_in = incoming.hp_fraction();
        incoming.status_at_switch_in = incoming.status;
        incoming.moves_used_since_switch_in.clear();
        incoming.zoroark_disguised_as = None;

        if role == SideRole::Opponent && infer && !opposing_gas {
            exclude_switch_in_abilities(&mut incoming, weather, terrain, policy);
        }

        if role == SideRole::User {
            self.sync_from_request(&mut incoming);
        }

        let side = self.battle.side_mut(role);
        side.last_used_move = Some(LastUsedMove {
            pokemon: Some(species.clone()),
            action: format!("switch {species}"),
            turn,
        });
        side.active = Some(incoming);
    }

    /// `replace`: an illusion ended and the real Pokemon is shown
    pub(crate) fn handle_replace(
        &mut self,
        ident: &Pokemon,
        details: &PokemonDetails,
        hp_status: Option<&HpStatus>,
    ) {
        let role = self.role(ident.player);
        let species = details.species_id();
        let dex = Arc::clone(&self.dex);
        let side = self.battle.side_mut(role);

        let Some(active) = side.active.as_mut() else {
            return;
        };
        if active.species() == species {
            // Already unmasked by an earlier deduction
            active.zoroark_disguised_as = None;
        } else {
            let real = illusion::take_real(side, dex.as_ref(), &species, details.level_or_default());
            illusion::unmask(side, real);
        }

        if let (Some(active), Some(hp)) = (side.active.as_mut(), hp_status) {
            active.apply_hp_status(hp, role == SideRole::User);
        }
    }

    /// A `poke` line from team preview
    pub(crate) fn handle_poke(&mut self, player: Player, details: &PokemonDetails) {
        if self.role(player) == SideRole::User {
            return;
        }

        let species = details.species_id();
        let side = self.side_mut(player);
        if side
            .pokemon()
            .any(|p| p.species() == species || p.identity.base_name == species)
        {
            return;
        }

        let mut pokemon = self.create_pokemon(&species, details.level_or_default());
        pokemon.unknown_forme = details.has_hidden_forme();
        pokemon.identity.gender = details.gender;
        self.side_mut(player).reserve.push(pokemon);
    }

    pub(crate) fn handle_faint(&mut self, ident: &Pokemon) {
        if let Some(pokemon) = self.pokemon_mut(ident) {
            pokemon.hp = 0;
            pokemon.fainted = true;
            pokemon.status = None;
        }
    }
}
