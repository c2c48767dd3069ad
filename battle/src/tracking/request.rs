//! The bot's own side, synced from `|request|` payloads

use scry_protocol::server::{BattleRequest, MoveSlot, SidePokemon, to_id};
use tracing::debug;

use super::battle::TrackedBattle;
use super::switching::new_pokemon;
use crate::dex::Dex;
use crate::types::{Item, KnownMove, PokemonState, Status, Type, Volatile};

fn clamp_pp(pp: u32) -> u8 {
    pp.min(u8::MAX as u32) as u8
}

/// Whether a request entry describes this tracked Pokemon
fn describes(entry: &SidePokemon, pokemon: &PokemonState) -> bool {
    let species = entry.species_id();
    pokemon.species() == species
        || pokemon.identity.base_name == species
        || pokemon.answers_to(entry.nickname())
}

/// Copy everything a request states outright onto `pokemon`
///
/// `slots` carries exact pp and is only present for the active Pokemon.
fn apply_entry(pokemon: &mut PokemonState, entry: &SidePokemon, slots: &[MoveSlot], dex: &dyn Dex) {
    let species = entry.species_id();
    if pokemon.species() != species {
        debug!(from = pokemon.species(), to = %species, "request shows a different forme");
        pokemon.identity.species = species.clone();
        if let Some(data) = dex.species(&species) {
            pokemon.types = data.types.clone();
        }
    }
    pokemon.identity.level = entry.parsed_details().level_or_default();

    if let Some(hp) = entry.hp_status() {
        pokemon.apply_hp_status(&hp, true);
    }
    if !pokemon.fainted {
        pokemon.status = entry.status().and_then(Status::from_protocol);
    }

    let stats = &entry.stats;
    pokemon.stats.hp = pokemon.max_hp;
    pokemon.stats.atk = stats.atk;
    pokemon.stats.def = stats.def;
    pokemon.stats.spa = stats.spa;
    pokemon.stats.spd = stats.spd;
    pokemon.stats.spe = stats.spe;

    match to_id(&entry.item) {
        id if id.is_empty() => {
            pokemon.item = Item::Empty;
            pokemon.item_inferred = false;
        }
        id => pokemon.reveal_item(&id),
    }

    if let Some(ability) = entry.ability_id() {
        pokemon.reveal_ability(&ability);
    }
    if !entry.base_ability.is_empty() {
        pokemon.original_ability = Some(to_id(&entry.base_ability));
    }

    if let Some(tera) = entry.teratype.as_deref().and_then(Type::from_protocol) {
        pokemon.tera_type = Some(tera);
    }
    if let Some(tera) = entry
        .terastallized
        .as_deref()
        .filter(|t| !t.is_empty())
    {
        pokemon.terastallized = true;
        pokemon.tera_type = Type::from_protocol(tera).or(pokemon.tera_type);
    }

    // Transformed Pokemon report the copied moves; keep what Transform set up
    if pokemon.has_volatile(&Volatile::Transform) {
        return;
    }
    pokemon.moves = entry
        .moves
        .iter()
        .map(|id| {
            let slot = slots.iter().find(|s| to_id(&s.id) == *id);
            let known = pokemon.get_move(id).cloned();
            match (slot, known) {
                (Some(slot), _) => KnownMove {
                    id: id.clone(),
                    pp: clamp_pp(slot.pp),
                    max_pp: clamp_pp(slot.max_pp),
                    disabled: slot.is_disabled(),
                },
                (None, Some(mut known)) => {
                    known.id = id.clone();
                    known
                }
                (None, None) => {
                    KnownMove::new(id, dex.move_data(id).map(|d| d.max_pp()).unwrap_or(0))
                }
            }
        })
        .collect();
}

impl TrackedBattle {
    /// Take in a decoded `|request|`
    ///
    /// Sets the request flags and, unless the request only asks the bot to
    /// wait, brings the bot's roster in line with it.
    pub fn update_from_request(&mut self, request: &BattleRequest) {
        if let Some(player) = request.side.as_ref().and_then(|s| s.player())
            && player != self.perspective
        {
            debug!(player = player.as_str(), "perspective set by request");
            self.perspective = player;
        }

        self.battle.force_switch = request.is_force_switch();
        self.battle.wait = request.wait;
        self.battle.team_preview = request.team_preview;

        self.request = Some(request.clone());
        if !request.wait {
            self.sync_roster();
        }
    }

    /// Every request entry gets a tracked counterpart on the bot's side
    fn sync_roster(&mut self) {
        let Some(request) = self.request.as_ref() else {
            return;
        };
        let Some(side_info) = request.side.as_ref() else {
            return;
        };
        let slots = request.active_moves();
        let dex = self.dex.as_ref();
        let side = &mut self.battle.user;

        for entry in &side_info.pokemon {
            if entry.active
                && let Some(active) = side.active.as_mut()
                && describes(entry, active)
            {
                apply_entry(active, entry, slots, dex);
                continue;
            }

            let index = side.reserve.iter().position(|p| describes(entry, p));
            let pokemon = match index {
                Some(index) => &mut side.reserve[index],
                None => {
                    let species = entry.species_id();
                    let level = entry.parsed_details().level_or_default();
                    let mut created = new_pokemon(dex, &species, level);
                    if to_id(entry.nickname()) != species {
                        created.identity.nickname = Some(entry.nickname().to_string());
                    }
                    side.reserve.push(created);
                    let last = side.reserve.len() - 1;
                    &mut side.reserve[last]
                }
            };
            apply_entry(pokemon, entry, &[], dex);
        }
    }

    /// Fill a Pokemon switching in on the bot's side from the last request
    pub(crate) fn sync_from_request(&self, pokemon: &mut PokemonState) {
        let Some(request) = self.request.as_ref() else {
            return;
        };
        let Some(entry) = request
            .side
            .as_ref()
            .and_then(|side| side.pokemon.iter().find(|entry| describes(entry, pokemon)))
        else {
            return;
        };
        let slots = if entry.active {
            request.active_moves()
        } else {
            &[]
        };
        apply_entry(pokemon, entry, slots, self.dex.as_ref());
    }
}
