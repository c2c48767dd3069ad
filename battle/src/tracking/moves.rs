//! `move` and `cant` lines

use std::sync::Arc;

use scry_protocol::server::{Effect, Pokemon, Tags, to_id};
use tracing::debug;

use super::battle::TrackedBattle;
use crate::inference::illusion;
use crate::policy::SleepOnSwitch;
use crate::types::{
    CHOICE_ITEMS, Item, LastUsedMove, SideCondition, SideRole, Status, Volatile,
};

/// Abilities that use a move the holder does not know, sometimes written without a prefix
const BORROWING_ABILITIES: &[&str] = &["magicbounce", "dancer"];

/// `cant` reasons that name the move they stopped
const MOVE_BLOCKERS: &[&str] = &["disable", "taunt", "imprison", "throatchop", "healblock", "gravity"];

impl TrackedBattle {
    pub(crate) fn handle_move(&mut self, ident: &Pokemon, move_name: &str, tags: &Tags) {
        let role = self.role(ident.player);
        let move_id = to_id(move_name);
        let from = tags.from_id();
        let policy = self.battle.policy();
        let turn = self.battle.turn;
        let infer = self.config.infer_hidden_information;
        let dex = Arc::clone(&self.dex);
        let data = dex.move_data(&move_id);

        if role == SideRole::Opponent && from.is_none() && infer {
            illusion::check_move(&mut self.battle, dex.as_ref(), &move_id);
        }

        match (&tags.from, from.as_deref()) {
            (_, None | Some("lockedmove")) => {}
            (_, Some("sleeptalk")) => {
                let Some(pokemon) = self.pokemon_mut(ident) else {
                    return;
                };
                pokemon.add_move(&move_id, data.map(|d| d.max_pp()).unwrap_or(0));
                pokemon.moves_used_since_switch_in.insert(move_id);
                if policy.sleep_on_switch == SleepOnSwitch::CarrySleepTalks {
                    pokemon.gen3_consecutive_sleep_talks =
                        pokemon.gen3_consecutive_sleep_talks.saturating_add(1);
                }
                return;
            }
            (Some(Effect::Ability(name)), _) => {
                if let Some(pokemon) = self.pokemon_mut(ident) {
                    pokemon.reveal_ability(&to_id(name));
                }
                return;
            }
            // Magic Coat, Metronome, Copycat and the like
            (_, Some(source)) => {
                if BORROWING_ABILITIES.contains(&source)
                    && let Some(pokemon) = self.pokemon_mut(ident)
                {
                    pokemon.reveal_ability(source);
                }
                return;
            }
        }

        let pressure = self
            .battle
            .side(role.other())
            .active
            .as_ref()
            .is_some_and(|p| p.ability.as_deref() == Some("pressure"));

        let side = self.battle.side_mut(role);
        let previous = side.last_used_move.clone();
        let Some(pokemon) = side.active.as_mut() else {
            return;
        };
        let species = pokemon.species().to_string();

        // === Moveset and pp ===
        match data {
            Some(data) => {
                let known = pokemon.add_move(&move_id, data.max_pp());
                if from.is_none() {
                    let cost = if pressure { 2 } else { 1 };
                    known.pp = known.pp.saturating_sub(cost);
                }
            }
            None => {
                pokemon.add_move(&move_id, 0);
            }
        }
        pokemon.moves_used_since_switch_in.insert(move_id.clone());

        // === Volatiles ===
        if let charge @ Volatile::Other(_) = Volatile::from_id(&move_id) {
            pokemon.remove_volatile(&charge);
        }
        pokemon.remove_volatile(&Volatile::DestinyBond);

        if pokemon.has_volatile(&Volatile::Encore) {
            let turns = pokemon.volatile_duration(&Volatile::Encore);
            pokemon.set_volatile_duration(Volatile::Encore, turns.saturating_add(1));
        }
        if !policy.upkeep_advances_taunt && pokemon.has_volatile(&Volatile::Taunt) {
            let turns = pokemon.volatile_duration(&Volatile::Taunt);
            pokemon.set_volatile_duration(Volatile::Taunt, turns.saturating_add(1));
        }

        if policy.gen1_stat_nullify {
            match (pokemon.status, move_id.as_str()) {
                (Some(Status::Burn), "swordsdance" | "meditate") => {
                    pokemon.add_volatile(Volatile::Gen1BurnNullify);
                }
                (Some(Status::Paralysis), "agility") => {
                    pokemon.add_volatile(Volatile::Gen1ParalysisNullify);
                }
                _ => {}
            }
        }

        if pokemon.ability.as_deref() == Some("truant") || species == "slaking" {
            pokemon.add_volatile(Volatile::Truant);
        }

        if policy.sleep_on_switch == SleepOnSwitch::CarrySleepTalks && move_id != "sleeptalk" {
            pokemon.gen3_consecutive_sleep_talks = 0;
        }

        // === Items the move rules out ===
        if role == SideRole::Opponent && infer {
            if data.is_some_and(|d| d.is_status()) {
                pokemon.exclude_item("assaultvest");
            }

            let switched_moves = previous
                .as_ref()
                .filter(|last| last.pokemon.as_deref() == Some(species.as_str()))
                .and_then(|last| last.move_id())
                .is_some_and(|last| last != move_id);
            let self_boost = data.is_some_and(|d| d.is_self_boosting());
            if switched_moves || self_boost {
                if pokemon.item_inferred && pokemon.item.is_choice() {
                    debug!(species, move_id, "choice lock broken, dropping inferred item");
                    pokemon.item = Item::Unknown;
                    pokemon.item_inferred = false;
                }
                for choice in CHOICE_ITEMS {
                    pokemon.exclude_item(choice);
                }
            }
        }

        let max_hp = pokemon.max_hp;

        // === Side effects ===
        match move_id.as_str() {
            "wish" if !tags.has_flag("still") => side.wish = (2, max_hp / 2),
            "healingwish" | "lunardance" => side.set_condition(SideCondition::HealingWish, 1),
            _ => {}
        }

        side.last_used_move = Some(LastUsedMove {
            pokemon: Some(species),
            action: move_id,
            turn,
        });
    }

    pub(crate) fn handle_cant(&mut self, ident: &Pokemon, reason: &Effect, move_name: Option<&str>) {
        let dex = Arc::clone(&self.dex);
        let Some(pokemon) = self.pokemon_mut(ident) else {
            return;
        };

        let reason = reason.id();
        match reason.as_str() {
            "slp" => {
                if pokemon.rest_turns > 0 {
                    pokemon.rest_turns -= 1;
                } else {
                    pokemon.sleep_turns = pokemon.sleep_turns.saturating_add(1);
                }
            }
            "truant" => {
                pokemon.remove_volatile(&Volatile::Truant);
            }
            "recharge" => {
                pokemon.remove_volatile(&Volatile::MustRecharge);
            }
            _ => {}
        }

        if let Some(name) = move_name
            && MOVE_BLOCKERS.contains(&reason.as_str())
        {
            let id = to_id(name);
            let max_pp = dex.move_data(&id).map(|d| d.max_pp()).unwrap_or(0);
            pokemon.add_move(&id, max_pp);
        }
    }
}
