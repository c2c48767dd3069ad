//! Routing of server messages to state mutators

use scry_protocol::ServerMessage;
use scry_protocol::server::{BattleRequest, Effect, GameType, Stat, to_id};
use tracing::{debug, trace};

use super::battle::TrackedBattle;
use crate::config::BattleType;
use crate::types::{SideRole, StatStages, Type, Volatile};

impl TrackedBattle {
    /// Update battle state from a server message
    pub fn update(&mut self, msg: &ServerMessage) {
        trace!(?msg, "dispatching");

        match msg {
            // === Battle Initialization ===
            ServerMessage::BattlePlayer {
                player, username, ..
            } => {
                self.side_mut(*player).username = Some(username.clone());
            }

            ServerMessage::GameType(game_type) => {
                if *game_type != GameType::Singles {
                    debug!(game_type = game_type.as_str(), "not a singles battle");
                }
            }

            ServerMessage::Gen(generation) => {
                self.battle.generation = *generation;
            }

            ServerMessage::Tier(tier) => match BattleType::from_format(tier) {
                Ok(battle_type) => self.battle.battle_type = battle_type,
                Err(err) => debug!(%err, tier, "keeping configured battle type"),
            },

            ServerMessage::ClearPoke | ServerMessage::TeamPreview(_) => {
                self.battle.team_preview = true;
            }

            ServerMessage::Poke {
                player, details, ..
            } => {
                self.handle_poke(*player, details);
            }

            ServerMessage::BattleStart => {
                self.battle.team_preview = false;
            }

            ServerMessage::TeamSize { .. } | ServerMessage::Rated(_) | ServerMessage::Rule(_) => {}

            // === Battle Progress ===
            ServerMessage::Request(json) => {
                if json.is_null() {
                    return;
                }
                match BattleRequest::parse(json) {
                    Some(request) => self.update_from_request(&request),
                    None => debug!("ignoring undecodable request"),
                }
            }

            ServerMessage::Inactive(text) => {
                if let Some(seconds) = parse_time_left(text) {
                    self.battle.time_remaining = Some(seconds);
                }
            }

            ServerMessage::InactiveOff(_) => {
                self.battle.time_remaining = None;
            }

            ServerMessage::Upkeep => {
                self.handle_upkeep();
            }

            ServerMessage::Turn(turn) => {
                self.battle.turn = *turn;
            }

            ServerMessage::NoInit { reason, args } => {
                if reason == "rename"
                    && let Some(tag) = args.first()
                {
                    self.battle.battle_tag = Some(tag.clone());
                }
            }

            ServerMessage::Split(_) => {}

            // === Major Actions ===
            ServerMessage::Move {
                pokemon,
                move_name,
                tags,
                ..
            } => {
                self.handle_move(pokemon, move_name, tags);
            }

            ServerMessage::Switch {
                pokemon,
                details,
                hp_status,
                tags,
            } => {
                self.handle_switch(pokemon, details, hp_status.as_ref(), tags, false);
            }

            ServerMessage::Drag {
                pokemon,
                details,
                hp_status,
                tags,
            } => {
                self.handle_switch(pokemon, details, hp_status.as_ref(), tags, true);
            }

            ServerMessage::Replace {
                pokemon,
                details,
                hp_status,
            } => {
                self.handle_replace(pokemon, details, hp_status.as_ref());
            }

            ServerMessage::DetailsChange {
                pokemon,
                details,
                hp_status,
            } => {
                self.handle_forme_change(pokemon, &details.species, hp_status.as_ref());
            }

            ServerMessage::FormeChange {
                pokemon,
                species,
                hp_status,
                ..
            } => {
                self.handle_forme_change(pokemon, species, hp_status.as_ref());
            }

            ServerMessage::Cant {
                pokemon,
                reason,
                move_name,
            } => {
                self.handle_cant(pokemon, reason, move_name.as_deref());
            }

            ServerMessage::Faint(pokemon) => {
                self.handle_faint(pokemon);
            }

            ServerMessage::Swap { .. } => {
                debug!("ignoring slot swap in a singles battle");
            }

            // === HP Changes ===
            ServerMessage::Damage {
                pokemon,
                hp_status,
                tags,
            } => {
                self.handle_hp_change(pokemon, hp_status.as_ref(), tags, false);
            }

            ServerMessage::Heal {
                pokemon,
                hp_status,
                tags,
            } => {
                self.handle_hp_change(pokemon, hp_status.as_ref(), tags, true);
            }

            ServerMessage::SetHp { pokemon, hp_status } => {
                let exact = self.role(pokemon.player) == SideRole::User;
                if let (Some(poke), Some(hp)) = (self.pokemon_mut(pokemon), hp_status) {
                    poke.apply_hp_status(hp, exact);
                }
            }

            // === Status ===
            ServerMessage::Status {
                pokemon,
                status,
                tags,
            } => {
                self.handle_status(pokemon, status, tags);
            }

            ServerMessage::CureStatus {
                pokemon,
                status,
                tags,
            } => {
                self.handle_cure_status(pokemon, status, tags);
            }

            ServerMessage::CureTeam(pokemon) => {
                let side = self.side_mut(pokemon.player);
                for poke in side.active.iter_mut().chain(side.reserve.iter_mut()) {
                    poke.status = None;
                    poke.sleep_turns = 0;
                    poke.rest_turns = 0;
                }
            }

            // === Boosts ===
            ServerMessage::Boost {
                pokemon,
                stat,
                amount,
                tags,
            } => {
                self.handle_boost(pokemon, *stat, *amount, tags);
            }

            ServerMessage::Unboost {
                pokemon,
                stat,
                amount,
                tags,
            } => {
                self.handle_boost(pokemon, *stat, amount.saturating_neg(), tags);
            }

            ServerMessage::SetBoost {
                pokemon,
                stat,
                amount,
            } => {
                if let Some(poke) = self.pokemon_mut(pokemon) {
                    poke.boosts.set(*stat, *amount);
                }
            }

            ServerMessage::SwapBoost {
                source,
                target,
                stats,
            } => {
                self.swap_boosts(source, target, stats);
            }

            ServerMessage::InvertBoost(pokemon) => {
                if let Some(poke) = self.pokemon_mut(pokemon) {
                    poke.boosts.invert();
                }
            }

            ServerMessage::ClearBoost(pokemon) => {
                if let Some(poke) = self.pokemon_mut(pokemon) {
                    poke.boosts.clear();
                }
            }

            ServerMessage::ClearAllBoost => {
                for side in [&mut self.battle.user, &mut self.battle.opponent] {
                    if let Some(active) = side.active.as_mut() {
                        active.boosts.clear();
                    }
                }
            }

            ServerMessage::ClearPositiveBoost { target, .. } => {
                if let Some(poke) = self.pokemon_mut(target) {
                    poke.boosts.clear_positive();
                }
            }

            ServerMessage::ClearNegativeBoost(pokemon) => {
                if let Some(poke) = self.pokemon_mut(pokemon) {
                    poke.boosts.clear_negative();
                }
            }

            ServerMessage::CopyBoost { source, target } => {
                let copied = self.pokemon(target).map(|p| p.boosts.clone());
                if let (Some(boosts), Some(poke)) = (copied, self.pokemon_mut(source)) {
                    poke.boosts.copy_from(&boosts);
                }
            }

            // === Volatiles ===
            ServerMessage::VolatileStart {
                pokemon,
                effect,
                args,
                tags,
            } => {
                self.handle_volatile_start(pokemon, effect, args, tags);
            }

            ServerMessage::VolatileEnd {
                pokemon,
                effect,
                tags,
            } => {
                self.handle_volatile_end(pokemon, effect, tags);
            }

            ServerMessage::Prepare {
                attacker,
                move_name,
                ..
            } => {
                if let Some(poke) = self.pokemon_mut(attacker) {
                    poke.add_volatile(Volatile::from_id(&to_id(move_name)));
                }
            }

            ServerMessage::MustRecharge(pokemon) => {
                if let Some(poke) = self.pokemon_mut(pokemon) {
                    poke.add_volatile(Volatile::MustRecharge);
                }
            }

            ServerMessage::SingleMove { pokemon, move_name } => {
                if let Some(poke) = self.pokemon_mut(pokemon) {
                    poke.add_volatile(Volatile::from_id(&move_name.id()));
                }
            }

            ServerMessage::SingleTurn { pokemon, move_name } => {
                self.handle_single_turn(pokemon, move_name);
            }

            // === Field Conditions ===
            ServerMessage::Weather {
                weather,
                upkeep,
                tags,
            } => {
                self.handle_weather(weather, *upkeep, tags);
            }

            ServerMessage::FieldStart { condition, tags } => {
                self.handle_field_start(condition, tags);
            }

            ServerMessage::FieldEnd { condition } => {
                self.battle.field.apply_field_end(condition);
            }

            // === Side Conditions ===
            ServerMessage::SideStart { side, condition } => {
                self.handle_side_start(side.player, condition);
            }

            ServerMessage::SideEnd {
                side, condition, ..
            } => {
                self.handle_side_end(side.player, condition);
            }

            ServerMessage::SwapSideConditions => {
                self.swap_side_conditions();
            }

            // === Items and Abilities ===
            ServerMessage::Item {
                pokemon,
                item,
                tags,
            } => {
                self.handle_item(pokemon, item, tags);
            }

            ServerMessage::EndItem {
                pokemon,
                item,
                tags,
            } => {
                self.handle_end_item(pokemon, item, tags);
            }

            ServerMessage::Ability {
                pokemon,
                ability,
                tags,
                ..
            } => {
                self.handle_ability(pokemon, ability, tags);
            }

            ServerMessage::EndAbility(pokemon) => {
                if let Some(poke) = self.pokemon_mut(pokemon) {
                    poke.add_volatile(Volatile::GastroAcid);
                }
            }

            ServerMessage::Activate {
                pokemon,
                effect,
                args,
                tags,
            } => {
                if let Some(pokemon) = pokemon {
                    self.handle_activate(pokemon, effect, args, tags);
                }
            }

            ServerMessage::Block {
                pokemon, effect, ..
            } => {
                if let Some(poke) = self.pokemon_mut(pokemon) {
                    match effect {
                        Effect::Ability(name) => poke.reveal_ability(&to_id(name)),
                        Effect::Item(name) => poke.reveal_item(&to_id(name)),
                        _ => {}
                    }
                }
            }

            ServerMessage::Fail { pokemon, tags, .. } => {
                let owner = tags.of.as_ref().unwrap_or(pokemon).clone();
                self.reveal_source(&owner, tags);
            }

            ServerMessage::Immune { pokemon, tags } => {
                self.reveal_source(pokemon, tags);
            }

            // === Transformations ===
            ServerMessage::Transform {
                pokemon,
                target,
                tags,
            } => {
                self.handle_transform(pokemon, target, tags);
            }

            ServerMessage::Mega { pokemon, megastone } => {
                if let Some(poke) = self.pokemon_mut(pokemon) {
                    poke.reveal_item(&to_id(megastone));
                }
            }

            ServerMessage::Primal(pokemon) => {
                if let Some(poke) = self.pokemon_mut(pokemon) {
                    let orb = match poke.identity.base_name.as_str() {
                        "groudon" => Some("redorb"),
                        "kyogre" => Some("blueorb"),
                        _ => None,
                    };
                    if let Some(orb) = orb {
                        poke.reveal_item(orb);
                    }
                }
            }

            ServerMessage::Burst { pokemon, item, .. } => {
                if let Some(poke) = self.pokemon_mut(pokemon) {
                    poke.reveal_item(&to_id(item));
                }
            }

            ServerMessage::Terastallize { pokemon, tera_type } => {
                if let Some(poke) = self.pokemon_mut(pokemon) {
                    poke.terastallized = true;
                    poke.tera_type = Type::from_protocol(tera_type);
                }
            }

            ServerMessage::ZPower(pokemon) => {
                if self.role(pokemon.player) == SideRole::Opponent
                    && let Some(poke) = self.pokemon_mut(pokemon)
                {
                    poke.item = crate::types::Item::Empty;
                    poke.item_inferred = false;
                }
            }

            // === Battle End ===
            ServerMessage::Win(winner) => {
                self.battle.ended = true;
                self.battle.winner = Some(winner.clone());
            }

            ServerMessage::Tie => {
                self.battle.ended = true;
                self.battle.winner = None;
            }

            // === Ignored Messages ===
            // Read by lookahead deductions, no state of their own
            ServerMessage::Crit(_)
            | ServerMessage::SuperEffective(_)
            | ServerMessage::Resisted(_)
            | ServerMessage::Miss { .. }
            | ServerMessage::NoTarget(_)
            | ServerMessage::HitCount { .. }
            | ServerMessage::ZBroken(_)
            | ServerMessage::Waiting { .. }
            | ServerMessage::Nothing
            | ServerMessage::Center
            | ServerMessage::Combine => {}

            // === Non-battle messages ===
            ServerMessage::Hint(_) | ServerMessage::Message(_) | ServerMessage::Raw(_) => {}
        }
    }

    fn swap_boosts(
        &mut self,
        source: &scry_protocol::server::Pokemon,
        target: &scry_protocol::server::Pokemon,
        stats: &[Stat],
    ) {
        let (Some(a), Some(b)) = (
            self.pokemon(source).map(|p| p.boosts.clone()),
            self.pokemon(target).map(|p| p.boosts.clone()),
        ) else {
            return;
        };

        let swap = |mine: &StatStages, theirs: &StatStages| {
            if stats.is_empty() {
                return theirs.clone();
            }
            let mut swapped = mine.clone();
            for stat in stats {
                swapped.set(*stat, theirs.get(*stat));
            }
            swapped
        };

        let (new_a, new_b) = (swap(&a, &b), swap(&b, &a));
        if let Some(poke) = self.pokemon_mut(source) {
            poke.boosts = new_a;
        }
        if let Some(poke) = self.pokemon_mut(target) {
            poke.boosts = new_b;
        }
    }
}

/// Seconds left from "Time left: 135 sec this turn | 135 sec total"
fn parse_time_left(text: &str) -> Option<u32> {
    let rest = text.trim().strip_prefix("Time left:")?;
    rest.split_whitespace().next()?.parse().ok()
}
