//! End-of-turn bookkeeping

use tracing::trace;

use super::battle::TrackedBattle;
use super::field::EXTENSION_OVERRUN_TURNS;
use crate::types::{PokemonState, SideCondition, SideRole, SideState, Volatile};

/// Items that would have shown themselves during the residual phase
const RESIDUAL_HEAL_ITEMS: &[&str] = &["leftovers", "blacksludge"];
const STATUS_ORBS: &[&str] = &["flameorb", "toxicorb"];

fn advance_conditions(side: &mut SideState) {
    for (cond, turns) in side.conditions.iter_mut() {
        if *turns == 0 {
            continue;
        }
        match cond {
            // Still up after its last turn: Light Clay
            _ if cond.is_screen() && *turns == 1 => *turns = EXTENSION_OVERRUN_TURNS,
            SideCondition::Protect => *turns -= 1,
            _ if cond.counts_down() => *turns -= 1,
            _ => {}
        }
    }

    side.wish.0 = side.wish.0.saturating_sub(1);
    side.future_sight.0 = side.future_sight.0.saturating_sub(1);
}

fn advance_volatiles(pokemon: &mut PokemonState, upkeep_advances_taunt: bool) {
    if upkeep_advances_taunt && pokemon.has_volatile(&Volatile::Taunt) {
        let turns = pokemon.volatile_duration(&Volatile::Taunt);
        pokemon.set_volatile_duration(Volatile::Taunt, turns.saturating_add(1));
    }

    if pokemon.has_volatile(&Volatile::LockedMove) {
        let turns = pokemon.volatile_duration(&Volatile::LockedMove);
        pokemon.set_volatile_duration(Volatile::LockedMove, turns.saturating_add(1));
    }

    if pokemon.has_volatile(&Volatile::Yawn) {
        match pokemon.volatile_duration(&Volatile::Yawn) {
            0 => pokemon.set_volatile_duration(Volatile::Yawn, 1),
            // Drowsy for a full turn: asleep now
            _ => {
                pokemon.remove_volatile(&Volatile::Yawn);
            }
        }
    }

    if pokemon.has_volatile(&Volatile::SlowStart) {
        let turns = pokemon.volatile_duration(&Volatile::SlowStart);
        pokemon.set_volatile_duration(Volatile::SlowStart, turns.saturating_sub(1));
    }
}

/// Residual items that stayed silent this turn
fn exclude_silent_items(pokemon: &mut PokemonState) {
    if !pokemon.is_alive() {
        return;
    }
    if pokemon.hp < pokemon.max_hp {
        for &item in RESIDUAL_HEAL_ITEMS {
            pokemon.exclude_item(item);
        }
    }
    if pokemon.status.is_none() {
        for &item in STATUS_ORBS {
            pokemon.exclude_item(item);
        }
    }
    trace!(species = pokemon.species(), "residual items checked");
}

impl TrackedBattle {
    /// `|upkeep|`: advance every counter that moves once per turn
    pub(crate) fn handle_upkeep(&mut self) {
        let policy = self.battle.policy();
        let infer = self.config.infer_hidden_information;

        for role in [SideRole::User, SideRole::Opponent] {
            let side = self.battle.side_mut(role);
            advance_conditions(side);

            let used_sleep_talk = side
                .last_used_move
                .as_ref()
                .and_then(|m| m.move_id())
                .is_some_and(|id| id == "sleeptalk");
            let Some(pokemon) = side.active.as_mut() else {
                continue;
            };

            advance_volatiles(pokemon, policy.upkeep_advances_taunt);
            if !used_sleep_talk {
                pokemon.gen3_consecutive_sleep_talks = 0;
            }
            if role == SideRole::Opponent && infer {
                exclude_silent_items(pokemon);
            }
        }

        self.battle.field.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::types::{Item, Status, Terrain};

    fn battle_with_actives(generation: u8) -> TrackedBattle {
        let mut battle = TrackedBattle::with_config(TrackerConfig {
            generation,
            ..Default::default()
        });
        battle.battle_mut().user.active = Some(PokemonState::new("Weedle", 100));
        battle.battle_mut().opponent.active = Some(PokemonState::new("Caterpie", 100));
        battle
    }

    fn opponent_mut(battle: &mut TrackedBattle) -> &mut PokemonState {
        battle.battle_mut().opponent.active.as_mut().unwrap()
    }

    fn user_mut(battle: &mut TrackedBattle) -> &mut PokemonState {
        battle.battle_mut().user.active.as_mut().unwrap()
    }

    #[test]
    fn test_taunt_advances_at_upkeep_only_before_gen5() {
        for (generation, expected) in [(3, 1), (5, 0)] {
            let mut battle = battle_with_actives(generation);
            opponent_mut(&mut battle).add_volatile(Volatile::Taunt);
            battle.apply_line("|upkeep");
            let caterpie = battle.battle().opponent.active.as_ref().unwrap();
            assert_eq!(caterpie.volatile_duration(&Volatile::Taunt), expected);
        }
    }

    #[test]
    fn test_volatile_counters() {
        let mut battle = battle_with_actives(9);
        user_mut(&mut battle).add_volatile(Volatile::SlowStart);
        user_mut(&mut battle).set_volatile_duration(Volatile::SlowStart, 5);
        opponent_mut(&mut battle).add_volatile(Volatile::LockedMove);
        battle.apply_line("|upkeep");

        let weedle = battle.battle().user.active.as_ref().unwrap();
        assert_eq!(weedle.volatile_duration(&Volatile::SlowStart), 4);
        let caterpie = battle.battle().opponent.active.as_ref().unwrap();
        assert_eq!(caterpie.volatile_duration(&Volatile::LockedMove), 1);
    }

    #[test]
    fn test_yawn_runs_two_upkeeps() {
        let mut battle = battle_with_actives(9);
        opponent_mut(&mut battle).add_volatile(Volatile::Yawn);
        battle.apply_line("|upkeep");
        let caterpie = battle.battle().opponent.active.as_ref().unwrap();
        assert!(caterpie.has_volatile(&Volatile::Yawn));
        assert_eq!(caterpie.volatile_duration(&Volatile::Yawn), 1);

        battle.apply_line("|upkeep");
        let caterpie = battle.battle().opponent.active.as_ref().unwrap();
        assert!(!caterpie.has_volatile(&Volatile::Yawn));
        assert_eq!(caterpie.volatile_duration(&Volatile::Yawn), 0);
    }

    #[test]
    fn test_side_counters() {
        let mut battle = battle_with_actives(9);
        {
            let side = &mut battle.battle_mut().opponent;
            side.set_condition(SideCondition::Reflect, 5);
            side.set_condition(SideCondition::LightScreen, 1);
            side.set_condition(SideCondition::AuroraVeil, 1);
            side.set_condition(SideCondition::Tailwind, 2);
            side.set_condition(SideCondition::StealthRock, 1);
            side.wish = (2, 100);
            side.future_sight = (2, "azelf".to_string());
        }
        battle.battle_mut().user.set_condition(SideCondition::Protect, 1);
        battle.battle_mut().user.wish = (0, 100);

        battle.apply_line("|upkeep");
        let opponent = &battle.battle().opponent;
        assert_eq!(opponent.condition(SideCondition::Reflect), 4);
        assert_eq!(opponent.condition(SideCondition::LightScreen), 3);
        assert_eq!(opponent.condition(SideCondition::AuroraVeil), 3);
        assert_eq!(opponent.condition(SideCondition::Tailwind), 1);
        assert_eq!(opponent.condition(SideCondition::StealthRock), 1);
        assert_eq!(opponent.wish, (1, 100));
        assert_eq!(opponent.future_sight, (1, "azelf".to_string()));

        let user = &battle.battle().user;
        assert_eq!(user.condition(SideCondition::Protect), 0);
        assert_eq!(user.wish, (0, 100));
    }

    #[test]
    fn test_field_counters() {
        let mut battle = battle_with_actives(9);
        battle.battle_mut().field.terrain = Some(Terrain::Grassy);
        battle.battle_mut().field.terrain_turns_remaining = 5;
        battle.battle_mut().field.trick_room = true;
        battle.battle_mut().field.trick_room_turns_remaining = 5;
        battle.apply_line("|upkeep");
        assert_eq!(battle.battle().field.terrain_turns_remaining, 4);
        assert_eq!(battle.battle().field.trick_room_turns_remaining, 4);

        battle.battle_mut().field.terrain_turns_remaining = 1;
        battle.apply_line("|upkeep");
        assert_eq!(battle.battle().field.terrain_turns_remaining, 3);

        let mut battle = battle_with_actives(9);
        battle.apply_line("|upkeep");
        assert_eq!(battle.battle().field.terrain_turns_remaining, 0);
    }

    #[test]
    fn test_silent_residual_items() {
        let mut battle = battle_with_actives(9);
        opponent_mut(&mut battle).hp = 50;
        battle.apply_line("|upkeep");
        let caterpie = battle.battle().opponent.active.as_ref().unwrap();
        assert!(caterpie.impossible_items.contains("leftovers"));
        assert!(caterpie.impossible_items.contains("blacksludge"));
        assert!(caterpie.impossible_items.contains("flameorb"));
        assert!(caterpie.impossible_items.contains("toxicorb"));

        let mut battle = battle_with_actives(9);
        opponent_mut(&mut battle).status = Some(Status::Freeze);
        battle.apply_line("|upkeep");
        let caterpie = battle.battle().opponent.active.as_ref().unwrap();
        assert!(!caterpie.impossible_items.contains("flameorb"));
        assert!(!caterpie.impossible_items.contains("leftovers"));
    }

    #[test]
    fn test_known_leftovers_survive_upkeep() {
        let mut battle = battle_with_actives(9);
        opponent_mut(&mut battle).hp = 50;
        opponent_mut(&mut battle).item = Item::held("leftovers");
        battle.apply_line("|upkeep");
        let caterpie = battle.battle().opponent.active.as_ref().unwrap();
        assert!(caterpie.item.is("leftovers"));
        assert!(!caterpie.impossible_items.contains("leftovers"));
    }

    #[test]
    fn test_gen3_sleep_talk_streak() {
        let mut battle = battle_with_actives(3);
        user_mut(&mut battle).status = Some(Status::Sleep);
        user_mut(&mut battle).gen3_consecutive_sleep_talks = 1;
        battle.apply_line("|cant|p1a: Weedle|slp");
        battle.apply_line("|upkeep");
        let weedle = battle.battle().user.active.as_ref().unwrap();
        assert_eq!(weedle.gen3_consecutive_sleep_talks, 0);

        let mut battle = battle_with_actives(3);
        user_mut(&mut battle).status = Some(Status::Sleep);
        user_mut(&mut battle).gen3_consecutive_sleep_talks = 1;
        battle.apply_line("|cant|p1a: Weedle|slp");
        battle.apply_line("|move|p1a: Weedle|Sleep Talk|p1a: Weedle");
        battle.apply_line("|move|p1a: Weedle|Tackle|p2a: Caterpie|[from]Sleep Talk");
        battle.apply_line("|upkeep");
        let weedle = battle.battle().user.active.as_ref().unwrap();
        assert_eq!(weedle.gen3_consecutive_sleep_talks, 2);
        let last = battle.battle().user.last_used_move.as_ref().unwrap();
        assert_eq!(last.move_id(), Some("sleeptalk"));
    }
}
