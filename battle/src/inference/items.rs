//! Items ruled out by what an attack did not trigger

use scry_protocol::ServerMessage;
use scry_protocol::server::{Player, to_id};
use tracing::debug;

use super::{action_window, opposing};
use crate::dex::Dex;
use crate::types::{Battle, Item, PokemonState};

/// Moves that hit on a later turn, after the item check would have happened
const DELAYED_MOVES: &[&str] = &["futuresight", "doomdesire"];

fn could_have(pokemon: &PokemonState, dex: &dyn Dex, id: &str) -> bool {
    pokemon.can_have_ability(id, dex.abilities(pokemon.species()))
}

/// An opposing damaging move hit without Life Orb recoil or a gem activation
///
/// Runs right after the opponent's `move` line has been applied. Abstains when
/// the hit is not visible (a substitute took it, it missed) or the attacker
/// fainted before recoil could be shown.
pub fn check_attack_items(
    battle: &mut Battle,
    dex: &dyn Dex,
    perspective: Player,
    msg: &ServerMessage,
    following: &[ServerMessage],
) {
    let ServerMessage::Move {
        move_name, tags, ..
    } = msg
    else {
        return;
    };
    if tags.from.is_some() {
        return;
    }

    let move_id = to_id(move_name);
    if DELAYED_MOVES.contains(&move_id.as_str()) {
        return;
    }
    let Some(data) = dex.move_data(&move_id) else {
        return;
    };
    if !data.is_damaging() {
        return;
    }

    let attacker = opposing(perspective);
    let window = action_window(following);

    let mut hit = false;
    let mut recoil = false;
    let mut gem = false;
    let mut attacker_fainted = false;
    for line in window {
        match line {
            ServerMessage::Damage { pokemon, tags, .. } if pokemon.player == perspective => {
                hit |= tags.from.is_none();
            }
            ServerMessage::Damage {
                pokemon,
                hp_status,
                tags,
            } if pokemon.player == attacker => {
                recoil |= tags.from_id().as_deref() == Some("lifeorb");
                attacker_fainted |= hp_status.as_ref().is_some_and(|hp| hp.is_fainted());
            }
            ServerMessage::EndItem { pokemon, item, .. } if pokemon.player == attacker => {
                gem |= to_id(item).ends_with("gem");
            }
            ServerMessage::Faint(pokemon) if pokemon.player == attacker => attacker_fainted = true,
            _ => {}
        }
    }
    if !hit || attacker_fainted {
        return;
    }

    let gems = battle.policy().gems;
    let Some(pokemon) = battle.opponent.active.as_mut() else {
        return;
    };
    if !matches!(pokemon.item, Item::Unknown) {
        return;
    }

    let sheer_force = could_have(pokemon, dex, "sheerforce");
    let magic_guard = could_have(pokemon, dex, "magicguard");
    if !recoil && !sheer_force && !magic_guard && pokemon.impossible_items.exclude("lifeorb") {
        debug!(species = pokemon.species(), move_id, "no recoil, ruling out life orb");
    }

    if gems && !gem {
        let gem_id = data.move_type.gem();
        if pokemon.impossible_items.exclude(gem_id.as_str()) {
            debug!(species = pokemon.species(), gem_id, "no gem activation");
        }
    }
}
