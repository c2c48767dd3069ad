//! Deductions about hidden information that no single line states outright
//!
//! Every check here abstains on ambiguity: it leaves bounds and exclusion sets
//! untouched rather than guessing.

pub mod boots;
pub mod illusion;
pub mod items;
pub mod speed;

use scry_protocol::ServerMessage;
use scry_protocol::server::{HpStatus, Player, to_id};
use serde::{Deserialize, Serialize};

use crate::types::{Battle, PokemonState, SideRole};

/// Damage one move did to the opposing active Pokemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageDealt {
    pub attacker: String,
    pub defender: String,
    pub move_id: String,
    /// Fraction of the defender's max HP removed (0.0 to 1.0)
    pub percent_damage: f64,
    pub crit: bool,
}

/// Lines that belong to the same action as the line before them
pub(crate) fn action_window(following: &[ServerMessage]) -> &[ServerMessage] {
    let end = following
        .iter()
        .position(|msg| {
            matches!(
                msg,
                ServerMessage::Move { .. }
                    | ServerMessage::Switch { .. }
                    | ServerMessage::Drag { .. }
                    | ServerMessage::Upkeep
                    | ServerMessage::Turn(_)
            )
        })
        .unwrap_or(following.len());
    &following[..end]
}

pub(crate) fn active(battle: &Battle, perspective: Player, player: Player) -> Option<&PokemonState> {
    battle.side(SideRole::of(player, perspective)).active.as_ref()
}

/// Fraction of max HP lost going from `before` to what `after` reports
fn hp_lost(before: &PokemonState, after: &HpStatus) -> f64 {
    if before.max_hp == 0 {
        return 0.0;
    }
    if after.is_fainted() {
        return before.hp as f64 / before.max_hp as f64;
    }

    let (hp, max) = (before.hp as i64, before.max_hp as i64);
    let (current, scale) = match after.max {
        Some(line_max) if line_max > 0 => (after.current as i64, line_max as i64),
        _ => (after.current as i64, max),
    };
    let lost = hp * scale - current * max;
    (lost.max(0) as f64) / (max * scale) as f64
}

/// The first direct damage the move in `msg` did to the opposing active Pokemon
///
/// Runs before the lines in `following` are applied, so the defender's HP is
/// still its pre-move value. Damage with a `[from]` source (recoil, Life Orb,
/// hazards) is never attributed to the move.
pub fn damage_dealt(
    battle: &Battle,
    perspective: Player,
    msg: &ServerMessage,
    following: &[ServerMessage],
) -> Option<DamageDealt> {
    let ServerMessage::Move {
        pokemon, move_name, ..
    } = msg
    else {
        return None;
    };

    let attacker = active(battle, perspective, pokemon.player)?;
    let defender_player = opposing(pokemon.player);
    let defender = active(battle, perspective, defender_player)?;

    let mut crit = false;
    for line in action_window(following) {
        match line {
            ServerMessage::Crit(target) if target.player == defender_player => crit = true,
            ServerMessage::Damage {
                pokemon: target,
                hp_status: Some(hp_status),
                tags,
            } if target.player == defender_player && tags.from.is_none() => {
                return Some(DamageDealt {
                    attacker: attacker.species().to_string(),
                    defender: defender.species().to_string(),
                    move_id: to_id(move_name),
                    percent_damage: hp_lost(defender, hp_status),
                    crit,
                });
            }
            _ => {}
        }
    }
    None
}

/// The other player in a singles battle
pub(crate) fn opposing(player: Player) -> Player {
    match player {
        Player::P1 => Player::P2,
        _ => Player::P1,
    }
}
