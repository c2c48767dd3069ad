//! Heavy-Duty Boots from what hazards did (or failed to do) on switch-in

use scry_protocol::ServerMessage;
use scry_protocol::server::Player;
use tracing::debug;

use super::{action_window, opposing};
use crate::dex::Dex;
use crate::types::{Battle, Item, PokemonState, SideCondition, Terrain, Type};

const BOOTS: &str = "heavydutyboots";

/// Whether the abilities the Pokemon could have include `id`
fn could_have(pokemon: &PokemonState, dex: &dyn Dex, id: &str) -> bool {
    pokemon.can_have_ability(id, dex.abilities(pokemon.species()))
}

fn airborne(pokemon: &PokemonState, dex: &dyn Dex) -> bool {
    pokemon.has_type(Type::Flying) || could_have(pokemon, dex, "levitate")
}

/// Whether `hazard` must visibly affect `pokemon` when it is not wearing boots
fn should_affect(battle: &Battle, pokemon: &PokemonState, dex: &dyn Dex, hazard: SideCondition) -> bool {
    let magic_guard = could_have(pokemon, dex, "magicguard");
    match hazard {
        SideCondition::StealthRock => !magic_guard,
        SideCondition::Spikes => !magic_guard && !airborne(pokemon, dex),
        SideCondition::StickyWeb => !airborne(pokemon, dex),
        SideCondition::ToxicSpikes => {
            !airborne(pokemon, dex)
                && pokemon.status.is_none()
                && !pokemon.has_type(Type::Poison)
                && !pokemon.has_type(Type::Steel)
                && battle.field.terrain != Some(Terrain::Misty)
                && !battle.opponent.has_condition(SideCondition::Safeguard)
                && !could_have(pokemon, dex, "immunity")
                && !could_have(pokemon, dex, "pastelveil")
        }
        _ => false,
    }
}

/// Whether a line in the switch-in window shows a hazard taking effect
fn hazard_evidence(msg: &ServerMessage, player: Player) -> bool {
    match msg {
        ServerMessage::Damage { pokemon, tags, .. } if pokemon.player == player => matches!(
            tags.from_id().as_deref(),
            Some("stealthrock" | "spikes")
        ),
        ServerMessage::Status { pokemon, tags, .. } if pokemon.player == player => {
            tags.from.is_none() || tags.from_id().as_deref() == Some("toxicspikes")
        }
        ServerMessage::Activate {
            pokemon: Some(pokemon),
            effect,
            ..
        } if pokemon.player == player => effect.id() == "stickyweb",
        // Grounded Poison types absorb Toxic Spikes
        ServerMessage::SideEnd { side, condition, .. } if side.player == player => {
            condition.id() == "toxicspikes"
        }
        _ => false,
    }
}

/// An opposing switch-in under hazards: boots if nothing happened, no boots if something did
///
/// Runs right after the switch line has been applied. `following` is the rest of
/// the batch; only lines up to the next action count.
pub fn check_heavy_duty_boots(
    battle: &mut Battle,
    dex: &dyn Dex,
    perspective: Player,
    following: &[ServerMessage],
) {
    if !battle.policy().heavy_duty_boots {
        return;
    }
    let player = opposing(perspective);
    let Some(pokemon) = battle.opponent.active.as_ref() else {
        return;
    };
    if !matches!(pokemon.item, Item::Unknown) || pokemon.impossible_items.contains(BOOTS) {
        return;
    }

    let window = action_window(following);
    // An Air Balloon announces itself right after the switch
    let balloon = window.iter().any(|msg| {
        matches!(msg, ServerMessage::Item { pokemon, .. } if pokemon.player == player)
    });
    if balloon {
        return;
    }

    let affecting: Vec<SideCondition> = battle
        .opponent
        .active_hazards()
        .filter(|hazard| should_affect(battle, pokemon, dex, *hazard))
        .collect();
    if affecting.is_empty() {
        return;
    }

    let affected = window.iter().any(|msg| hazard_evidence(msg, player));
    let species = pokemon.species().to_string();
    let Some(pokemon) = battle.opponent.active.as_mut() else {
        return;
    };
    if affected {
        debug!(species, "hazards took effect, ruling out heavy-duty boots");
        pokemon.exclude_item(BOOTS);
    } else {
        debug!(species, ?affecting, "hazards had no effect, inferring heavy-duty boots");
        pokemon.infer_item(BOOTS);
    }
}
