//! Illusion: finding the Zoroark behind a displayed Pokemon
//!
//! A reveal comes either from the protocol (`replace`) or from something the
//! displayed species could not have done: a move outside its set pool, or an
//! immunity its types do not have.

use scry_protocol::ServerMessage;
use scry_protocol::server::Player;
use tracing::debug;

use super::{action_window, opposing};
use crate::dex::Dex;
use crate::tracking::is_zoroark_family;
use crate::tracking::new_pokemon;
use crate::types::{Battle, KnownMove, PokemonState, SideState, Type};

/// Abilities that grant an immunity a type chart would not predict
const IMMUNITY_ABILITIES: &[(&str, Option<Type>)] = &[
    ("levitate", Some(Type::Ground)),
    ("eartheater", Some(Type::Ground)),
    ("voltabsorb", Some(Type::Electric)),
    ("lightningrod", Some(Type::Electric)),
    ("motordrive", Some(Type::Electric)),
    ("waterabsorb", Some(Type::Water)),
    ("stormdrain", Some(Type::Water)),
    ("dryskin", Some(Type::Water)),
    ("flashfire", Some(Type::Fire)),
    ("wellbakedbody", Some(Type::Fire)),
    ("sapsipper", Some(Type::Grass)),
    ("wonderguard", None),
];

/// Moves whose type depends on the user rather than the move
const VARIABLE_TYPE_MOVES: &[&str] = &[
    "judgment",
    "multiattack",
    "terablast",
    "terastarstorm",
    "weatherball",
    "naturalgift",
    "technoblast",
    "revelationdance",
    "ragingbull",
    "ivycudgel",
    "aurawheel",
];

/// Pull the real Pokemon out of the reserve, or create it if it was never seen
pub(crate) fn take_real(side: &mut SideState, dex: &dyn Dex, species: &str, level: u8) -> PokemonState {
    match side
        .reserve
        .iter()
        .position(|p| p.species() == species || p.identity.base_name == species)
    {
        Some(index) => side.reserve.remove(index),
        None => new_pokemon(dex, species, level),
    }
}

/// Swap the displayed active Pokemon for `real`
///
/// Moves used since the switch-in, boosts, volatiles and HP lost belong to the
/// real Pokemon. The displayed one goes back to the reserve as it was when it
/// (apparently) switched in.
pub(crate) fn unmask(side: &mut SideState, mut real: PokemonState) {
    let Some(mut displayed) = side.active.take() else {
        side.active = Some(real);
        return;
    };

    let used = std::mem::take(&mut displayed.moves_used_since_switch_in);
    let carried: Vec<KnownMove> = displayed
        .moves
        .iter()
        .filter(|m| used.iter().any(|id| m.matches(id)))
        .cloned()
        .collect();
    for known in carried {
        displayed.remove_move(&known.id);
        if real.get_move(&known.id).is_none() {
            real.moves.push(known);
        }
    }
    real.moves_used_since_switch_in = used;

    real.boosts = displayed.boosts.clone();
    displayed.boosts.clear();
    real.volatiles = std::mem::take(&mut displayed.volatiles);
    real.volatile_durations = std::mem::take(&mut displayed.volatile_durations);
    real.substitute_hit = displayed.substitute_hit;

    real.hp = (real.max_hp as f64 * displayed.hp_fraction()).round() as u32;
    real.fainted = displayed.fainted;
    real.status = displayed.status;
    real.hp_at_switch_in = displayed.hp_at_switch_in;
    real.status_at_switch_in = displayed.status_at_switch_in;
    real.zoroark_disguised_as = None;

    displayed.hp = (displayed.max_hp as f64 * displayed.hp_at_switch_in).round() as u32;
    displayed.fainted = displayed.hp == 0;
    displayed.status = displayed.status_at_switch_in;
    displayed.substitute_hit = false;
    displayed.zoroark_disguised_as = None;

    debug!(
        displayed = displayed.species(),
        real = real.species(),
        "illusion resolved"
    );
    side.reserve.push(displayed);
    side.active = Some(real);
}

/// Zoroark forms that exist in this battle's generation
fn candidates(battle: &Battle) -> Vec<&'static str> {
    let policy = battle.policy();
    let mut forms = Vec::new();
    if policy.zoroark {
        forms.push("zoroark");
    }
    if policy.hisuian_zoroark {
        forms.push("zoroarkhisui");
    }
    forms
}

/// Pick the one candidate that explains an observation, abstaining on a tie
fn pick<'a>(side: &SideState, forms: &[&'a str], explains: impl Fn(&str) -> bool) -> Option<&'a str> {
    let usable: Vec<&str> = forms
        .iter()
        .copied()
        .filter(|form| {
            let seen = side
                .reserve
                .iter()
                .find(|p| p.species() == *form || p.identity.base_name == *form);
            seen.is_none_or(|p| !p.fainted)
        })
        .filter(|form| explains(form))
        .collect();

    match usable.as_slice() {
        [only] => Some(only),
        [] => None,
        several => several.iter().copied().find(|form| {
            side.reserve.iter().any(|p| p.species() == *form)
        }),
    }
}

/// Unmask the opponent's active Pokemon as `form`, recording the disguise
fn reveal(battle: &mut Battle, dex: &dyn Dex, form: &str) {
    let side = &mut battle.opponent;
    let Some(displayed) = side.active.as_ref() else {
        return;
    };
    let disguised_as = displayed.species().to_string();
    let level = dex
        .species(form)
        .and_then(|data| data.random_battle_level)
        .unwrap_or(displayed.identity.level);

    let real = take_real(side, dex, form, level);
    unmask(side, real);
    if let Some(active) = side.active.as_mut() {
        active.zoroark_disguised_as = Some(disguised_as);
    }
}

/// The opponent's active Pokemon used a move its set pool does not contain
///
/// Runs before the move is recorded. Returns true when the active Pokemon was
/// replaced by the Zoroark it must have been.
pub fn check_move(battle: &mut Battle, dex: &dyn Dex, move_id: &str) -> bool {
    if !battle.battle_type.has_set_pool() || move_id == "struggle" {
        return false;
    }
    let Some(active) = battle.opponent.active.as_ref() else {
        return false;
    };
    if is_zoroark_family(active.species()) || active.get_move(move_id).is_some() {
        return false;
    }
    let Some(pool) = dex.possible_moves(active.species()) else {
        return false;
    };
    if pool.iter().any(|m| m == move_id) {
        return false;
    }

    let forms = candidates(battle);
    let Some(form) = pick(&battle.opponent, &forms, |form| {
        dex.possible_moves(form)
            .is_some_and(|pool| pool.iter().any(|m| m == move_id))
    }) else {
        return false;
    };

    debug!(move_id, form, "move outside the displayed set pool");
    reveal(battle, dex, form);
    true
}

/// Whether the opponent showed a bare `-immune` to the move just used
fn immune_in_window(opponent: Player, following: &[ServerMessage]) -> bool {
    for line in action_window(following) {
        match line {
            ServerMessage::VolatileEnd { effect, .. } if effect.id() == "futuresight" => {
                return false;
            }
            ServerMessage::Immune { pokemon, tags } if pokemon.player == opponent => {
                return tags.from.is_none();
            }
            _ => {}
        }
    }
    false
}

/// The opponent's active Pokemon was immune to the bot's move
///
/// Runs right after the bot's `move` line. Only type immunities count: the
/// displayed types must take damage from the move, no possible ability may explain
/// the immunity, and the candidate's types must be immune. Returns true when the
/// active Pokemon was replaced.
pub fn check_immunity(
    battle: &mut Battle,
    dex: &dyn Dex,
    perspective: Player,
    following: &[ServerMessage],
) -> bool {
    if !battle.battle_type.has_set_pool() || !immune_in_window(opposing(perspective), following) {
        return false;
    }
    let Some(move_id) = battle
        .user
        .last_used_move
        .as_ref()
        .and_then(|m| m.move_id())
        .map(str::to_string)
    else {
        return false;
    };
    if move_id == "futuresight"
        || move_id.starts_with("hiddenpower")
        || VARIABLE_TYPE_MOVES.contains(&move_id.as_str())
    {
        return false;
    }
    let Some(data) = dex.move_data(&move_id) else {
        return false;
    };
    if !data.is_damaging() {
        return false;
    }
    let move_type = data.move_type;

    let Some(active) = battle.opponent.active.as_ref() else {
        return false;
    };
    if active.terastallized || is_zoroark_family(active.species()) {
        return false;
    }
    if move_type.effectiveness_against(&active.types) == 0.0 {
        return false;
    }
    let pool = dex.abilities(active.species());
    let ability_explains = IMMUNITY_ABILITIES.iter().any(|(ability, blocked)| {
        blocked.is_none_or(|t| t == move_type) && active.can_have_ability(ability, pool)
    });
    if ability_explains {
        return false;
    }

    let forms = candidates(battle);
    let Some(form) = pick(&battle.opponent, &forms, |form| {
        dex.species(form)
            .is_some_and(|data| move_type.effectiveness_against(&data.types) == 0.0)
    }) else {
        return false;
    };

    debug!(move_id, form, "immunity the displayed types do not have");
    reveal(battle, dex, form);
    true
}
