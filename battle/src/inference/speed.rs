//! Turn-order deductions: speed bounds and Choice Scarf
//!
//! Both checks read the battle as it stood before the batch, since boosts applied
//! mid-turn did not affect the order already decided.

use scry_protocol::ServerMessage;
use scry_protocol::server::{Player, Stat, to_id};
use tracing::debug;

use crate::dex::Dex;
use crate::types::{
    Battle, PokemonState, SideCondition, SideRole, StatSpread, StatStages, Status, Terrain,
    Volatile, Weather, calculate_stat,
};

/// Which side acted first, and with what
#[derive(Debug, Clone, PartialEq)]
struct TurnOrder {
    opponent_first: bool,
    user_move: String,
    opponent_move: String,
}

/// The two moves that decided turn order, if this batch has a clean comparison
///
/// Switches, recharge turns and confusion self-hits make the order meaningless.
/// Moves with a `[from]` source were not chosen, so they are skipped. When the
/// opponent knocked out the bot's Pokemon before it could act, the bot's selected
/// move stands in for the missing line.
fn turn_order(battle: &Battle, perspective: Player, messages: &[ServerMessage]) -> Option<TurnOrder> {
    let mut user_move: Option<String> = None;
    let mut opponent_move: Option<String> = None;
    let mut opponent_first = false;
    let mut user_fainted = false;

    for msg in messages {
        match msg {
            ServerMessage::Switch { .. } | ServerMessage::Drag { .. } => return None,
            ServerMessage::Cant { reason, .. } if reason.id() == "recharge" => return None,
            ServerMessage::Damage { tags, .. } if tags.from_id().as_deref() == Some("confusion") => {
                return None;
            }
            ServerMessage::Activate { effect, .. } if effect.id() == "confusion" => return None,
            ServerMessage::Move {
                pokemon,
                move_name,
                tags,
                ..
            } if tags.from.is_none() => {
                let id = to_id(move_name);
                if SideRole::of(pokemon.player, perspective) == SideRole::User {
                    if user_move.is_none() {
                        opponent_first = opponent_move.is_some();
                        user_move = Some(id);
                    }
                } else if opponent_move.is_none() {
                    opponent_move = Some(id);
                }
            }
            ServerMessage::Faint(pokemon)
                if SideRole::of(pokemon.player, perspective) == SideRole::User =>
            {
                user_fainted = true;
            }
            _ => {}
        }
    }

    let opponent_move = opponent_move?;
    let user_move = match user_move {
        Some(id) => id,
        None if user_fainted => {
            opponent_first = true;
            battle.user.last_selected_move.as_ref()?.move_id()?.to_string()
        }
        None => return None,
    };

    Some(TurnOrder {
        opponent_first,
        user_move,
        opponent_move,
    })
}

/// Priority of a move, or `None` when a modifier the bot cannot rule out applies
fn effective_priority(
    battle: &Battle,
    dex: &dyn Dex,
    pokemon: &PokemonState,
    role: SideRole,
    move_id: &str,
) -> Option<i8> {
    let data = dex.move_data(move_id);
    let is_status = data.is_some_and(|m| m.is_status());
    let mut priority = dex.priority(move_id);

    if move_id == "grassyglide" && battle.field.terrain == Some(Terrain::Grassy) {
        return None;
    }

    let pool = dex.abilities(pokemon.species());
    match role {
        SideRole::User => {
            if is_status && pokemon.ability.as_deref() == Some("myceliummight") {
                return None;
            }
            if is_status && pokemon.ability.as_deref() == Some("prankster") {
                priority += 1;
            }
        }
        SideRole::Opponent => {
            if is_status
                && (pokemon.can_have_ability("prankster", pool)
                    || pokemon.can_have_ability("myceliummight", pool))
            {
                return None;
            }
        }
    }

    Some(priority)
}

fn floor(value: f64) -> f64 {
    value.floor()
}

/// The bot's speed this turn, with every modifier it knows about
fn user_speed(battle: &Battle) -> Option<f64> {
    let user = battle.user.active.as_ref()?;
    let policy = battle.policy();

    let mut speed = floor(user.stats.spe as f64 * StatStages::multiplier(user.boosts.spe));
    if user.item.is("choicescarf") {
        speed = floor(speed * 1.5);
    }
    if user.status == Some(Status::Paralysis) {
        speed = floor(speed / policy.paralysis_speed_divisor as f64);
    }
    if battle.user.has_condition(SideCondition::Tailwind) {
        speed *= 2.0;
    }
    if user.has_volatile(&Volatile::ParadoxBoost(Stat::Spe)) {
        speed = floor(speed * 1.5);
    }
    Some(speed)
}

/// Undo the opponent's visible modifiers, turning its effective speed into a stat
fn opponent_stat_from(battle: &Battle, opponent: &PokemonState, effective: f64) -> u32 {
    let policy = battle.policy();

    let mut speed = floor(effective / StatStages::multiplier(opponent.boosts.spe));
    if opponent.status == Some(Status::Paralysis) {
        speed *= policy.paralysis_speed_divisor as f64;
    }
    if battle.opponent.has_condition(SideCondition::Tailwind) {
        speed = floor(speed / 2.0);
    }
    if opponent.has_volatile(&Volatile::ParadoxBoost(Stat::Spe)) {
        speed = floor(speed / 1.5);
    }
    speed as u32
}

/// Abilities that would double or boost speed under the current conditions
fn active_speed_abilities(battle: &Battle, pokemon: &PokemonState) -> Vec<(&'static str, f64)> {
    let field = &battle.field;
    let mut abilities = Vec::new();
    if field.weather_is(&[Weather::Rain, Weather::HeavyRain]) {
        abilities.push(("swiftswim", 2.0));
    }
    if field.weather_is(&[Weather::Sun, Weather::HarshSun]) {
        abilities.push(("chlorophyll", 2.0));
    }
    if field.weather_is(&[Weather::Sand]) {
        abilities.push(("sandrush", 2.0));
    }
    if field.weather_is(&[Weather::Hail, Weather::Snow]) {
        abilities.push(("slushrush", 2.0));
    }
    if field.terrain == Some(Terrain::Electric) {
        abilities.push(("surgesurfer", 2.0));
    }
    if pokemon.status.is_some() {
        abilities.push(("quickfeet", 1.5));
    }
    if pokemon.item == crate::types::Item::Empty {
        abilities.push(("unburden", 2.0));
    }
    abilities
}

/// Narrow the opponent's speed range from who moved first
pub fn check_speed_ranges(
    battle: &mut Battle,
    dex: &dyn Dex,
    perspective: Player,
    messages: &[ServerMessage],
) {
    let Some(order) = turn_order(battle, perspective, messages) else {
        return;
    };
    let (Some(user), Some(opponent)) = (battle.user.active.as_ref(), battle.opponent.active.as_ref())
    else {
        return;
    };

    let user_priority = effective_priority(battle, dex, user, SideRole::User, &order.user_move);
    let opponent_priority =
        effective_priority(battle, dex, opponent, SideRole::Opponent, &order.opponent_move);
    match (user_priority, opponent_priority) {
        (Some(a), Some(b)) if a == b => {}
        _ => return,
    }

    let Some(speed) = user_speed(battle) else {
        return;
    };
    let bound = opponent_stat_from(battle, opponent, speed);
    let opponent_faster = order.opponent_first != battle.field.trick_room;

    let pool = dex.abilities(opponent.species()).to_vec();
    let boosted_by_ability = active_speed_abilities(battle, opponent)
        .iter()
        .any(|(ability, _)| opponent.can_have_ability(ability, &pool));
    let scarfed = opponent.item.is("choicescarf");

    let Some(opponent) = battle.opponent.active.as_mut() else {
        return;
    };
    if opponent_faster {
        if boosted_by_ability || scarfed {
            return;
        }
        if opponent.speed_range.raise_min(bound) {
            debug!(species = opponent.species(), min = bound, "raised speed lower bound");
        }
    } else if opponent.speed_range.lower_max(bound) {
        debug!(species = opponent.species(), max = bound, "lowered speed upper bound");
    }
}

/// Infer a Choice Scarf when the opponent outsped the bot with no natural way to
pub fn check_choice_scarf(
    battle: &mut Battle,
    dex: &dyn Dex,
    perspective: Player,
    messages: &[ServerMessage],
) {
    if battle.field.trick_room {
        return;
    }
    let Some(order) = turn_order(battle, perspective, messages) else {
        return;
    };
    if !order.opponent_first {
        return;
    }
    let (Some(user), Some(opponent)) = (battle.user.active.as_ref(), battle.opponent.active.as_ref())
    else {
        return;
    };
    if !opponent.item.is_unknown() || !opponent.can_have_item("choicescarf") {
        return;
    }

    let user_priority = effective_priority(battle, dex, user, SideRole::User, &order.user_move);
    let opponent_priority =
        effective_priority(battle, dex, opponent, SideRole::Opponent, &order.opponent_move);
    match (user_priority, opponent_priority) {
        (Some(a), Some(b)) if a == b => {}
        _ => return,
    }

    let Some(data) = dex.species(opponent.species()) else {
        return;
    };
    let spread = if battle.battle_type.has_set_pool() {
        StatSpread::RANDOM_BATTLE
    } else {
        StatSpread::MAX
    };
    let policy = battle.policy();
    let pool = dex.abilities(opponent.species());

    let mut max_speed = calculate_stat(data.base_stats.spe, opponent.identity.level, spread) as f64;
    max_speed = floor(max_speed * StatStages::multiplier(opponent.boosts.spe));
    for (ability, multiplier) in active_speed_abilities(battle, opponent) {
        if opponent.can_have_ability(ability, pool) {
            max_speed = floor(max_speed * multiplier);
        }
    }
    if opponent.has_volatile(&Volatile::ParadoxBoost(Stat::Spe)) {
        max_speed = floor(max_speed * 1.5);
    }
    if opponent.status == Some(Status::Paralysis) && !opponent.can_have_ability("quickfeet", pool) {
        max_speed = floor(max_speed / policy.paralysis_speed_divisor as f64);
    }
    if battle.opponent.has_condition(SideCondition::Tailwind) {
        max_speed *= 2.0;
    }

    let Some(speed) = user_speed(battle) else {
        return;
    };
    if speed <= max_speed {
        return;
    }

    if let Some(opponent) = battle.opponent.active.as_mut() {
        debug!(
            species = opponent.species(),
            user_speed = speed,
            max_speed,
            "opponent outsped its maximum speed, inferring choicescarf"
        );
        opponent.infer_item("choicescarf");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BattleType;
    use crate::dex::builtin_dex;
    use crate::types::{Item, LastUsedMove};
    use scry_protocol::parse_server_message;

    fn battle() -> Battle {
        let mut battle = Battle::new(9, BattleType::Standard);
        battle.opponent.active = Some(PokemonState::new("caterpie", 100));
        battle.user.active = Some(PokemonState::new("caterpie", 100));
        battle
    }

    fn parse(lines: &[&str]) -> Vec<ServerMessage> {
        lines
            .iter()
            .filter_map(|line| parse_server_message(line).ok())
            .collect()
    }

    fn set_user_speed(battle: &mut Battle, speed: u32) {
        battle.user.active.as_mut().unwrap().stats.spe = speed;
    }

    fn opponent(battle: &Battle) -> &PokemonState {
        battle.opponent.active.as_ref().unwrap()
    }

    fn ranges(battle: &mut Battle, lines: &[&str]) {
        let dex = builtin_dex();
        check_speed_ranges(battle, dex.as_ref(), Player::P1, &parse(lines));
    }

    fn scarf(battle: &mut Battle, lines: &[&str]) {
        let dex = builtin_dex();
        check_choice_scarf(battle, dex.as_ref(), Player::P1, &parse(lines));
    }

    const OPPONENT_FIRST: &[&str] = &[
        "|move|p2a: Caterpie|Stealth Rock|",
        "|move|p1a: Caterpie|Stealth Rock|",
    ];

    const USER_FIRST: &[&str] = &[
        "|move|p1a: Caterpie|Stealth Rock|",
        "|move|p2a: Caterpie|Stealth Rock|",
    ];

    #[test]
    fn test_sets_min_when_opponent_moves_first() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        ranges(&mut battle, OPPONENT_FIRST);
        assert_eq!(opponent(&battle).speed_range.min, 150);
    }

    #[test]
    fn test_sets_max_when_bot_moves_first() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        ranges(&mut battle, USER_FIRST);
        assert_eq!(opponent(&battle).speed_range.max, Some(150));
    }

    #[test]
    fn test_trick_room_inverts_the_bound() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        battle.field.trick_room = true;
        ranges(&mut battle, OPPONENT_FIRST);
        assert_eq!(opponent(&battle).speed_range.max, Some(150));
        assert_eq!(opponent(&battle).speed_range.min, 0);
    }

    #[test]
    fn test_priority_mismatch_does_nothing() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        battle.field.trick_room = true;
        ranges(
            &mut battle,
            &[
                "|move|p2a: Caterpie|Aqua Jet|",
                "|move|p1a: Caterpie|Stealth Rock|",
            ],
        );
        assert_eq!(opponent(&battle).speed_range.max, None);
        assert_eq!(opponent(&battle).speed_range.min, 0);
    }

    #[test]
    fn test_equal_priority_moves_compare() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        ranges(
            &mut battle,
            &[
                "|move|p2a: Raging Bolt|Thunderclap|p1a: Kingambit",
                "|-damage|p1a: Kingambit|46/100",
                "|move|p1a: Kingambit|Sucker Punch||[still]",
                "|-fail|p1a: Kingambit",
            ],
        );
        assert_eq!(opponent(&battle).speed_range.min, 150);
    }

    #[test]
    fn test_paralysis_is_accounted_for() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        battle.opponent.active.as_mut().unwrap().status = Some(Status::Paralysis);
        ranges(&mut battle, OPPONENT_FIRST);
        assert_eq!(opponent(&battle).speed_range.min, 300);

        let mut battle = self::battle();
        set_user_speed(&mut battle, 150);
        battle.user.active.as_mut().unwrap().status = Some(Status::Paralysis);
        ranges(&mut battle, OPPONENT_FIRST);
        assert_eq!(opponent(&battle).speed_range.min, 75);
    }

    #[test]
    fn test_tailwind_is_accounted_for() {
        let mut battle = battle();
        set_user_speed(&mut battle, 300);
        battle.opponent.set_condition(SideCondition::Tailwind, 1);
        ranges(&mut battle, OPPONENT_FIRST);
        assert_eq!(opponent(&battle).speed_range.min, 150);

        let mut battle = self::battle();
        set_user_speed(&mut battle, 300);
        battle.user.set_condition(SideCondition::Tailwind, 1);
        battle.opponent.set_condition(SideCondition::Tailwind, 1);
        ranges(&mut battle, OPPONENT_FIRST);
        assert_eq!(opponent(&battle).speed_range.min, 300);
    }

    #[test]
    fn test_boosts_on_both_sides() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        battle.user.active.as_mut().unwrap().boosts.spe = 1;
        battle.opponent.active.as_mut().unwrap().boosts.spe = 3;
        ranges(&mut battle, OPPONENT_FIRST);
        // 150 * 1.5 / 2.5
        assert_eq!(opponent(&battle).speed_range.min, 90);
    }

    #[test]
    fn test_bot_choice_scarf_and_opponent_boost_floor_each_step() {
        let mut battle = battle();
        set_user_speed(&mut battle, 317);
        battle.user.active.as_mut().unwrap().item = Item::held("choicescarf");
        battle.opponent.active.as_mut().unwrap().boosts.spe = 1;
        ranges(&mut battle, OPPONENT_FIRST);
        assert_eq!(opponent(&battle).speed_range.min, 316);
    }

    #[test]
    fn test_paradox_speed_boost_is_accounted_for() {
        let mut battle = battle();
        set_user_speed(&mut battle, 300);
        battle.user.active.as_mut().unwrap().boosts.spe = 1;
        battle
            .opponent
            .active
            .as_mut()
            .unwrap()
            .add_volatile(Volatile::ParadoxBoost(Stat::Spe));
        battle.user.last_selected_move = Some(LastUsedMove {
            pokemon: Some("caterpie".to_string()),
            action: "tackle".to_string(),
            turn: 0,
        });
        ranges(
            &mut battle,
            &[
                "|move|p2a: Caterpie|U-turn|p1a: Caterpie",
                "|-damage|p1a: Caterpie|0 fnt",
                "|faint|p1a: Caterpie",
            ],
        );
        assert_eq!(opponent(&battle).speed_range.min, 300);
    }

    #[test]
    fn test_bot_knocked_out_uses_selected_move() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        battle.user.last_selected_move = Some(LastUsedMove {
            pokemon: Some("caterpie".to_string()),
            action: "tackle".to_string(),
            turn: 0,
        });
        ranges(
            &mut battle,
            &[
                "|move|p2a: Caterpie|Tackle|p1a: Caterpie",
                "|-damage|p1a: Caterpie|0 fnt",
                "|faint|p1a: Caterpie",
            ],
        );
        assert_eq!(opponent(&battle).speed_range.min, 150);
    }

    #[test]
    fn test_bot_knocking_out_opponent_does_nothing() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        ranges(
            &mut battle,
            &[
                "|move|p1a: Caterpie|Tackle|p2a: Caterpie",
                "|-damage|p2a: Caterpie|0 fnt",
                "|faint|p2a: Caterpie",
            ],
        );
        assert_eq!(opponent(&battle).speed_range.min, 0);
        assert_eq!(opponent(&battle).speed_range.max, None);
    }

    #[test]
    fn test_recharge_and_confusion_skip_the_check() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        ranges(
            &mut battle,
            &[
                "|cant|p1a: Caterpie|recharge",
                "|move|p2a: Caterpie|Tackle|p1a: Caterpie",
            ],
        );
        ranges(
            &mut battle,
            &[
                "|-activate|p1a: Caterpie|confusion",
                "|-damage|p1a: Caterpie|15/100|[from] confusion",
                "|move|p2a: Caterpie|Tackle|p1a: Caterpie",
            ],
        );
        assert_eq!(opponent(&battle).speed_range.min, 0);
    }

    #[test]
    fn test_switch_skips_the_check() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        ranges(
            &mut battle,
            &[
                "|switch|p1a: Caterpie|Caterpie, F|255/255",
                "|move|p2a: Caterpie|Stealth Rock|",
                "|move|p1a: Caterpie|Stealth Rock|p2a: Caterpie|[from]ability: Magic Bounce",
            ],
        );
        assert_eq!(opponent(&battle).speed_range.min, 0);
        assert_eq!(opponent(&battle).speed_range.max, None);
    }

    #[test]
    fn test_possible_speed_ability_blocks_min() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        battle.field.weather = Some(Weather::Rain);
        battle.opponent.active = Some(PokemonState::new("seismitoad", 100));
        ranges(&mut battle, OPPONENT_FIRST);
        assert_eq!(opponent(&battle).speed_range.min, 0);

        // Rain alone changes nothing for a Pokemon without Swift Swim
        let mut battle = self::battle();
        set_user_speed(&mut battle, 150);
        battle.field.weather = Some(Weather::Rain);
        ranges(&mut battle, OPPONENT_FIRST);
        assert_eq!(opponent(&battle).speed_range.min, 150);
    }

    #[test]
    fn test_possible_unburden_blocks_min() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        let mut hawlucha = PokemonState::new("hawlucha", 100);
        hawlucha.item = Item::Empty;
        battle.opponent.active = Some(hawlucha);
        ranges(&mut battle, OPPONENT_FIRST);
        assert_eq!(opponent(&battle).speed_range.min, 0);
    }

    #[test]
    fn test_known_choice_scarf_blocks_min() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        battle.opponent.active.as_mut().unwrap().item = Item::held("choicescarf");
        ranges(&mut battle, OPPONENT_FIRST);
        assert_eq!(opponent(&battle).speed_range.min, 0);
    }

    #[test]
    fn test_grassy_glide_in_grassy_terrain_abstains() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        battle.field.terrain = Some(Terrain::Grassy);
        ranges(
            &mut battle,
            &[
                "|move|p2a: Caterpie|Grassy Glide|",
                "|move|p1a: Caterpie|Stealth Rock|",
            ],
        );
        ranges(
            &mut battle,
            &[
                "|move|p1a: Caterpie|Grassy Glide|",
                "|move|p2a: Caterpie|Stealth Rock|",
            ],
        );
        assert_eq!(opponent(&battle).speed_range.min, 0);
        assert_eq!(opponent(&battle).speed_range.max, None);
    }

    #[test]
    fn test_unknown_moves_are_priority_zero() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        ranges(
            &mut battle,
            &[
                "|move|p2a: Caterpie|unknown-move|",
                "|move|p1a: Caterpie|unknown-move|",
            ],
        );
        assert_eq!(opponent(&battle).speed_range.min, 150);
    }

    #[test]
    fn test_contradictory_bound_is_refused() {
        let mut battle = battle();
        set_user_speed(&mut battle, 150);
        battle.opponent.active.as_mut().unwrap().speed_range.max = Some(100);
        ranges(&mut battle, OPPONENT_FIRST);
        let range = opponent(&battle).speed_range;
        assert!(range.max.is_none_or(|max| range.min <= max));
        assert_eq!(range.min, 0);
    }

    // === Choice Scarf ===

    #[test]
    fn test_scarf_when_opponent_cannot_naturally_outspeed() {
        // Max speed Caterpie is 207
        let mut battle = battle();
        set_user_speed(&mut battle, 210);
        scarf(&mut battle, OPPONENT_FIRST);
        assert!(opponent(&battle).item.is("choicescarf"));
        assert!(opponent(&battle).item_inferred);
    }

    #[test]
    fn test_no_scarf_when_opponent_could_be_faster() {
        let mut battle = battle();
        set_user_speed(&mut battle, 200);
        scarf(&mut battle, OPPONENT_FIRST);
        assert!(opponent(&battle).item.is_unknown());
    }

    #[test]
    fn test_no_scarf_when_bot_moves_first() {
        let mut battle = battle();
        set_user_speed(&mut battle, 210);
        scarf(&mut battle, USER_FIRST);
        assert!(opponent(&battle).item.is_unknown());
    }

    #[test]
    fn test_scarf_when_opponent_knocks_out_bot() {
        let mut battle = battle();
        set_user_speed(&mut battle, 210);
        battle.user.last_selected_move = Some(LastUsedMove {
            pokemon: Some("caterpie".to_string()),
            action: "tackle".to_string(),
            turn: 0,
        });
        scarf(
            &mut battle,
            &[
                "|move|p2a: Caterpie|Tackle|p1a: Caterpie",
                "|-damage|p1a: Caterpie|0 fnt",
                "|faint|p1a: Caterpie",
            ],
        );
        assert!(opponent(&battle).item.is("choicescarf"));
    }

    #[test]
    fn test_no_scarf_after_priority_knockout() {
        let mut battle = battle();
        set_user_speed(&mut battle, 210);
        battle.user.last_selected_move = Some(LastUsedMove {
            pokemon: Some("caterpie".to_string()),
            action: "tackle".to_string(),
            turn: 0,
        });
        scarf(
            &mut battle,
            &[
                "|move|p2a: Caterpie|Quick Attack|p1a: Caterpie",
                "|-damage|p1a: Caterpie|0 fnt",
                "|faint|p1a: Caterpie",
            ],
        );
        assert!(opponent(&battle).item.is_unknown());
    }

    #[test]
    fn test_no_scarf_when_bot_priority_is_modified() {
        let mut battle = battle();
        set_user_speed(&mut battle, 210);
        {
            let user = battle.user.active.as_mut().unwrap();
            user.identity.species = "toedscruel".to_string();
            user.ability = Some("myceliummight".to_string());
        }
        battle.user.last_selected_move = Some(LastUsedMove {
            pokemon: Some("toedscruel".to_string()),
            action: "toxic".to_string(),
            turn: 0,
        });
        scarf(
            &mut battle,
            &[
                "|move|p2a: Porygon2|Ice Beam|p1a: Toedscruel",
                "|-damage|p1a: Toedscruel|0 fnt",
                "|faint|p1a: Toedscruel",
            ],
        );
        assert!(opponent(&battle).item.is_unknown());
    }

    #[test]
    fn test_no_scarf_with_possible_prankster() {
        let mut battle = battle();
        set_user_speed(&mut battle, 245);
        battle.opponent.active = Some(PokemonState::new("grimmsnarl", 100));
        scarf(
            &mut battle,
            &[
                "|move|p2a: Grimmsnarl|Stealth Rock|",
                "|move|p1a: Caterpie|Stealth Rock|",
            ],
        );
        assert!(opponent(&battle).item.is_unknown());
    }

    #[test]
    fn test_no_scarf_when_boosts_explain_the_order() {
        let mut battle = battle();
        set_user_speed(&mut battle, 210);
        battle.opponent.active.as_mut().unwrap().boosts.spe = 1;
        scarf(&mut battle, OPPONENT_FIRST);
        assert!(opponent(&battle).item.is_unknown());

        let mut battle = self::battle();
        set_user_speed(&mut battle, 210);
        battle.user.active.as_mut().unwrap().boosts.spe = -1;
        scarf(&mut battle, OPPONENT_FIRST);
        assert!(opponent(&battle).item.is_unknown());
    }

    #[test]
    fn test_no_scarf_under_trick_room() {
        let mut battle = battle();
        set_user_speed(&mut battle, 110);
        battle.field.trick_room = true;
        scarf(&mut battle, OPPONENT_FIRST);
        assert!(opponent(&battle).item.is_unknown());
    }

    #[test]
    fn test_swift_swim_blocks_scarf_until_ruled_out() {
        // Max speed Seismitoad is 271, doubled in rain
        let mut battle = battle();
        set_user_speed(&mut battle, 300);
        battle.field.weather = Some(Weather::Rain);
        battle.opponent.active = Some(PokemonState::new("seismitoad", 100));
        scarf(&mut battle, OPPONENT_FIRST);
        assert!(opponent(&battle).item.is_unknown());

        battle.opponent.active.as_mut().unwrap().ability = Some("waterabsorb".to_string());
        scarf(&mut battle, OPPONENT_FIRST);
        assert!(opponent(&battle).item.is("choicescarf"));
    }

    #[test]
    fn test_quick_feet_blocks_scarf_until_ruled_out() {
        // Max speed Ursaring is 229
        let mut battle = battle();
        set_user_speed(&mut battle, 215);
        let mut ursaring = PokemonState::new("ursaring", 100);
        ursaring.status = Some(Status::Paralysis);
        battle.opponent.active = Some(ursaring);
        scarf(&mut battle, OPPONENT_FIRST);
        assert!(opponent(&battle).item.is_unknown());

        battle.opponent.active.as_mut().unwrap().ability = Some("guts".to_string());
        scarf(&mut battle, OPPONENT_FIRST);
        assert!(opponent(&battle).item.is("choicescarf"));
    }

    #[test]
    fn test_no_scarf_when_item_is_known() {
        let mut battle = battle();
        set_user_speed(&mut battle, 210);
        battle.opponent.active.as_mut().unwrap().item = Item::held("leftovers");
        scarf(&mut battle, OPPONENT_FIRST);
        assert!(opponent(&battle).item.is("leftovers"));

        battle.opponent.active.as_mut().unwrap().item = Item::Empty;
        scarf(&mut battle, OPPONENT_FIRST);
        assert_eq!(opponent(&battle).item, Item::Empty);
    }

    #[test]
    fn test_random_battle_spread_is_used() {
        // Floette-Eternal at level 80 with the random battle spread has 193 speed
        let mut battle = Battle::new(9, BattleType::RandomBattle);
        battle.user.active = Some(PokemonState::new("caterpie", 100));
        battle.opponent.active = Some(PokemonState::new("floetteeternal", 80));
        set_user_speed(&mut battle, 195);
        scarf(
            &mut battle,
            &[
                "|move|p2a: Floette|Stealth Rock|",
                "|move|p1a: Caterpie|Stealth Rock|",
            ],
        );
        assert!(opponent(&battle).item.is("choicescarf"));
    }
}
