//! Parsers for the `-`-prefixed lines: side effects of an action
//!
//! Most of these name one Pokemon in the third field and carry optional
//! `[from]`/`[of]` suffixes, so the shared shapes live in small helpers.

use super::ServerMessage;
use super::battle::{
    Effect, HpStatus, Pokemon, Side, Stat, Tags, parse_hp_status, parse_number, parse_pokemon,
    parse_text, positional_args,
};
use crate::ParseError;
use anyhow::Result;

fn parse_side(parts: &[&str], index: usize) -> Result<Side> {
    parts
        .get(index)
        .and_then(|s| Side::parse(s))
        .ok_or_else(|| ParseError::MissingField("side".to_string()).into())
}

fn parse_effect(parts: &[&str], index: usize) -> Effect {
    Effect::parse(&parse_text(parts, index))
}

/// A line that carries nothing but the Pokemon it happened to
fn single(parts: &[&str], message: fn(Pokemon) -> ServerMessage) -> Result<ServerMessage> {
    Ok(message(parse_pokemon(parts, 2)?))
}

/// `POKEMON|HP STATUS`
fn hp_change(parts: &[&str]) -> Result<(Pokemon, Option<HpStatus>)> {
    Ok((parse_pokemon(parts, 2)?, parse_hp_status(parts, 3)))
}

/// `POKEMON|STAT|AMOUNT`
fn stat_change(parts: &[&str]) -> Result<(Pokemon, Stat, i8)> {
    let pokemon = parse_pokemon(parts, 2)?;
    let stat = parts
        .get(3)
        .and_then(|s| Stat::parse(s))
        .ok_or_else(|| ParseError::MissingField("stat".to_string()))?;
    let amount = parse_number(parts, 4, "amount")?;
    Ok((pokemon, stat, amount))
}

/// `SOURCE|TARGET`
fn pair(parts: &[&str]) -> Result<(Pokemon, Pokemon)> {
    Ok((parse_pokemon(parts, 2)?, parse_pokemon(parts, 3)?))
}

fn optional_pokemon(parts: &[&str], index: usize) -> Option<Pokemon> {
    parts.get(index).and_then(|s| Pokemon::parse(s))
}

// === Failures and misses ===

/// |-fail|POKEMON|ACTION
pub fn parse_fail(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let action = Some(parse_text(parts, 3)).filter(|s| !s.is_empty());
    Ok(ServerMessage::Fail {
        pokemon,
        action,
        tags: Tags::parse(parts),
    })
}

/// |-block|POKEMON|EFFECT|MOVE|ATTACKER
pub fn parse_block(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Block {
        pokemon: parse_pokemon(parts, 2)?,
        effect: parse_effect(parts, 3),
        move_name: Some(parse_text(parts, 4)).filter(|s| !s.is_empty()),
        attacker: optional_pokemon(parts, 5),
    })
}

/// |-notarget or |-notarget|POKEMON
pub fn parse_notarget(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::NoTarget(optional_pokemon(parts, 2)))
}

/// |-miss|SOURCE|TARGET
pub fn parse_miss(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Miss {
        source: parse_pokemon(parts, 2)?,
        target: optional_pokemon(parts, 3),
    })
}

// === HP and status ===

/// |-damage|POKEMON|HP STATUS, `[from]` naming indirect damage
pub fn parse_damage(parts: &[&str]) -> Result<ServerMessage> {
    let (pokemon, hp_status) = hp_change(parts)?;
    Ok(ServerMessage::Damage {
        pokemon,
        hp_status,
        tags: Tags::parse(parts),
    })
}

/// |-heal|POKEMON|HP STATUS
pub fn parse_heal(parts: &[&str]) -> Result<ServerMessage> {
    let (pokemon, hp_status) = hp_change(parts)?;
    Ok(ServerMessage::Heal {
        pokemon,
        hp_status,
        tags: Tags::parse(parts),
    })
}

/// |-sethp|POKEMON|HP (Pain Split)
pub fn parse_sethp(parts: &[&str]) -> Result<ServerMessage> {
    let (pokemon, hp_status) = hp_change(parts)?;
    Ok(ServerMessage::SetHp { pokemon, hp_status })
}

/// |-status|POKEMON|STATUS
pub fn parse_status(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Status {
        pokemon: parse_pokemon(parts, 2)?,
        status: parse_text(parts, 3),
        tags: Tags::parse(parts),
    })
}

/// |-curestatus|POKEMON|STATUS; the Pokemon may be benched (`p2: Name`)
pub fn parse_curestatus(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::CureStatus {
        pokemon: parse_pokemon(parts, 2)?,
        status: parse_text(parts, 3),
        tags: Tags::parse(parts),
    })
}

/// |-cureteam|POKEMON
pub fn parse_cureteam(parts: &[&str]) -> Result<ServerMessage> {
    single(parts, ServerMessage::CureTeam)
}

// === Boosts ===

/// |-boost|POKEMON|STAT|AMOUNT
pub fn parse_boost(parts: &[&str]) -> Result<ServerMessage> {
    let (pokemon, stat, amount) = stat_change(parts)?;
    Ok(ServerMessage::Boost {
        pokemon,
        stat,
        amount,
        tags: Tags::parse(parts),
    })
}

/// |-unboost|POKEMON|STAT|AMOUNT
pub fn parse_unboost(parts: &[&str]) -> Result<ServerMessage> {
    let (pokemon, stat, amount) = stat_change(parts)?;
    Ok(ServerMessage::Unboost {
        pokemon,
        stat,
        amount,
        tags: Tags::parse(parts),
    })
}

/// |-setboost|POKEMON|STAT|AMOUNT (Belly Drum, Anger Point)
pub fn parse_setboost(parts: &[&str]) -> Result<ServerMessage> {
    let (pokemon, stat, amount) = stat_change(parts)?;
    Ok(ServerMessage::SetBoost {
        pokemon,
        stat,
        amount,
    })
}

/// |-swapboost|SOURCE|TARGET|STATS; no stat list means every stat
pub fn parse_swapboost(parts: &[&str]) -> Result<ServerMessage> {
    let (source, target) = pair(parts)?;
    let stats = parse_text(parts, 4)
        .split(',')
        .filter_map(|s| Stat::parse(s.trim()))
        .collect();
    Ok(ServerMessage::SwapBoost {
        source,
        target,
        stats,
    })
}

/// |-invertboost|POKEMON
pub fn parse_invertboost(parts: &[&str]) -> Result<ServerMessage> {
    single(parts, ServerMessage::InvertBoost)
}

/// |-clearboost|POKEMON
pub fn parse_clearboost(parts: &[&str]) -> Result<ServerMessage> {
    single(parts, ServerMessage::ClearBoost)
}

/// |-clearpositiveboost|TARGET|POKEMON|EFFECT
pub fn parse_clearpositiveboost(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::ClearPositiveBoost {
        target: parse_pokemon(parts, 2)?,
        source: optional_pokemon(parts, 3),
        effect: parse_text(parts, 4),
    })
}

/// |-clearnegativeboost|POKEMON
pub fn parse_clearnegativeboost(parts: &[&str]) -> Result<ServerMessage> {
    single(parts, ServerMessage::ClearNegativeBoost)
}

/// |-copyboost|SOURCE|TARGET
pub fn parse_copyboost(parts: &[&str]) -> Result<ServerMessage> {
    let (source, target) = pair(parts)?;
    Ok(ServerMessage::CopyBoost { source, target })
}

// === Field and sides ===

/// |-weather|WEATHER; `[upkeep]` marks a weather that carried on
pub fn parse_weather(parts: &[&str]) -> Result<ServerMessage> {
    let weather = Some(parse_text(parts, 2))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "none".to_string());
    let tags = Tags::parse(parts);
    Ok(ServerMessage::Weather {
        weather,
        upkeep: tags.has_flag("upkeep"),
        tags,
    })
}

/// |-fieldstart|CONDITION
pub fn parse_fieldstart(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::FieldStart {
        condition: parse_effect(parts, 2),
        tags: Tags::parse(parts),
    })
}

/// |-fieldend|CONDITION
pub fn parse_fieldend(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::FieldEnd {
        condition: parse_effect(parts, 2),
    })
}

/// |-sidestart|SIDE|CONDITION
pub fn parse_sidestart(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::SideStart {
        side: parse_side(parts, 2)?,
        condition: parse_effect(parts, 3),
    })
}

/// |-sideend|SIDE|CONDITION
pub fn parse_sideend(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::SideEnd {
        side: parse_side(parts, 2)?,
        condition: parse_effect(parts, 3),
        tags: Tags::parse(parts),
    })
}

// === Volatiles ===

/// |-start|POKEMON|EFFECT|ARGS...
pub fn parse_start(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::VolatileStart {
        pokemon: parse_pokemon(parts, 2)?,
        effect: parse_effect(parts, 3),
        args: positional_args(parts, 4),
        tags: Tags::parse(parts),
    })
}

/// |-end|POKEMON|EFFECT
pub fn parse_end(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::VolatileEnd {
        pokemon: parse_pokemon(parts, 2)?,
        effect: parse_effect(parts, 3),
        tags: Tags::parse(parts),
    })
}

/// |-prepare|ATTACKER|MOVE or |-prepare|ATTACKER|MOVE|DEFENDER
pub fn parse_prepare(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Prepare {
        attacker: parse_pokemon(parts, 2)?,
        move_name: parse_text(parts, 3),
        defender: optional_pokemon(parts, 4),
    })
}

/// |-mustrecharge|POKEMON
pub fn parse_mustrecharge(parts: &[&str]) -> Result<ServerMessage> {
    single(parts, ServerMessage::MustRecharge)
}

/// |-singlemove|POKEMON|MOVE (Destiny Bond, Grudge, Rage)
pub fn parse_singlemove(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::SingleMove {
        pokemon: parse_pokemon(parts, 2)?,
        move_name: parse_effect(parts, 3),
    })
}

/// |-singleturn|POKEMON|MOVE (Protect and friends)
pub fn parse_singleturn(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::SingleTurn {
        pokemon: parse_pokemon(parts, 2)?,
        move_name: parse_effect(parts, 3),
    })
}

// === Hit annotations ===

/// |-crit|POKEMON
pub fn parse_crit(parts: &[&str]) -> Result<ServerMessage> {
    single(parts, ServerMessage::Crit)
}

/// |-supereffective|POKEMON
pub fn parse_supereffective(parts: &[&str]) -> Result<ServerMessage> {
    single(parts, ServerMessage::SuperEffective)
}

/// |-resisted|POKEMON
pub fn parse_resisted(parts: &[&str]) -> Result<ServerMessage> {
    single(parts, ServerMessage::Resisted)
}

/// |-immune|POKEMON, `[from]` naming an ability when one is responsible
pub fn parse_immune(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Immune {
        pokemon: parse_pokemon(parts, 2)?,
        tags: Tags::parse(parts),
    })
}

/// |-hitcount|POKEMON|NUM
pub fn parse_hitcount(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::HitCount {
        pokemon: parse_pokemon(parts, 2)?,
        count: parse_number(parts, 3, "hit count")?,
    })
}

// === Items and abilities ===

/// |-item|POKEMON|ITEM
pub fn parse_item(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Item {
        pokemon: parse_pokemon(parts, 2)?,
        item: parse_text(parts, 3),
        tags: Tags::parse(parts),
    })
}

/// |-enditem|POKEMON|ITEM, with `[eat]`, `[from]` or `[silent]`
pub fn parse_enditem(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::EndItem {
        pokemon: parse_pokemon(parts, 2)?,
        item: parse_text(parts, 3),
        tags: Tags::parse(parts),
    })
}

/// |-ability|POKEMON|ABILITY|ARGS...
pub fn parse_ability(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Ability {
        pokemon: parse_pokemon(parts, 2)?,
        ability: parse_text(parts, 3),
        args: positional_args(parts, 4),
        tags: Tags::parse(parts),
    })
}

/// |-endability|POKEMON
pub fn parse_endability(parts: &[&str]) -> Result<ServerMessage> {
    single(parts, ServerMessage::EndAbility)
}

// === Transformations ===

/// |-transform|POKEMON|TARGET
pub fn parse_transform(parts: &[&str]) -> Result<ServerMessage> {
    let (pokemon, target) = pair(parts)?;
    Ok(ServerMessage::Transform {
        pokemon,
        target,
        tags: Tags::parse(parts),
    })
}

/// |-mega|POKEMON|SPECIES|MEGASTONE, or |-mega|POKEMON|MEGASTONE on older servers
pub fn parse_mega(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let megastone = Some(parse_text(parts, 4))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| parse_text(parts, 3));
    Ok(ServerMessage::Mega { pokemon, megastone })
}

/// |-primal|POKEMON
pub fn parse_primal(parts: &[&str]) -> Result<ServerMessage> {
    single(parts, ServerMessage::Primal)
}

/// |-burst|POKEMON|SPECIES|ITEM (Ultra Burst)
pub fn parse_burst(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Burst {
        pokemon: parse_pokemon(parts, 2)?,
        species: parse_text(parts, 3),
        item: parse_text(parts, 4),
    })
}

/// |-zpower|POKEMON
pub fn parse_zpower(parts: &[&str]) -> Result<ServerMessage> {
    single(parts, ServerMessage::ZPower)
}

/// |-zbroken|POKEMON
pub fn parse_zbroken(parts: &[&str]) -> Result<ServerMessage> {
    single(parts, ServerMessage::ZBroken)
}

/// |-terastallize|POKEMON|TYPE
pub fn parse_terastallize(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let tera_type = parse_text(parts, 3);
    if tera_type.is_empty() {
        return Err(ParseError::MissingField("tera type".to_string()).into());
    }
    Ok(ServerMessage::Terastallize { pokemon, tera_type })
}

// === Everything else ===

/// |-activate|POKEMON|EFFECT|ARGS..., or |-activate||EFFECT for field-wide effects
pub fn parse_activate(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = optional_pokemon(parts, 2);
    let slot_empty = parts.get(2).is_some_and(|s| s.is_empty());
    let effect_index = if pokemon.is_some() || slot_empty { 3 } else { 2 };

    Ok(ServerMessage::Activate {
        pokemon,
        effect: parse_effect(parts, effect_index),
        args: positional_args(parts, effect_index + 1),
        tags: Tags::parse(parts),
    })
}

/// |-hint|MESSAGE
pub fn parse_hint(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Hint(parse_text(parts, 2)))
}

/// |-message|MESSAGE
pub fn parse_message(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Message(parse_text(parts, 2)))
}

/// |-waiting|SOURCE|TARGET
pub fn parse_waiting(parts: &[&str]) -> Result<ServerMessage> {
    let (source, target) = pair(parts)?;
    Ok(ServerMessage::Waiting { source, target })
}
