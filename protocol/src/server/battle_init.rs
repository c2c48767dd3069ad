//! Parsers for the lines sent before the first turn

use super::ServerMessage;
use super::battle::{GameType, PokemonDetails, parse_number, parse_player, parse_text};
use crate::ParseError;
use anyhow::Result;

/// |player|PLAYER|USERNAME|AVATAR|RATING
///
/// The username may be absent when a player leaves; the rating only shows in
/// rated battles.
pub fn parse_player_line(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::BattlePlayer {
        player: parse_player(parts, 2)?,
        username: parse_text(parts, 3),
        avatar: parse_text(parts, 4),
        rating: parts.get(5).and_then(|s| s.parse().ok()),
    })
}

/// |teamsize|PLAYER|NUMBER
pub fn parse_teamsize(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::TeamSize {
        player: parse_player(parts, 2)?,
        size: parse_number(parts, 3, "team size")?,
    })
}

/// |gametype|GAMETYPE
pub fn parse_gametype(parts: &[&str]) -> Result<ServerMessage> {
    let raw = parse_text(parts, 2);
    let game_type = GameType::parse(&raw)
        .ok_or_else(|| ParseError::InvalidFormat(format!("unknown game type {raw:?}")))?;
    Ok(ServerMessage::GameType(game_type))
}

/// |gen|GENNUM
pub fn parse_gen(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Gen(parse_number(parts, 2, "generation")?))
}

/// |tier|FORMATNAME, e.g. `[Gen 9] Random Battle`
pub fn parse_tier(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Tier(parse_text(parts, 2)))
}

/// |rated| or |rated|MESSAGE
pub fn parse_rated(parts: &[&str]) -> Result<ServerMessage> {
    let message = Some(parse_text(parts, 2)).filter(|s| !s.is_empty());
    Ok(ServerMessage::Rated(message))
}

/// |rule|RULE: DESCRIPTION
pub fn parse_rule(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Rule(parts.get(2..).unwrap_or_default().join("|")))
}

/// |poke|PLAYER|DETAILS|ITEM during team preview
pub fn parse_poke(parts: &[&str]) -> Result<ServerMessage> {
    let player = parse_player(parts, 2)?;
    let details = parts
        .get(3)
        .filter(|s| !s.is_empty())
        .map(|s| PokemonDetails::parse(s))
        .ok_or_else(|| ParseError::MissingField("details".to_string()))?;

    Ok(ServerMessage::Poke {
        player,
        details,
        has_item: parts.get(4) == Some(&"item"),
    })
}

/// |teampreview or |teampreview|NUMBER
pub fn parse_teampreview(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::TeamPreview(
        parts.get(2).and_then(|s| s.parse().ok()),
    ))
}
