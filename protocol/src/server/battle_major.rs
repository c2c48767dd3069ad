//! Parsers for the actions that make up a turn: moves, switches, faints

use super::ServerMessage;
use super::battle::{
    Effect, HpStatus, Pokemon, PokemonDetails, Tags, parse_details, parse_hp_status, parse_number,
    parse_pokemon, parse_text,
};
use crate::ParseError;
use anyhow::Result;

/// `POKEMON|DETAILS|HP STATUS`, shared by every line that shows a Pokemon entering
fn appearance(parts: &[&str]) -> Result<(Pokemon, PokemonDetails, Option<HpStatus>)> {
    let pokemon = parse_pokemon(parts, 2)?;
    if parts.get(3).is_none_or(|s| s.is_empty()) {
        return Err(ParseError::MissingField("details".to_string()).into());
    }
    Ok((pokemon, parse_details(parts, 3), parse_hp_status(parts, 4)))
}

/// |move|POKEMON|MOVE|TARGET, with `[from]`, `[still]`, `[miss]` and similar suffixes
pub fn parse_move(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let move_name = parse_text(parts, 3);
    if move_name.is_empty() {
        return Err(ParseError::InvalidFormat("move without a name".to_string()).into());
    }

    Ok(ServerMessage::Move {
        pokemon,
        move_name,
        target: parts.get(4).and_then(|s| Pokemon::parse(s)),
        tags: Tags::parse(parts),
    })
}

/// |switch|POKEMON|DETAILS|HP STATUS
pub fn parse_switch(parts: &[&str]) -> Result<ServerMessage> {
    let (pokemon, details, hp_status) = appearance(parts)?;
    Ok(ServerMessage::Switch {
        pokemon,
        details,
        hp_status,
        tags: Tags::parse(parts),
    })
}

/// |drag|POKEMON|DETAILS|HP STATUS (Roar, Dragon Tail, Red Card)
pub fn parse_drag(parts: &[&str]) -> Result<ServerMessage> {
    let (pokemon, details, hp_status) = appearance(parts)?;
    Ok(ServerMessage::Drag {
        pokemon,
        details,
        hp_status,
        tags: Tags::parse(parts),
    })
}

/// |detailschange|POKEMON|DETAILS|HP STATUS: a permanent forme change
pub fn parse_detailschange(parts: &[&str]) -> Result<ServerMessage> {
    let (pokemon, details, hp_status) = appearance(parts)?;
    Ok(ServerMessage::DetailsChange {
        pokemon,
        details,
        hp_status,
    })
}

/// |-formechange|POKEMON|SPECIES|HP STATUS: a forme change that ends on switch-out
pub fn parse_formechange(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let species = parse_text(parts, 3);
    if species.is_empty() {
        return Err(ParseError::MissingField("species".to_string()).into());
    }

    Ok(ServerMessage::FormeChange {
        pokemon,
        species,
        hp_status: parse_hp_status(parts, 4),
        tags: Tags::parse(parts),
    })
}

/// |replace|POKEMON|DETAILS|HP STATUS: an illusion broke
pub fn parse_replace(parts: &[&str]) -> Result<ServerMessage> {
    let (pokemon, details, hp_status) = appearance(parts)?;
    Ok(ServerMessage::Replace {
        pokemon,
        details,
        hp_status,
    })
}

/// |swap|POKEMON|POSITION
pub fn parse_swap(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Swap {
        pokemon: parse_pokemon(parts, 2)?,
        position: parse_number(parts, 3, "position")?,
    })
}

/// |cant|POKEMON|REASON or |cant|POKEMON|REASON|MOVE
pub fn parse_cant(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let reason = parse_text(parts, 3);
    if reason.is_empty() {
        return Err(ParseError::MissingField("reason".to_string()).into());
    }
    let move_name = Some(parse_text(parts, 4)).filter(|s| !s.is_empty());

    Ok(ServerMessage::Cant {
        pokemon,
        reason: Effect::parse(&reason),
        move_name,
    })
}

/// |faint|POKEMON
pub fn parse_faint(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Faint(parse_pokemon(parts, 2)?))
}
