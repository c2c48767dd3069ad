//! Parsers for the lines that pace a battle: requests, turns, timers, outcome

use super::ServerMessage;
use super::battle::{parse_number, parse_player, parse_text, positional_args};
use anyhow::Result;
use serde_json::Value;

/// |request|JSON
///
/// The payload may itself contain `|`, so everything after the keyword is
/// rejoined. An empty payload is sent between turns and decodes to `Value::Null`.
pub fn parse_request(parts: &[&str]) -> Result<ServerMessage> {
    let payload = parts.get(2..).unwrap_or_default().join("|");
    if payload.trim().is_empty() {
        return Ok(ServerMessage::Request(Value::Null));
    }
    Ok(ServerMessage::Request(serde_json::from_str(&payload)?))
}

/// |inactive|MESSAGE
pub fn parse_inactive(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Inactive(parse_text(parts, 2)))
}

/// |inactiveoff|MESSAGE
pub fn parse_inactiveoff(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::InactiveOff(parse_text(parts, 2)))
}

/// |turn|NUMBER
pub fn parse_turn(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Turn(parse_number(parts, 2, "turn")?))
}

/// |win|USER
pub fn parse_win(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Win(parse_text(parts, 2)))
}

/// |noinit|REASON|ARGS...; `rename` carries the room's new id
pub fn parse_noinit(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::NoInit {
        reason: parse_text(parts, 2),
        args: positional_args(parts, 3),
    })
}

/// |split|PLAYER: the next two lines are the owner's copy, then the public one
pub fn parse_split(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Split(parse_player(parts, 2)?))
}
