//! Shared types for battle protocol messages

use crate::ParseError;
use serde::{Deserialize, Serialize};

/// Normalize a display name into a Showdown id ("Meloetta - Pirouette" -> "meloettapirouette")
pub fn to_id(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Player in a battle (p1, p2, p3, p4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    P1,
    P2,
    P3,
    P4,
}

impl Player {
    pub fn parse(s: &str) -> Option<Self> {
        match s.get(..2)? {
            "p1" => Some(Player::P1),
            "p2" => Some(Player::P2),
            "p3" => Some(Player::P3),
            "p4" => Some(Player::P4),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Player::P1 => "p1",
            Player::P2 => "p2",
            Player::P3 => "p3",
            Player::P4 => "p4",
        }
    }
}

/// Pokemon identifier in the form "POSITION: NAME" (e.g., "p1a: Pikachu")
#[derive(Debug, Clone, PartialEq)]
pub struct Pokemon {
    /// Player who owns this pokemon
    pub player: Player,
    /// Position letter (a, b, c for active slots, or None if benched)
    pub position: Option<char>,
    /// Pokemon's name/nickname
    pub name: String,
}

impl Pokemon {
    /// Parse a pokemon ID string like "p1a: Pikachu" or "p1: Pikachu"
    pub fn parse(s: &str) -> Option<Self> {
        let (pos_part, name) = s.split_once(": ")?;
        let player = Player::parse(pos_part)?;
        let position = pos_part.chars().nth(2);

        Some(Pokemon {
            player,
            position,
            name: name.to_string(),
        })
    }

    /// Whether the identifier points at an active slot
    pub fn is_active_slot(&self) -> bool {
        self.position.is_some()
    }
}

/// Pokemon details string (species, level, gender, shiny, tera)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PokemonDetails {
    pub species: String,
    pub level: Option<u8>,
    pub gender: Option<char>,
    pub shiny: bool,
    pub tera_type: Option<String>,
}

impl PokemonDetails {
    /// Parse a details string like "Pikachu, L50, M, shiny" or "Arceus-*"
    pub fn parse(s: &str) -> Self {
        let mut details = PokemonDetails::default();
        let mut parts = s.split(", ");

        if let Some(species) = parts.next() {
            details.species = species.to_string();
        }

        for part in parts {
            if let Some(level_str) = part.strip_prefix('L') {
                details.level = level_str.parse().ok();
            } else if part == "M" || part == "F" {
                details.gender = part.chars().next();
            } else if part == "shiny" {
                details.shiny = true;
            } else if let Some(tera) = part.strip_prefix("tera:") {
                details.tera_type = Some(tera.to_string());
            }
        }

        details
    }

    /// Team preview hides some formes behind a wildcard ("Urshifu-*")
    pub fn has_hidden_forme(&self) -> bool {
        self.species.ends_with("-*")
    }

    /// Species id with any team-preview wildcard removed
    pub fn species_id(&self) -> String {
        to_id(self.species.trim_end_matches("-*"))
    }

    /// Level, defaulting to 100 when the details omit it
    pub fn level_or_default(&self) -> u8 {
        self.level.unwrap_or(100)
    }
}

/// HP and status condition (e.g., "100/100", "50/100 slp", "0 fnt")
#[derive(Debug, Clone, PartialEq)]
pub struct HpStatus {
    /// Current HP (as raw value or percentage depending on perspective)
    pub current: u32,
    /// Max HP (if known)
    pub max: Option<u32>,
    /// Status condition (slp, par, brn, psn, tox, frz, fnt)
    pub status: Option<String>,
}

impl HpStatus {
    /// Parse an HP status string like "100/100", "50/100 slp", or "0 fnt"
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split_whitespace();
        let hp_part = parts.next()?;
        let status = parts.next().map(|s| s.to_string());

        if let Some((current_str, max_str)) = hp_part.split_once('/') {
            Some(HpStatus {
                current: current_str.parse().ok()?,
                max: Some(max_str.parse().ok()?),
                status,
            })
        } else {
            Some(HpStatus {
                current: hp_part.parse().ok()?,
                max: None,
                status,
            })
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.status.as_deref() == Some("fnt") || (self.current == 0 && self.max.is_none())
    }

    /// Fraction of max HP remaining, if a max was given
    pub fn fraction(&self) -> Option<f64> {
        match self.max {
            Some(max) if max > 0 => Some(self.current as f64 / max as f64),
            _ => None,
        }
    }
}

/// Game type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameType {
    Singles,
    Doubles,
    Triples,
    Multi,
    FreeForAll,
}

impl GameType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "singles" => Some(GameType::Singles),
            "doubles" => Some(GameType::Doubles),
            "triples" => Some(GameType::Triples),
            "multi" => Some(GameType::Multi),
            "freeforall" => Some(GameType::FreeForAll),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Singles => "singles",
            GameType::Doubles => "doubles",
            GameType::Triples => "triples",
            GameType::Multi => "multi",
            GameType::FreeForAll => "freeforall",
        }
    }
}

/// Stat abbreviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
    Accuracy,
    Evasion,
}

impl Stat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "atk" => Some(Stat::Atk),
            "def" => Some(Stat::Def),
            "spa" => Some(Stat::Spa),
            "spd" => Some(Stat::Spd),
            "spe" => Some(Stat::Spe),
            "accuracy" => Some(Stat::Accuracy),
            "evasion" => Some(Stat::Evasion),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Atk => "atk",
            Stat::Def => "def",
            Stat::Spa => "spa",
            Stat::Spd => "spd",
            Stat::Spe => "spe",
            Stat::Accuracy => "accuracy",
            Stat::Evasion => "evasion",
        }
    }
}

/// Side of the field (for side conditions), e.g. "p1: Username"
#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    pub player: Player,
    pub raw: String,
}

impl Side {
    pub fn parse(s: &str) -> Option<Self> {
        Some(Side {
            player: Player::parse(s)?,
            raw: s.to_string(),
        })
    }
}

/// The source of an effect as written after `[from]` or inside an effect slot
///
/// Showdown prefixes the kind ("ability: Trace", "item: Leftovers", "move: Wish"),
/// but several sources arrive bare ("Stealth Rock", "psn", "confusion").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Ability(String),
    Item(String),
    Move(String),
    Other(String),
}

impl Effect {
    /// Parse an effect; the kind prefix is matched case-insensitively ("Move: Poltergeist")
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let Some((kind, name)) = s.split_once(':') else {
            return Effect::Other(s.to_string());
        };
        let name = name.trim().to_string();
        match kind.to_ascii_lowercase().as_str() {
            "ability" => Effect::Ability(name),
            "item" => Effect::Item(name),
            "move" => Effect::Move(name),
            _ => Effect::Other(s.to_string()),
        }
    }

    /// The display name without its kind prefix
    pub fn name(&self) -> &str {
        match self {
            Effect::Ability(n) | Effect::Item(n) | Effect::Move(n) | Effect::Other(n) => n,
        }
    }

    /// Normalized id of the effect's name
    pub fn id(&self) -> String {
        to_id(self.name())
    }

    pub fn ability_id(&self) -> Option<String> {
        match self {
            Effect::Ability(n) => Some(to_id(n)),
            _ => None,
        }
    }

    pub fn item_id(&self) -> Option<String> {
        match self {
            Effect::Item(n) => Some(to_id(n)),
            _ => None,
        }
    }
}

/// Bracketed suffix annotations on a line: `[from] EFFECT`, `[of] POKEMON`, and flags
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tags {
    pub from: Option<Effect>,
    pub of: Option<Pokemon>,
    /// Remaining annotations without brackets ("still", "upkeep", "anim Tackle", ...)
    pub flags: Vec<String>,
}

impl Tags {
    /// Collect tags from every bracketed part of a line
    pub fn parse(parts: &[&str]) -> Self {
        let mut tags = Tags::default();

        for part in parts.iter().filter(|p| p.starts_with('[')) {
            if let Some(from) = part.strip_prefix("[from]") {
                // The same line may repeat a source; the first one wins
                if tags.from.is_none() {
                    tags.from = Some(Effect::parse(from));
                }
            } else if let Some(of) = part.strip_prefix("[of]") {
                tags.of = Pokemon::parse(of.trim());
            } else if let Some((flag, rest)) = part[1..].split_once(']') {
                let rest = rest.trim();
                if rest.is_empty() {
                    tags.flags.push(flag.to_string());
                } else {
                    tags.flags.push(format!("{flag} {rest}"));
                }
            }
        }

        tags
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Normalized id of the `[from]` source, if any
    pub fn from_id(&self) -> Option<String> {
        self.from.as_ref().map(Effect::id)
    }
}

/// Positional (non-tag) arguments starting at `index`
pub fn positional_args(parts: &[&str], index: usize) -> Vec<String> {
    parts
        .iter()
        .skip(index)
        .take_while(|p| !p.starts_with('['))
        .map(|p| p.to_string())
        .collect()
}

/// Helper to parse Pokemon from message parts
pub fn parse_pokemon(parts: &[&str], index: usize) -> Result<Pokemon, anyhow::Error> {
    parts
        .get(index)
        .and_then(|s| Pokemon::parse(s))
        .ok_or_else(|| ParseError::MissingField("pokemon".to_string()).into())
}

/// Helper to parse PokemonDetails from message parts
pub fn parse_details(parts: &[&str], index: usize) -> PokemonDetails {
    parts
        .get(index)
        .map(|s| PokemonDetails::parse(s))
        .unwrap_or_default()
}

/// Helper to parse HpStatus from message parts
pub fn parse_hp_status(parts: &[&str], index: usize) -> Option<HpStatus> {
    parts.get(index).and_then(|s| HpStatus::parse(s))
}

/// A required `p1`/`p2` field
pub fn parse_player(parts: &[&str], index: usize) -> Result<Player, anyhow::Error> {
    parts
        .get(index)
        .and_then(|s| Player::parse(s))
        .ok_or_else(|| ParseError::MissingField("player".to_string()).into())
}

/// A required numeric field; missing or unparsable values name the field
pub fn parse_number<T: std::str::FromStr>(
    parts: &[&str],
    index: usize,
    field: &str,
) -> Result<T, anyhow::Error> {
    parts
        .get(index)
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| ParseError::MissingField(field.to_string()).into())
}

/// Helper to read a plain text field, treating tags as absent
pub fn parse_text(parts: &[&str], index: usize) -> String {
    parts
        .get(index)
        .filter(|p| !p.starts_with('['))
        .map(|s| s.to_string())
        .unwrap_or_default()
}
