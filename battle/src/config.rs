//! Tracker configuration

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// How the opponent's team was built, which decides what inference may assume
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleType {
    /// Player-built teams
    #[default]
    Standard,
    /// Generated sets with fixed levels and a fixed spread
    RandomBattle,
    /// Sets drawn from a known pool
    BattleFactory,
}

impl BattleType {
    /// Classify a format id such as `gen9randombattle` or `gen3ou`
    ///
    /// Formats with more than one active Pokemon per side are rejected.
    pub fn from_format(format: &str) -> Result<Self, TrackerError> {
        let id = scry_protocol::server::to_id(format);
        if format_generation(&id).is_none() {
            return Err(TrackerError::UnsupportedFormat(format.to_string()));
        }

        if ["doubles", "triples", "multi", "freeforall", "ffa", "vgc"]
            .iter()
            .any(|marker| id.contains(marker))
        {
            return Err(TrackerError::UnsupportedFormat(format.to_string()));
        }

        if id.contains("randombattle") {
            Ok(BattleType::RandomBattle)
        } else if id.contains("battlefactory") {
            Ok(BattleType::BattleFactory)
        } else {
            Ok(BattleType::Standard)
        }
    }

    /// Whether sets come from a pool the dex can enumerate
    pub fn has_set_pool(&self) -> bool {
        !matches!(self, BattleType::Standard)
    }
}

/// Generation number from a `genN...` format id
pub fn format_generation(format: &str) -> Option<u8> {
    let rest = format.strip_prefix("gen")?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok().filter(|g| (1..=9).contains(g))
}

/// Settings for one tracked battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// The bot's username; a matching `|player|` line picks the bot's side
    pub username: Option<String>,

    /// Generation assumed until a `|gen|` line arrives
    pub generation: u8,

    pub battle_type: BattleType,

    /// Turn off every hidden-information deduction
    pub infer_hidden_information: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            username: None,
            generation: 9,
            battle_type: BattleType::Standard,
            infer_hidden_information: true,
        }
    }
}

impl TrackerConfig {
    pub fn from_json(json: &str) -> Result<Self, TrackerError> {
        serde_json::from_str(json).map_err(TrackerError::InvalidConfig)
    }
}
