//! The JSON payload of `|request|`
//!
//! A request is the server's view of the player's own side: the full roster
//! with exact stats, items and abilities, plus the pp of whatever is active.
//! Fields the tracker has no use for are left undeclared and ignored.

use super::battle::{HpStatus, Player, PokemonDetails, to_id};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRequest {
    pub rqid: Option<u64>,
    #[serde(default)]
    pub active: Option<Vec<ActivePokemon>>,
    pub side: Option<SideInfo>,
    #[serde(default)]
    pub force_switch: Option<Vec<bool>>,
    #[serde(default)]
    pub team_preview: bool,
    /// Nothing to choose; the opponent is still deciding
    #[serde(default)]
    pub wait: bool,
}

impl BattleRequest {
    /// Decode a request, `None` when the payload is not a request object
    pub fn parse(json: &serde_json::Value) -> Option<Self> {
        Self::deserialize(json).ok()
    }

    pub fn is_force_switch(&self) -> bool {
        self.force_switch
            .iter()
            .flatten()
            .any(|&must_switch| must_switch)
    }

    /// The roster entry flagged active, if any
    pub fn active_pokemon(&self) -> Option<&SidePokemon> {
        self.side.as_ref()?.pokemon.iter().find(|p| p.active)
    }

    /// Move slots of the active Pokemon; empty outside a move request
    pub fn active_moves(&self) -> &[MoveSlot] {
        match self.active.as_deref() {
            Some([first, ..]) => &first.moves,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePokemon {
    #[serde(default)]
    pub moves: Vec<MoveSlot>,
    #[serde(default)]
    pub trapped: bool,
    #[serde(default)]
    pub can_terastallize: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoveSlot {
    #[serde(rename = "move")]
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub pp: u32,
    #[serde(rename = "maxpp", default)]
    pub max_pp: u32,
    /// `true`, `false`, or the name of what disabled it
    #[serde(default)]
    pub disabled: serde_json::Value,
}

impl MoveSlot {
    pub fn is_disabled(&self) -> bool {
        match &self.disabled {
            serde_json::Value::Bool(disabled) => *disabled,
            serde_json::Value::String(source) => !source.is_empty(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SideInfo {
    pub name: String,
    /// `p1` or `p2`
    pub id: String,
    #[serde(default)]
    pub pokemon: Vec<SidePokemon>,
}

impl SideInfo {
    pub fn player(&self) -> Option<Player> {
        Player::parse(&self.id)
    }
}

/// One roster entry, in the server's team order
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidePokemon {
    /// `p1: Nickname`
    pub ident: String,
    pub details: String,
    /// `HP/MAX STATUS`, or `0 fnt`
    pub condition: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub stats: PokemonStats,
    /// Move ids, already normalised by the server
    #[serde(default)]
    pub moves: Vec<String>,
    #[serde(default)]
    pub base_ability: String,
    #[serde(default)]
    pub ability: String,
    /// Empty when the Pokemon holds nothing
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub teratype: Option<String>,
    #[serde(default)]
    pub terastallized: Option<String>,
}

impl SidePokemon {
    pub fn hp_status(&self) -> Option<HpStatus> {
        HpStatus::parse(&self.condition)
    }

    /// Major status from the condition; fainting is not a status
    pub fn status(&self) -> Option<&str> {
        let (_, status) = self.condition.split_once(' ')?;
        Some(status.trim()).filter(|s| !s.is_empty() && *s != "fnt")
    }

    pub fn parsed_details(&self) -> PokemonDetails {
        PokemonDetails::parse(&self.details)
    }

    pub fn species_id(&self) -> String {
        self.parsed_details().species_id()
    }

    pub fn nickname(&self) -> &str {
        match self.ident.split_once(": ") {
            Some((_, name)) => name,
            None => &self.ident,
        }
    }

    /// Current ability, falling back to the base one
    pub fn ability_id(&self) -> Option<String> {
        [&self.ability, &self.base_ability]
            .into_iter()
            .find(|a| !a.is_empty())
            .map(|a| to_id(a))
    }
}

/// Exact stats; hp is carried by the condition instead
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PokemonStats {
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}
