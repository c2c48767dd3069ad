//! The battle snapshot handed to decision-makers

use serde::{Deserialize, Serialize};

use super::field::FieldState;
use super::side::{SideRole, SideState};
use crate::config::BattleType;
use crate::policy::GenerationPolicy;

/// Everything known about a battle at one point in time
///
/// Owned and free of references, so a copy can be moved into another task
/// or serialized for an out-of-process worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    /// The bot's side
    pub user: SideState,
    pub opponent: SideState,

    pub generation: u8,
    pub battle_type: BattleType,

    /// Current turn number (0 before the first `|turn|`)
    pub turn: u32,

    pub field: FieldState,

    // === Request flags ===
    pub team_preview: bool,
    pub force_switch: bool,
    pub wait: bool,

    /// Seconds left on the bot's battle timer
    pub time_remaining: Option<u32>,

    /// Room id, updated when the room is renamed
    pub battle_tag: Option<String>,

    // === Outcome ===
    pub ended: bool,
    /// Winner's username; `None` on a tie
    pub winner: Option<String>,
}

impl Battle {
    pub fn new(generation: u8, battle_type: BattleType) -> Self {
        Self {
            user: SideState::new(),
            opponent: SideState::new(),
            generation,
            battle_type,
            turn: 0,
            field: FieldState::new(),
            team_preview: false,
            force_switch: false,
            wait: false,
            time_remaining: None,
            battle_tag: None,
            ended: false,
            winner: None,
        }
    }

    pub fn side(&self, role: SideRole) -> &SideState {
        match role {
            SideRole::User => &self.user,
            SideRole::Opponent => &self.opponent,
        }
    }

    pub fn side_mut(&mut self, role: SideRole) -> &mut SideState {
        match role {
            SideRole::User => &mut self.user,
            SideRole::Opponent => &mut self.opponent,
        }
    }

    /// Rule variants for this battle's generation
    pub fn policy(&self) -> &'static GenerationPolicy {
        GenerationPolicy::for_generation(self.generation)
    }
}

impl Default for Battle {
    fn default() -> Self {
        Self::new(9, BattleType::Standard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PokemonState;

    #[test]
    fn test_new_battle() {
        let battle = Battle::default();
        assert_eq!(battle.generation, 9);
        assert_eq!(battle.turn, 0);
        assert!(battle.user.active.is_none());
        assert!(!battle.ended);
    }

    #[test]
    fn test_side_by_role() {
        let mut battle = Battle::default();
        battle.side_mut(SideRole::Opponent).active = Some(PokemonState::new("Caterpie", 100));
        assert!(battle.side(SideRole::Opponent).active.is_some());
        assert!(battle.side(SideRole::User).active.is_none());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut battle = Battle::new(4, BattleType::RandomBattle);
        battle.user.active = Some(PokemonState::new("Weedle", 83));
        let json = serde_json::to_string(&battle).unwrap();
        let back: Battle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, battle);
    }
}
