//! Side (player) state

use std::collections::HashMap;

use scry_protocol::server::Player;
use serde::{Deserialize, Serialize};

use super::conditions::SideCondition;
use super::pokemon::PokemonState;

/// Which side of the battle, from the bot's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideRole {
    User,
    Opponent,
}

impl SideRole {
    /// Role of `player` when the bot plays as `perspective`
    pub fn of(player: Player, perspective: Player) -> Self {
        if player == perspective {
            SideRole::User
        } else {
            SideRole::Opponent
        }
    }

    pub fn other(self) -> Self {
        match self {
            SideRole::User => SideRole::Opponent,
            SideRole::Opponent => SideRole::User,
        }
    }
}

/// The last action a side took: a move id or `switch <name>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastUsedMove {
    /// Species of the Pokemon that acted, if one was active
    pub pokemon: Option<String>,
    pub action: String,
    pub turn: u32,
}

impl LastUsedMove {
    pub fn is_switch(&self) -> bool {
        self.action.starts_with("switch ")
    }

    /// The move id, if this action was a move
    pub fn move_id(&self) -> Option<&str> {
        (!self.is_switch()).then_some(self.action.as_str())
    }
}

/// One player's side of the battle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideState {
    /// Username shown by `|player|`
    pub username: Option<String>,

    /// Active Pokemon; absent during team preview
    pub active: Option<PokemonState>,

    /// Every other Pokemon seen on this side
    pub reserve: Vec<PokemonState>,

    /// Hazard layers, screen turns and bookkeeping counters
    pub conditions: HashMap<SideCondition, u8>,

    /// (turns until it lands, HP it restores)
    pub wish: (u8, u32),

    /// (turns until it lands, species of the user)
    pub future_sight: (u8, String),

    /// Shed Tail was used and the replacement has not switched in yet
    pub shed_tailing: bool,

    pub last_used_move: Option<LastUsedMove>,

    /// Last action the bot chose for this side (only tracked for the user)
    pub last_selected_move: Option<LastUsedMove>,
}

impl SideState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&PokemonState> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut PokemonState> {
        self.active.as_mut()
    }

    /// Index of the reserve entry a protocol name refers to
    pub fn find_reserve(&self, name: &str) -> Option<usize> {
        self.reserve.iter().position(|p| p.answers_to(name))
    }

    pub fn find_reserve_mut(&mut self, name: &str) -> Option<&mut PokemonState> {
        self.reserve.iter_mut().find(|p| p.answers_to(name))
    }

    /// Active Pokemon if it answers to `name`, otherwise the matching reserve entry
    pub fn find_mut(&mut self, name: &str) -> Option<&mut PokemonState> {
        if self.active.as_ref().is_some_and(|p| p.answers_to(name)) {
            return self.active.as_mut();
        }
        self.find_reserve_mut(name)
    }

    /// Active first, then reserve
    pub fn pokemon(&self) -> impl Iterator<Item = &PokemonState> {
        self.active.iter().chain(self.reserve.iter())
    }

    pub fn alive_count(&self) -> usize {
        self.pokemon().filter(|p| p.is_alive()).count()
    }

    pub fn fainted_count(&self) -> usize {
        self.pokemon().filter(|p| p.fainted).count()
    }

    // === Conditions ===

    /// Counter for a condition (0 if absent)
    pub fn condition(&self, cond: SideCondition) -> u8 {
        self.conditions.get(&cond).copied().unwrap_or(0)
    }

    pub fn has_condition(&self, cond: SideCondition) -> bool {
        self.condition(cond) > 0
    }

    pub fn set_condition(&mut self, cond: SideCondition, value: u8) {
        self.conditions.insert(cond, value);
    }

    /// Add one layer, capped at the condition's maximum
    pub fn add_layer(&mut self, cond: SideCondition) -> u8 {
        let layers = (self.condition(cond) + 1).min(cond.max_layers());
        self.conditions.insert(cond, layers);
        layers
    }

    pub fn remove_condition(&mut self, cond: SideCondition) {
        self.conditions.insert(cond, 0);
    }

    pub fn active_hazards(&self) -> impl Iterator<Item = SideCondition> + '_ {
        self.conditions
            .iter()
            .filter(|(cond, layers)| cond.is_hazard() && **layers > 0)
            .map(|(cond, _)| *cond)
    }

    pub fn has_hazards(&self) -> bool {
        self.active_hazards().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_are_capped() {
        let mut side = SideState::new();
        assert_eq!(side.add_layer(SideCondition::Spikes), 1);
        assert_eq!(side.add_layer(SideCondition::Spikes), 2);
        assert_eq!(side.add_layer(SideCondition::Spikes), 3);
        assert_eq!(side.add_layer(SideCondition::Spikes), 3);
        assert_eq!(side.add_layer(SideCondition::StealthRock), 1);
        assert_eq!(side.add_layer(SideCondition::StealthRock), 1);
    }

    #[test]
    fn test_removed_condition_reads_zero() {
        let mut side = SideState::new();
        side.set_condition(SideCondition::Reflect, 5);
        assert!(side.has_condition(SideCondition::Reflect));

        side.remove_condition(SideCondition::Reflect);
        assert_eq!(side.condition(SideCondition::Reflect), 0);
        assert!(!side.has_hazards());
    }

    #[test]
    fn test_find_prefers_active() {
        let mut side = SideState::new();
        side.active = Some(PokemonState::new("Weedle", 100));
        side.reserve.push(PokemonState::new("Caterpie", 100));

        assert_eq!(side.find_reserve("Caterpie"), Some(0));
        assert_eq!(side.find_mut("Weedle").map(|p| p.identity.level), Some(100));
        assert!(side.find_mut("Pidgey").is_none());
    }

    #[test]
    fn test_counts() {
        let mut side = SideState::new();
        side.active = Some(PokemonState::new("Weedle", 100));
        let mut fainted = PokemonState::new("Caterpie", 100);
        fainted.fainted = true;
        fainted.hp = 0;
        side.reserve.push(fainted);

        assert_eq!(side.alive_count(), 1);
        assert_eq!(side.fainted_count(), 1);
    }

    #[test]
    fn test_role_from_perspective() {
        assert_eq!(SideRole::of(Player::P2, Player::P2), SideRole::User);
        assert_eq!(SideRole::of(Player::P1, Player::P2), SideRole::Opponent);
        assert_eq!(SideRole::User.other(), SideRole::Opponent);
    }

    #[test]
    fn test_last_used_move() {
        let switch = LastUsedMove {
            pokemon: None,
            action: "switch weedle".to_string(),
            turn: 0,
        };
        assert!(switch.is_switch());
        assert_eq!(switch.move_id(), None);

        let tackle = LastUsedMove {
            pokemon: Some("weedle".to_string()),
            action: "tackle".to_string(),
            turn: 3,
        };
        assert_eq!(tackle.move_id(), Some("tackle"));
    }
}
