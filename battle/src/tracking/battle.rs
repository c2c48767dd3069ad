//! TrackedBattle - the battle snapshot plus everything needed to keep it current

use std::sync::Arc;

use scry_protocol::server::{BattleRequest, GameType, Player, Pokemon, to_id};
use scry_protocol::{ServerMessage, parse_server_message, split_frame};
use tracing::{trace, warn};

use crate::config::{BattleType, TrackerConfig, format_generation};
use crate::dex::{Dex, builtin_dex};
use crate::error::TrackerError;
use crate::inference::{self, DamageDealt};
use crate::types::{Battle, LastUsedMove, PokemonState, SideRole, SideState};

/// A battle being tracked from server messages
///
/// Reconstructs battle state from the protocol stream as seen by one player
/// (the bot), and layers deductions about the opponent's hidden information
/// on top of what the protocol states outright.
#[derive(Debug, Clone)]
pub struct TrackedBattle {
    // === State ===
    pub(crate) battle: Battle,

    // === Collaborators ===
    pub(crate) dex: Arc<dyn Dex>,
    pub(crate) config: TrackerConfig,

    // === Perspective ===
    /// Which player the bot is
    pub(crate) perspective: Player,

    /// Last decoded `|request|` payload
    pub(crate) request: Option<BattleRequest>,

    /// Damage attributed to each move of the most recent batch
    pub(crate) turn_damage: Vec<DamageDealt>,
}

impl TrackedBattle {
    /// Create a tracker with the default config and the built-in dex
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        Self::with_dex(config, builtin_dex())
    }

    pub fn with_dex(config: TrackerConfig, dex: Arc<dyn Dex>) -> Self {
        Self {
            battle: Battle::new(config.generation, config.battle_type),
            dex,
            config,
            perspective: Player::P1,
            request: None,
            turn_damage: Vec::new(),
        }
    }

    /// Create a tracker for a format id, failing fast on formats it cannot track
    pub fn for_format(format: &str, mut config: TrackerConfig) -> Result<Self, TrackerError> {
        config.battle_type = BattleType::from_format(format)?;
        if let Some(generation) = format_generation(&to_id(format)) {
            config.generation = generation;
        }
        Ok(Self::with_config(config))
    }

    // === Accessors ===

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    pub fn battle_mut(&mut self) -> &mut Battle {
        &mut self.battle
    }

    /// An owned copy of the current state for a search worker
    pub fn snapshot(&self) -> Battle {
        self.battle.clone()
    }

    pub fn dex(&self) -> &dyn Dex {
        self.dex.as_ref()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn perspective(&self) -> Player {
        self.perspective
    }

    /// Set which player the bot is
    pub fn set_perspective(&mut self, player: Player) {
        self.perspective = player;
    }

    pub fn request(&self) -> Option<&BattleRequest> {
        self.request.as_ref()
    }

    /// Damage each move of the most recent batch dealt
    pub fn turn_damage(&self) -> &[DamageDealt] {
        &self.turn_damage
    }

    /// Record the action the bot chose ("tackle" or "switch weedle")
    pub fn record_selected_action(&mut self, action: &str) {
        let turn = self.battle.turn;
        let pokemon = self.battle.user.active.as_ref().map(|p| p.species().to_string());
        self.battle.user.last_selected_move = Some(LastUsedMove {
            pokemon,
            action: action.to_string(),
            turn,
        });
    }

    // === Side and Pokemon resolution ===

    pub(crate) fn role(&self, player: Player) -> SideRole {
        SideRole::of(player, self.perspective)
    }

    pub(crate) fn side_mut(&mut self, player: Player) -> &mut SideState {
        let role = self.role(player);
        self.battle.side_mut(role)
    }

    /// Resolve an identifier; an active-slot identifier always means the active Pokemon
    pub(crate) fn pokemon_mut(&mut self, ident: &Pokemon) -> Option<&mut PokemonState> {
        let side = self.side_mut(ident.player);
        if ident.is_active_slot() {
            return side.active.as_mut();
        }
        side.find_mut(&ident.name)
    }

    pub(crate) fn pokemon(&self, ident: &Pokemon) -> Option<&PokemonState> {
        let side = self.battle.side(self.role(ident.player));
        if ident.is_active_slot() {
            return side.active.as_ref();
        }
        side.pokemon().find(|p| p.answers_to(&ident.name))
    }

    pub(crate) fn is_bot_username(&self, username: &str) -> bool {
        self.config
            .username
            .as_deref()
            .is_some_and(|name| to_id(name) == to_id(username))
    }

    // === Pipeline ===

    /// Parse and apply a single line
    pub fn apply_line(&mut self, line: &str) {
        match parse_server_message(line) {
            Ok(msg) => self.update(&msg),
            Err(err) => warn!(%err, line, "skipping malformed line"),
        }
    }

    /// Apply a raw server frame (optional `>ROOMID` header plus lines)
    pub fn process_frame(&mut self, frame: &str) -> Result<(), TrackerError> {
        let (room_id, lines) = split_frame(frame);
        if let Some(room_id) = room_id
            && self.battle.battle_tag.is_none()
        {
            self.battle.battle_tag = Some(room_id);
        }
        self.process_turn(&lines)
    }

    /// Apply one batch of lines as a unit
    ///
    /// Buffer-level deductions (speed ranges, choice scarf) read the state as it was
    /// before the batch. Lookahead deductions run right after the line that triggers
    /// them. Requests describe the state after the batch, so they are applied last.
    pub fn process_turn(&mut self, lines: &[&str]) -> Result<(), TrackerError> {
        let messages = self.parse_batch(lines);

        for msg in &messages {
            if let ServerMessage::GameType(game_type) = msg
                && *game_type != GameType::Singles
            {
                return Err(TrackerError::UnsupportedGameType(
                    game_type.as_str().to_string(),
                ));
            }
        }

        self.turn_damage.clear();
        let infer = self.config.infer_hidden_information;

        if infer {
            inference::speed::check_speed_ranges(
                &mut self.battle,
                self.dex.as_ref(),
                self.perspective,
                &messages,
            );
            inference::speed::check_choice_scarf(
                &mut self.battle,
                self.dex.as_ref(),
                self.perspective,
                &messages,
            );
        }

        let mut requests = Vec::new();
        for (index, msg) in messages.iter().enumerate() {
            if let ServerMessage::Request(_) = msg {
                requests.push(msg);
                continue;
            }

            self.update(msg);
            self.after_line(msg, &messages[index + 1..], infer);
        }

        for msg in requests {
            self.update(msg);
        }

        Ok(())
    }

    /// Parse a batch, keeping the copy of each `|split|` pair meant for the bot
    fn parse_batch(&mut self, lines: &[&str]) -> Vec<ServerMessage> {
        let mut messages = Vec::with_capacity(lines.len());
        let mut split: Option<(Player, u8)> = None;

        for line in lines {
            let msg = match parse_server_message(line) {
                Ok(msg) => msg,
                Err(err) => {
                    warn!(%err, line, "skipping malformed line");
                    continue;
                }
            };

            if let ServerMessage::BattlePlayer {
                player, username, ..
            } = &msg
                && self.is_bot_username(username)
            {
                self.perspective = *player;
            }

            if let ServerMessage::Split(owner) = msg {
                split = Some((owner, 0));
                continue;
            }

            if let Some((owner, seen)) = split {
                let seen = seen + 1;
                split = (seen < 2).then_some((owner, seen));
                let secret_copy = seen == 1;
                if secret_copy != (owner == self.perspective) {
                    continue;
                }
            }

            messages.push(msg);
        }

        messages
    }

    /// Deductions that look ahead from the line just applied
    fn after_line(&mut self, msg: &ServerMessage, following: &[ServerMessage], infer: bool) {
        match msg {
            ServerMessage::Switch { pokemon, .. } | ServerMessage::Drag { pokemon, .. }
                if infer && self.role(pokemon.player) == SideRole::Opponent =>
            {
                inference::boots::check_heavy_duty_boots(
                    &mut self.battle,
                    self.dex.as_ref(),
                    self.perspective,
                    following,
                );
            }
            ServerMessage::Move { pokemon, .. } => {
                if let Some(dealt) =
                    inference::damage_dealt(&self.battle, self.perspective, msg, following)
                {
                    trace!(?dealt, "attributed move damage");
                    self.turn_damage.push(dealt);
                }
                if !infer {
                    return;
                }
                match self.role(pokemon.player) {
                    SideRole::Opponent => inference::items::check_attack_items(
                        &mut self.battle,
                        self.dex.as_ref(),
                        self.perspective,
                        msg,
                        following,
                    ),
                    SideRole::User => {
                        inference::illusion::check_immunity(
                            &mut self.battle,
                            self.dex.as_ref(),
                            self.perspective,
                            following,
                        );
                    }
                }
            }
            _ => {}
        }
    }
}

impl Default for TrackedBattle {
    fn default() -> Self {
        Self::new()
    }
}
