//! Weather, terrain, rooms and side conditions

use scry_protocol::server::{Effect, Player, Tags, to_id};
use tracing::debug;

use super::battle::TrackedBattle;
use crate::types::{SideCondition, SideRole, Terrain, Weather, WeatherSource};

/// Turns granted by Light Clay to screens
const LIGHT_CLAY_TURNS: u8 = 8;

/// Turns granted by a weather rock or Terrain Extender
const EXTENDED_TURNS: u8 = 8;

const TERRAIN_TURNS: u8 = 5;

/// Turns left when a screen or weather outlasts its base duration
pub(crate) const EXTENSION_OVERRUN_TURNS: u8 = 3;

/// Moves that summon weather
fn weather_move(weather: Weather) -> &'static [&'static str] {
    match weather {
        Weather::Sun => &["sunnyday"],
        Weather::Rain => &["raindance"],
        Weather::Sand => &["sandstorm"],
        Weather::Hail => &["hail"],
        Weather::Snow => &["snowscape", "chillyreception"],
        _ => &[],
    }
}

impl TrackedBattle {
    /// The side whose action this turn was one of `moves`, if exactly one side's was
    fn side_that_used(&self, moves: &[&str]) -> Option<SideRole> {
        let turn = self.battle.turn;
        let used = |role: SideRole| {
            self.battle
                .side(role)
                .last_used_move
                .as_ref()
                .filter(|m| m.turn == turn)
                .and_then(|m| m.move_id())
                .is_some_and(|id| moves.contains(&id))
        };
        match (used(SideRole::User), used(SideRole::Opponent)) {
            (true, false) => Some(SideRole::User),
            (false, true) => Some(SideRole::Opponent),
            _ => None,
        }
    }

    fn active_holds(&self, role: SideRole, item: &str) -> bool {
        self.battle
            .side(role)
            .active
            .as_ref()
            .is_some_and(|p| p.item.is(item))
    }

    // === Weather ===

    /// `-weather`: a new weather, or an `[upkeep]` line for the current one
    pub(crate) fn handle_weather(&mut self, weather: &str, upkeep: bool, tags: &Tags) {
        if to_id(weather) == "none" {
            self.battle.field.clear_weather();
            return;
        }
        let Some(parsed) = Weather::from_protocol(weather) else {
            debug!(weather, "ignoring unknown weather");
            return;
        };

        if upkeep {
            self.advance_weather();
            return;
        }

        let policy = self.battle.policy();
        let (role, from_ability) = match &tags.of {
            Some(of) => (Some(self.role(of.player)), matches!(tags.from, Some(Effect::Ability(_)))),
            None => (self.side_that_used(weather_move(parsed)), false),
        };
        if let Some(of) = &tags.of {
            self.reveal_source(of, tags);
        }

        let base = if parsed.is_primal() {
            None
        } else if from_ability {
            policy.ability_weather_turns
        } else {
            Some(policy.move_weather_turns)
        };
        let extended = match (role, parsed.extension_item()) {
            (Some(role), Some(rock)) => self.active_holds(role, rock),
            _ => false,
        };

        let source = role.and_then(|side| {
            let name = self.battle.side(side).active.as_ref()?.species().to_string();
            Some(WeatherSource { side, name })
        });

        let field = &mut self.battle.field;
        field.weather = Some(parsed);
        field.weather_source = source;
        field.weather_turns_remaining = match base {
            Some(_) if extended => Some(EXTENDED_TURNS),
            turns => turns,
        };
    }

    /// One turn of weather passed; outlasting the count reveals a rock on the setter
    fn advance_weather(&mut self) {
        let field = &mut self.battle.field;
        let Some(turns) = field.weather_turns_remaining else {
            return;
        };
        if turns > 1 {
            field.weather_turns_remaining = Some(turns - 1);
            return;
        }

        field.weather_turns_remaining = Some(EXTENSION_OVERRUN_TURNS);
        let rock = field.weather.and_then(|w| w.extension_item());
        let Some((source, rock)) = field.weather_source.clone().zip(rock) else {
            return;
        };
        if !self.config.infer_hidden_information {
            return;
        }
        if let Some(setter) = self
            .battle
            .side_mut(source.side)
            .find_mut(&source.name)
            && setter.item.is_unknown()
        {
            debug!(species = %source.name, rock, "weather outlasted its turns");
            setter.infer_item(rock);
        }
    }

    // === Field ===

    pub(crate) fn handle_field_start(&mut self, condition: &Effect, tags: &Tags) {
        let mut duration = TERRAIN_TURNS;
        if let Some(terrain) = Terrain::from_protocol(condition.name()) {
            let setter = match &tags.of {
                Some(of) => Some(self.role(of.player)),
                None => self.side_that_used(&[terrain_move(terrain)]),
            };
            if setter.is_some_and(|role| self.active_holds(role, "terrainextender")) {
                duration = EXTENDED_TURNS;
            }
        }
        if let Some(of) = &tags.of {
            self.reveal_source(of, tags);
        }
        self.battle.field.apply_field_start(condition, duration);
    }

    // === Side conditions ===

    pub(crate) fn handle_side_start(&mut self, player: Player, condition: &Effect) {
        let Some(cond) = SideCondition::from_protocol(&condition.id()) else {
            debug!(condition = condition.name(), "untracked side condition");
            return;
        };
        let role = self.role(player);
        let tailwind_turns = self.battle.policy().tailwind_turns;
        let light_clay = cond.is_screen() && self.active_holds(role, "lightclay");

        let side = self.battle.side_mut(role);
        match cond {
            SideCondition::Tailwind => side.set_condition(cond, tailwind_turns),
            _ if light_clay => side.set_condition(cond, LIGHT_CLAY_TURNS),
            _ => match cond.base_duration() {
                Some(turns) => side.set_condition(cond, turns),
                None => {
                    side.add_layer(cond);
                }
            },
        }
    }

    pub(crate) fn handle_side_end(&mut self, player: Player, condition: &Effect) {
        if let Some(cond) = SideCondition::from_protocol(&condition.id()) {
            self.side_mut(player).remove_condition(cond);
        }
    }

    /// Court Change
    pub(crate) fn swap_side_conditions(&mut self) {
        let battle = &mut self.battle;
        std::mem::swap(&mut battle.user.conditions, &mut battle.opponent.conditions);
    }
}

fn terrain_move(terrain: Terrain) -> &'static str {
    match terrain {
        Terrain::Electric => "electricterrain",
        Terrain::Grassy => "grassyterrain",
        Terrain::Misty => "mistyterrain",
        Terrain::Psychic => "psychicterrain",
    }
}
