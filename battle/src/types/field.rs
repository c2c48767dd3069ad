//! Global field state

use super::conditions::{Terrain, Weather};
use super::side::SideRole;
use scry_protocol::server::Effect;
use serde::{Deserialize, Serialize};

/// The Pokemon that set the current weather
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSource {
    pub side: SideRole,
    /// Species name of the side's active Pokemon when the weather started
    pub name: String,
}

/// Global field state affecting all Pokemon
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    pub weather: Option<Weather>,
    pub weather_source: Option<WeatherSource>,
    /// Turns left before the weather subsides; `None` for weather that never ends
    pub weather_turns_remaining: Option<u8>,

    pub terrain: Option<Terrain>,
    pub terrain_turns_remaining: u8,

    /// Trick Room active (slower Pokemon move first)
    pub trick_room: bool,
    pub trick_room_turns_remaining: u8,

    /// Magic Room active (items suppressed)
    pub magic_room: bool,

    /// Wonder Room active (Def/SpD swapped)
    pub wonder_room: bool,

    /// Gravity active (Flying immunity removed)
    pub gravity: bool,

    pub mud_sport: bool,
    pub water_sport: bool,
}

impl FieldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_weather(&mut self) {
        self.weather = None;
        self.weather_source = None;
        self.weather_turns_remaining = Some(0);
    }

    /// Apply a `-fieldstart` condition; `duration` seeds terrain and Trick Room counters
    pub fn apply_field_start(&mut self, condition: &Effect, duration: u8) {
        if let Some(terrain) = Terrain::from_protocol(condition.name()) {
            self.terrain = Some(terrain);
            self.terrain_turns_remaining = duration;
            return;
        }

        match condition.id().as_str() {
            "trickroom" => {
                self.trick_room = true;
                self.trick_room_turns_remaining = 5;
            }
            "magicroom" => self.magic_room = true,
            "wonderroom" => self.wonder_room = true,
            "gravity" => self.gravity = true,
            "mudsport" => self.mud_sport = true,
            "watersport" => self.water_sport = true,
            _ => {}
        }
    }

    /// Apply a `-fieldend` condition
    pub fn apply_field_end(&mut self, condition: &Effect) {
        if Terrain::from_protocol(condition.name()).is_some() {
            self.terrain = None;
            self.terrain_turns_remaining = 0;
            return;
        }

        match condition.id().as_str() {
            "trickroom" => {
                self.trick_room = false;
                self.trick_room_turns_remaining = 0;
            }
            "magicroom" => self.magic_room = false,
            "wonderroom" => self.wonder_room = false,
            "gravity" => self.gravity = false,
            "mudsport" => self.mud_sport = false,
            "watersport" => self.water_sport = false,
            _ => {}
        }
    }

    /// Advance terrain and Trick Room counters at the end of a turn
    ///
    /// Terrain that hits zero but is still up was extended by Terrain Extender,
    /// which leaves three more turns.
    pub fn tick(&mut self) {
        if self.terrain.is_some() && self.terrain_turns_remaining > 0 {
            self.terrain_turns_remaining -= 1;
            if self.terrain_turns_remaining == 0 {
                self.terrain_turns_remaining = 3;
            }
        }

        if self.trick_room {
            self.trick_room_turns_remaining = self.trick_room_turns_remaining.saturating_sub(1);
        }
    }

    pub fn weather_is(&self, weather: &[Weather]) -> bool {
        self.weather.is_some_and(|w| weather.contains(&w))
    }

    pub fn has_any_condition(&self) -> bool {
        self.weather.is_some()
            || self.terrain.is_some()
            || self.trick_room
            || self.magic_room
            || self.wonder_room
            || self.gravity
            || self.mud_sport
            || self.water_sport
    }
}
