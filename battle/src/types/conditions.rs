//! Field and side conditions

use scry_protocol::server::{Effect, to_id};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    Sun,
    Rain,
    Sand,
    Hail,
    /// Replaces Hail from gen 9
    Snow,
    HarshSun,
    HeavyRain,
    StrongWinds,
}

impl Weather {
    /// Parse from a `-weather` argument ("SunnyDay", "RainDance", "none", ...)
    pub fn from_protocol(s: &str) -> Option<Self> {
        match to_id(s).as_str() {
            "sunnyday" | "sun" => Some(Weather::Sun),
            "raindance" | "rain" => Some(Weather::Rain),
            "sandstorm" | "sand" => Some(Weather::Sand),
            "hail" => Some(Weather::Hail),
            "snow" | "snowscape" => Some(Weather::Snow),
            "desolateland" => Some(Weather::HarshSun),
            "primordialsea" => Some(Weather::HeavyRain),
            "deltastream" => Some(Weather::StrongWinds),
            _ => None,
        }
    }

    /// Primal weather cannot be overwritten by ordinary weather
    pub fn is_primal(self) -> bool {
        matches!(
            self,
            Weather::HarshSun | Weather::HeavyRain | Weather::StrongWinds
        )
    }

    /// Rock that extends this weather from 5 to 8 turns
    pub fn extension_item(self) -> Option<&'static str> {
        match self {
            Weather::Sun => Some("heatrock"),
            Weather::Rain => Some("damprock"),
            Weather::Sand => Some("smoothrock"),
            Weather::Hail | Weather::Snow => Some("icyrock"),
            _ => None,
        }
    }

    /// Ability that summons this weather on switch-in
    pub fn setter_ability(self) -> &'static str {
        match self {
            Weather::Sun => "drought",
            Weather::Rain => "drizzle",
            Weather::Sand => "sandstream",
            Weather::Hail | Weather::Snow => "snowwarning",
            Weather::HarshSun => "desolateland",
            Weather::HeavyRain => "primordialsea",
            Weather::StrongWinds => "deltastream",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weather::Sun => "SunnyDay",
            Weather::Rain => "RainDance",
            Weather::Sand => "Sandstorm",
            Weather::Hail => "Hail",
            Weather::Snow => "Snow",
            Weather::HarshSun => "DesolateLand",
            Weather::HeavyRain => "PrimordialSea",
            Weather::StrongWinds => "DeltaStream",
        }
    }
}

impl std::fmt::Display for Weather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Electric,
    Grassy,
    Misty,
    Psychic,
}

impl Terrain {
    /// Parse from a `-fieldstart` effect ("move: Grassy Terrain")
    pub fn from_protocol(s: &str) -> Option<Self> {
        match Effect::parse(s).id().as_str() {
            "electricterrain" => Some(Terrain::Electric),
            "grassyterrain" => Some(Terrain::Grassy),
            "mistyterrain" => Some(Terrain::Misty),
            "psychicterrain" => Some(Terrain::Psychic),
            _ => None,
        }
    }

    /// Ability that sets this terrain on switch-in
    pub fn setter_ability(self) -> &'static str {
        match self {
            Terrain::Electric => "electricsurge",
            Terrain::Grassy => "grassysurge",
            Terrain::Misty => "mistysurge",
            Terrain::Psychic => "psychicsurge",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Terrain::Electric => "Electric Terrain",
            Terrain::Grassy => "Grassy Terrain",
            Terrain::Misty => "Misty Terrain",
            Terrain::Psychic => "Psychic Terrain",
        }
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-side conditions, stored as counters on [`SideState`](super::SideState)
///
/// Hazards count layers, screens and Tailwind count remaining turns, and the
/// bookkeeping entries (`Protect`, `ToxicCount`, `HealingWish`) count whatever
/// the tracker needs them to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideCondition {
    Reflect,
    LightScreen,
    AuroraVeil,
    Spikes,
    ToxicSpikes,
    StealthRock,
    StickyWeb,
    Tailwind,
    Safeguard,
    Mist,
    LuckyChant,
    WideGuard,
    QuickGuard,
    MatBlock,
    CraftyShield,
    /// Turns since the active Pokemon last used a protect-family move
    Protect,
    /// Turns of toxic damage taken by the active Pokemon
    ToxicCount,
    /// Healing Wish / Lunar Dance waiting for the next switch-in
    HealingWish,
}

/// (condition, display name, base duration); ids are derived from the name
const SIDE_CONDITIONS: &[(SideCondition, &str, Option<u8>)] = &[
    (SideCondition::Reflect, "Reflect", Some(5)),
    (SideCondition::LightScreen, "Light Screen", Some(5)),
    (SideCondition::AuroraVeil, "Aurora Veil", Some(5)),
    (SideCondition::Spikes, "Spikes", None),
    (SideCondition::ToxicSpikes, "Toxic Spikes", None),
    (SideCondition::StealthRock, "Stealth Rock", None),
    (SideCondition::StickyWeb, "Sticky Web", None),
    (SideCondition::Tailwind, "Tailwind", Some(4)),
    (SideCondition::Safeguard, "Safeguard", Some(5)),
    (SideCondition::Mist, "Mist", Some(5)),
    (SideCondition::LuckyChant, "Lucky Chant", Some(5)),
    (SideCondition::WideGuard, "Wide Guard", None),
    (SideCondition::QuickGuard, "Quick Guard", None),
    (SideCondition::MatBlock, "Mat Block", None),
    (SideCondition::CraftyShield, "Crafty Shield", None),
    (SideCondition::Protect, "Protect", None),
    (SideCondition::ToxicCount, "Toxic Count", None),
    (SideCondition::HealingWish, "Healing Wish", None),
];

impl SideCondition {
    fn entry(self) -> &'static (SideCondition, &'static str, Option<u8>) {
        SIDE_CONDITIONS
            .iter()
            .find(|(condition, ..)| *condition == self)
            .unwrap_or(&SIDE_CONDITIONS[0])
    }

    /// Parse from a `-sidestart`/`-sideend` effect ("move: Reflect", "Spikes")
    ///
    /// The tracker's own counters never come off the wire.
    pub fn from_protocol(s: &str) -> Option<Self> {
        let id = Effect::parse(s).id();
        if id == "lunardance" {
            return Some(SideCondition::HealingWish);
        }
        SIDE_CONDITIONS
            .iter()
            .filter(|(condition, ..)| {
                !matches!(condition, SideCondition::Protect | SideCondition::ToxicCount)
            })
            .find(|(_, name, _)| to_id(name) == id)
            .map(|(condition, ..)| *condition)
    }

    /// Layer cap for hazards, 1 for everything else
    pub fn max_layers(self) -> u8 {
        match self {
            SideCondition::Spikes => 3,
            SideCondition::ToxicSpikes => 2,
            _ => 1,
        }
    }

    pub fn is_screen(self) -> bool {
        matches!(
            self,
            SideCondition::Reflect | SideCondition::LightScreen | SideCondition::AuroraVeil
        )
    }

    pub fn is_hazard(self) -> bool {
        matches!(
            self,
            SideCondition::Spikes
                | SideCondition::ToxicSpikes
                | SideCondition::StealthRock
                | SideCondition::StickyWeb
        )
    }

    /// Starting turn count for conditions that expire on their own
    pub fn base_duration(self) -> Option<u8> {
        self.entry().2
    }

    /// Whether the counter is a turn countdown advanced at upkeep
    pub fn counts_down(self) -> bool {
        self.base_duration().is_some()
    }

    pub fn as_str(self) -> &'static str {
        self.entry().1
    }
}

impl std::fmt::Display for SideCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_from_protocol() {
        assert_eq!(Weather::from_protocol("SunnyDay"), Some(Weather::Sun));
        assert_eq!(Weather::from_protocol("RainDance"), Some(Weather::Rain));
        assert_eq!(Weather::from_protocol("Sandstorm"), Some(Weather::Sand));
        assert_eq!(Weather::from_protocol("Snow"), Some(Weather::Snow));
        assert_eq!(
            Weather::from_protocol("DesolateLand"),
            Some(Weather::HarshSun)
        );
        assert_eq!(Weather::from_protocol("none"), None);
    }

    #[test]
    fn test_weather_rocks_and_setters() {
        assert_eq!(Weather::Rain.extension_item(), Some("damprock"));
        assert_eq!(Weather::Snow.extension_item(), Some("icyrock"));
        assert_eq!(Weather::StrongWinds.extension_item(), None);
        assert_eq!(Weather::Sand.setter_ability(), "sandstream");
        assert!(Weather::HeavyRain.is_primal());
        assert!(!Weather::Rain.is_primal());
    }

    #[test]
    fn test_terrain_from_protocol() {
        assert_eq!(
            Terrain::from_protocol("Electric Terrain"),
            Some(Terrain::Electric)
        );
        assert_eq!(
            Terrain::from_protocol("move: Grassy Terrain"),
            Some(Terrain::Grassy)
        );
        assert_eq!(Terrain::from_protocol("move: Trick Room"), None);
    }

    #[test]
    fn test_side_condition_from_protocol() {
        assert_eq!(
            SideCondition::from_protocol("Stealth Rock"),
            Some(SideCondition::StealthRock)
        );
        assert_eq!(
            SideCondition::from_protocol("move: Reflect"),
            Some(SideCondition::Reflect)
        );
        assert_eq!(
            SideCondition::from_protocol("move: Lunar Dance"),
            Some(SideCondition::HealingWish)
        );
        assert_eq!(SideCondition::from_protocol("move: Wish"), None);
        assert_eq!(SideCondition::from_protocol("Toxic Count"), None);
        assert_eq!(SideCondition::AuroraVeil.to_string(), "Aurora Veil");
    }

    #[test]
    fn test_side_condition_layers_and_kinds() {
        assert_eq!(SideCondition::Spikes.max_layers(), 3);
        assert_eq!(SideCondition::ToxicSpikes.max_layers(), 2);
        assert_eq!(SideCondition::StealthRock.max_layers(), 1);
        assert!(SideCondition::AuroraVeil.is_screen());
        assert!(SideCondition::StickyWeb.is_hazard());
        assert!(!SideCondition::Reflect.is_hazard());
    }

    #[test]
    fn test_side_condition_durations() {
        assert_eq!(SideCondition::LightScreen.base_duration(), Some(5));
        assert_eq!(SideCondition::Tailwind.base_duration(), Some(4));
        assert!(!SideCondition::Spikes.counts_down());
        assert!(!SideCondition::ToxicCount.counts_down());
    }
}
