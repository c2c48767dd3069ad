//! Status conditions (volatile and non-volatile)

use scry_protocol::server::{Effect, Stat};
use serde::{Deserialize, Serialize};

/// Non-volatile status conditions (persist through switching)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Burn,
    Freeze,
    Paralysis,
    Poison,
    BadPoison, // Toxic
    Sleep,
}

impl Status {
    /// Parse from protocol string ("brn", "frz", "par", "psn", "tox", "slp")
    pub fn from_protocol(s: &str) -> Option<Self> {
        match s {
            "brn" => Some(Status::Burn),
            "frz" => Some(Status::Freeze),
            "par" => Some(Status::Paralysis),
            "psn" => Some(Status::Poison),
            "tox" => Some(Status::BadPoison),
            "slp" => Some(Status::Sleep),
            _ => None,
        }
    }

    /// Convert to protocol format
    pub fn to_protocol(&self) -> &'static str {
        match self {
            Status::Burn => "brn",
            Status::Freeze => "frz",
            Status::Paralysis => "par",
            Status::Poison => "psn",
            Status::BadPoison => "tox",
            Status::Sleep => "slp",
        }
    }

    pub fn is_poison(&self) -> bool {
        matches!(self, Status::Poison | Status::BadPoison)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_protocol())
    }
}

/// Volatile status conditions (cleared on switching)
///
/// Two-turn moves and anything without a dedicated variant are kept as
/// `Other(id)`, so a `-prepare` volatile and the later move line normalize
/// to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Volatile {
    // Movement restriction
    Trapped,          // Mean Look, Spider Web, Block
    PartiallyTrapped, // Bind, Wrap, Fire Spin, etc.

    // Mental effects
    Confusion,
    Taunt,
    Encore,
    Disable,
    Torment,
    Attract,

    // Damage over time / healing
    FocusEnergy,
    LeechSeed,
    Curse,
    PerishSong,
    AquaRing,
    Ingrain,

    // Protection
    Protect,
    Endure,
    Substitute,

    // Turn-based states
    Yawn,
    MustRecharge,
    LockedMove, // Outrage, Petal Dance, etc.
    Uproar,

    // Grounding
    MagnetRise,
    SmackDown,
    Roost,

    // Ability-related
    FlashFire,
    SlowStart,
    Truant,
    Unburden,
    GastroAcid,
    /// Protosynthesis / Quark Drive boosting one stat
    ParadoxBoost(Stat),

    Transform,
    TypeChange,
    Dynamax,
    DestinyBond,
    Stockpile,

    // Gen 1 stat nullification after a boost under burn/paralysis
    Gen1BurnNullify,
    Gen1ParalysisNullify,

    // Gen 8+
    Octolock,
    TarShot,
    NoRetreat,
    SaltCure,
    Syrupy,

    /// Any other volatile, by id
    Other(String),
}

impl Volatile {
    /// Parse from protocol string ("move: Taunt", "Substitute", "protosynthesisspe", ...)
    pub fn from_protocol(s: &str) -> Self {
        Self::from_id(&Effect::parse(s).id())
    }

    /// Parse from an already-normalized id
    pub fn from_id(id: &str) -> Self {
        match id {
            "trapped" | "meanlook" | "spiderweb" | "block" => Volatile::Trapped,
            "partiallytrapped" | "bind" | "wrap" | "firespin" | "clamp" | "whirlpool"
            | "sandtomb" | "magmastorm" | "infestation" | "snaptrap" | "thundercage" => {
                Volatile::PartiallyTrapped
            }

            "confusion" | "confused" => Volatile::Confusion,
            "taunt" => Volatile::Taunt,
            "encore" => Volatile::Encore,
            "disable" => Volatile::Disable,
            "torment" => Volatile::Torment,
            "attract" | "infatuation" => Volatile::Attract,

            "focusenergy" => Volatile::FocusEnergy,
            "leechseed" => Volatile::LeechSeed,
            "curse" => Volatile::Curse,
            "perishsong" | "perish3" | "perish2" | "perish1" | "perish0" => Volatile::PerishSong,
            "aquaring" => Volatile::AquaRing,
            "ingrain" => Volatile::Ingrain,

            "protect" | "detect" | "kingsshield" | "spikyshield" | "banefulbunker"
            | "obstruct" | "silktrap" | "burningbulwark" | "maxguard" => Volatile::Protect,
            "endure" => Volatile::Endure,
            "substitute" => Volatile::Substitute,

            "yawn" => Volatile::Yawn,
            "mustrecharge" | "recharge" => Volatile::MustRecharge,
            "lockedmove" | "thrash" | "outrage" | "petaldance" | "ragingfury" => {
                Volatile::LockedMove
            }
            "uproar" => Volatile::Uproar,

            "magnetrise" => Volatile::MagnetRise,
            "smackdown" => Volatile::SmackDown,
            "roost" => Volatile::Roost,

            "flashfire" => Volatile::FlashFire,
            "slowstart" => Volatile::SlowStart,
            "truant" => Volatile::Truant,
            "unburden" => Volatile::Unburden,
            "gastroacid" => Volatile::GastroAcid,

            "transform" | "transformed" => Volatile::Transform,
            "typechange" => Volatile::TypeChange,
            "dynamax" | "dynamaxed" => Volatile::Dynamax,
            "destinybond" => Volatile::DestinyBond,
            "stockpile" | "stockpile1" | "stockpile2" | "stockpile3" => Volatile::Stockpile,

            "gen1burnnullify" => Volatile::Gen1BurnNullify,
            "gen1paralysisnullify" => Volatile::Gen1ParalysisNullify,

            "octolock" => Volatile::Octolock,
            "tarshot" => Volatile::TarShot,
            "noretreat" => Volatile::NoRetreat,
            "saltcure" => Volatile::SaltCure,
            "syrupy" | "syrupbomb" => Volatile::Syrupy,

            other => {
                let paradox = other
                    .strip_prefix("protosynthesis")
                    .or_else(|| other.strip_prefix("quarkdrive"));
                match paradox.and_then(Stat::parse) {
                    Some(stat) => Volatile::ParadoxBoost(stat),
                    None => Volatile::Other(other.to_string()),
                }
            }
        }
    }

    /// Check if this is a known volatile (not Other)
    pub fn is_known(&self) -> bool {
        !matches!(self, Volatile::Other(_))
    }

    /// Passed along by Baton Pass
    pub fn is_baton_passable(&self) -> bool {
        matches!(
            self,
            Volatile::Substitute
                | Volatile::Confusion
                | Volatile::FocusEnergy
                | Volatile::LeechSeed
                | Volatile::Curse
                | Volatile::PerishSong
                | Volatile::AquaRing
                | Volatile::Ingrain
                | Volatile::MagnetRise
                | Volatile::GastroAcid
        )
    }

    /// Normalized id
    pub fn id(&self) -> String {
        let id = match self {
            Volatile::Trapped => "trapped",
            Volatile::PartiallyTrapped => "partiallytrapped",
            Volatile::Confusion => "confusion",
            Volatile::Taunt => "taunt",
            Volatile::Encore => "encore",
            Volatile::Disable => "disable",
            Volatile::Torment => "torment",
            Volatile::Attract => "attract",
            Volatile::FocusEnergy => "focusenergy",
            Volatile::LeechSeed => "leechseed",
            Volatile::Curse => "curse",
            Volatile::PerishSong => "perishsong",
            Volatile::AquaRing => "aquaring",
            Volatile::Ingrain => "ingrain",
            Volatile::Protect => "protect",
            Volatile::Endure => "endure",
            Volatile::Substitute => "substitute",
            Volatile::Yawn => "yawn",
            Volatile::MustRecharge => "mustrecharge",
            Volatile::LockedMove => "lockedmove",
            Volatile::Uproar => "uproar",
            Volatile::MagnetRise => "magnetrise",
            Volatile::SmackDown => "smackdown",
            Volatile::Roost => "roost",
            Volatile::FlashFire => "flashfire",
            Volatile::SlowStart => "slowstart",
            Volatile::Truant => "truant",
            Volatile::Unburden => "unburden",
            Volatile::GastroAcid => "gastroacid",
            Volatile::ParadoxBoost(stat) => return format!("paradox{}", stat.as_str()),
            Volatile::Transform => "transform",
            Volatile::TypeChange => "typechange",
            Volatile::Dynamax => "dynamax",
            Volatile::DestinyBond => "destinybond",
            Volatile::Stockpile => "stockpile",
            Volatile::Gen1BurnNullify => "gen1burnnullify",
            Volatile::Gen1ParalysisNullify => "gen1paralysisnullify",
            Volatile::Octolock => "octolock",
            Volatile::TarShot => "tarshot",
            Volatile::NoRetreat => "noretreat",
            Volatile::SaltCure => "saltcure",
            Volatile::Syrupy => "syrupy",
            Volatile::Other(s) => s.as_str(),
        };
        id.to_string()
    }
}

impl std::fmt::Display for Volatile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}
