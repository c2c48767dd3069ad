//! The eighteen types and the effectiveness chart

use scry_protocol::server::to_id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl Type {
    /// Chart order
    pub const ALL: [Type; 18] = [
        Type::Normal,
        Type::Fire,
        Type::Water,
        Type::Electric,
        Type::Grass,
        Type::Ice,
        Type::Fighting,
        Type::Poison,
        Type::Ground,
        Type::Flying,
        Type::Psychic,
        Type::Bug,
        Type::Rock,
        Type::Ghost,
        Type::Dragon,
        Type::Dark,
        Type::Steel,
        Type::Fairy,
    ];

    /// Multiplier of an attack of this type against one defending type
    pub fn effectiveness(self, defender: Type) -> f32 {
        TYPE_CHART[self as usize][defender as usize]
    }

    /// Multiplier against a full type list; an empty list is neutral
    pub fn effectiveness_against(self, defenders: &[Type]) -> f32 {
        defenders.iter().map(|&t| self.effectiveness(t)).product()
    }

    /// `???` and anything unrecognised yield `None`
    pub fn from_protocol(s: &str) -> Option<Self> {
        let id = to_id(s);
        Type::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(&id))
    }

    /// A `/`-separated list such as the `typechange` argument `???/Flying`
    pub fn parse_list(s: &str) -> Vec<Type> {
        s.split('/').filter_map(Type::from_protocol).collect()
    }

    /// Item id of the matching gem
    pub fn gem(self) -> String {
        format!("{}gem", self.as_str().to_ascii_lowercase())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Type::Normal => "Normal",
            Type::Fire => "Fire",
            Type::Water => "Water",
            Type::Electric => "Electric",
            Type::Grass => "Grass",
            Type::Ice => "Ice",
            Type::Fighting => "Fighting",
            Type::Poison => "Poison",
            Type::Ground => "Ground",
            Type::Flying => "Flying",
            Type::Psychic => "Psychic",
            Type::Bug => "Bug",
            Type::Rock => "Rock",
            Type::Ghost => "Ghost",
            Type::Dragon => "Dragon",
            Type::Dark => "Dark",
            Type::Steel => "Steel",
            Type::Fairy => "Fairy",
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// One row per attacking type, columns in `Type::ALL` order.
// `+` super effective, `-` resisted, `0` no effect, `.` neutral.
#[rustfmt::skip]
const CHART_ROWS: [&[u8; 18]; 18] = [
    //  NFWEGIFPGFPBRGDDSF
    b"............-0..-.", // Normal
    b".--.++.....+-.-.+.", // Fire
    b".+-.-...+...+.-...", // Water
    b"..+--...0+....-...", // Electric
    b".-+.-..-+-.-+.-.-.", // Grass
    b".--.+-..++....+.-.", // Ice
    b"+....+.-.---+0.++-", // Fighting
    b"....+..--...--..0+", // Poison
    b".+.+-..+.0.-+...+.", // Ground
    b"...-+.+....+-...-.", // Flying
    b"......++..-....0-.", // Psychic
    b".-..+.--.-+..-.+--", // Bug
    b".+...+-.-+.+....-.", // Rock
    b"0.........+..+.-..", // Ghost
    b"..............+.-0", // Dragon
    b"......-...+..+.-.-", // Dark
    b".---.+......+...-+", // Steel
    b".-....+-......++-.", // Fairy
];

const fn decode_chart() -> [[f32; 18]; 18] {
    let mut chart = [[1.0; 18]; 18];
    let mut attacker = 0;
    while attacker < 18 {
        let mut defender = 0;
        while defender < 18 {
            chart[attacker][defender] = match CHART_ROWS[attacker][defender] {
                b'+' => 2.0,
                b'-' => 0.5,
                b'0' => 0.0,
                _ => 1.0,
            };
            defender += 1;
        }
        attacker += 1;
    }
    chart
}

/// Effectiveness multipliers indexed `[attacker][defender]` in `Type::ALL` order
pub static TYPE_CHART: [[f32; 18]; 18] = decode_chart();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_effectiveness_immune() {
        assert_eq!(Type::Normal.effectiveness(Type::Ghost), 0.0);
        assert_eq!(Type::Electric.effectiveness(Type::Ground), 0.0);
        assert_eq!(Type::Psychic.effectiveness(Type::Dark), 0.0);
        assert_eq!(Type::Dragon.effectiveness(Type::Fairy), 0.0);
        assert_eq!(Type::Ground.effectiveness(Type::Flying), 0.0);
        assert_eq!(Type::Poison.effectiveness(Type::Steel), 0.0);
    }

    #[test]
    fn test_chart_spot_checks() {
        assert_eq!(Type::Water.effectiveness(Type::Fire), 2.0);
        assert_eq!(Type::Fire.effectiveness(Type::Water), 0.5);
        assert_eq!(Type::Fairy.effectiveness(Type::Dragon), 2.0);
        assert_eq!(Type::Steel.effectiveness(Type::Fairy), 2.0);
        assert_eq!(Type::Bug.effectiveness(Type::Dark), 2.0);
        assert_eq!(Type::Ice.effectiveness(Type::Ice), 0.5);
        assert_eq!(Type::Normal.effectiveness(Type::Normal), 1.0);
    }

    #[test]
    fn test_effectiveness_against_dual_types() {
        assert_eq!(
            Type::Fire.effectiveness_against(&[Type::Grass, Type::Steel]),
            4.0
        );
        assert_eq!(
            Type::Ground.effectiveness_against(&[Type::Flying, Type::Steel]),
            0.0
        );
        assert_eq!(Type::Fire.effectiveness_against(&[]), 1.0);
    }

    #[test]
    fn test_type_from_protocol() {
        assert_eq!(Type::from_protocol("Fire"), Some(Type::Fire));
        assert_eq!(Type::from_protocol("FIRE"), Some(Type::Fire));
        assert_eq!(Type::from_protocol("???"), None);
    }

    #[test]
    fn test_parse_list_skips_typeless() {
        assert_eq!(Type::parse_list("???/Flying"), vec![Type::Flying]);
        assert_eq!(
            Type::parse_list("Water/Ground"),
            vec![Type::Water, Type::Ground]
        );
    }

    #[test]
    fn test_gem_name() {
        assert_eq!(Type::Normal.gem(), "normalgem");
        assert_eq!(Type::Fighting.gem(), "fightinggem");
    }
}
