//! Stat stages, computed stats and stat formulas

use scry_protocol::server::Stat;
use serde::{Deserialize, Serialize};

/// Stat stages (-6 to +6)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatStages {
    pub atk: i8,
    pub def: i8,
    pub spa: i8,
    pub spd: i8,
    pub spe: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatStages {
    /// Create new stat stages (all at 0)
    pub fn new() -> Self {
        Self::default()
    }

    /// Get stage for a stat
    pub fn get(&self, stat: Stat) -> i8 {
        match stat {
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
            Stat::Accuracy => self.accuracy,
            Stat::Evasion => self.evasion,
        }
    }

    fn slot(&mut self, stat: Stat) -> &mut i8 {
        match stat {
            Stat::Atk => &mut self.atk,
            Stat::Def => &mut self.def,
            Stat::Spa => &mut self.spa,
            Stat::Spd => &mut self.spd,
            Stat::Spe => &mut self.spe,
            Stat::Accuracy => &mut self.accuracy,
            Stat::Evasion => &mut self.evasion,
        }
    }

    fn slots(&mut self) -> [&mut i8; 7] {
        [
            &mut self.atk,
            &mut self.def,
            &mut self.spa,
            &mut self.spd,
            &mut self.spe,
            &mut self.accuracy,
            &mut self.evasion,
        ]
    }

    /// Set stage for a stat (clamped to -6..+6)
    pub fn set(&mut self, stat: Stat, value: i8) {
        *self.slot(stat) = value.clamp(-6, 6);
    }

    /// Apply a boost to a stat, returns actual change applied
    pub fn boost(&mut self, stat: Stat, amount: i8) -> i8 {
        let current = self.get(stat);
        let new_value = current.saturating_add(amount).clamp(-6, 6);
        self.set(stat, new_value);
        new_value - current
    }

    /// Apply an unboost (negative boost) to a stat, returns actual change applied
    pub fn unboost(&mut self, stat: Stat, amount: i8) -> i8 {
        self.boost(stat, amount.saturating_neg())
    }

    /// Reset all stages to 0
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Reset only positive stages to 0
    pub fn clear_positive(&mut self) {
        for stage in self.slots() {
            *stage = (*stage).min(0);
        }
    }

    /// Reset only negative stages to 0
    pub fn clear_negative(&mut self) {
        for stage in self.slots() {
            *stage = (*stage).max(0);
        }
    }

    /// Invert all stages (Topsy-Turvy)
    pub fn invert(&mut self) {
        for stage in self.slots() {
            *stage = -*stage;
        }
    }

    /// Copy boosts from another StatStages (Psych Up, Transform)
    pub fn copy_from(&mut self, other: &StatStages) {
        *self = other.clone();
    }

    /// Get the multiplier for a stat stage (for atk/def/spa/spd/spe)
    /// +1 = 1.5x, +2 = 2x, ..., +6 = 4x
    /// -1 = 0.67x, -2 = 0.5x, ..., -6 = 0.25x
    pub fn multiplier(stage: i8) -> f64 {
        let stage = stage.clamp(-6, 6);
        if stage >= 0 {
            (2 + stage as i32) as f64 / 2.0
        } else {
            2.0 / (2 - stage as i32) as f64
        }
    }

    /// Check if all stats are at 0
    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }
}

/// Base stats as listed in the pokedex
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

/// Computed (in-battle) stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

/// EV/IV/nature assumptions used when a stat has to be estimated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatSpread {
    pub iv: u32,
    pub ev: u32,
    pub nature: f64,
}

impl StatSpread {
    /// The fixed spread random battles hand out (85 EVs, 31 IVs, neutral nature)
    pub const RANDOM_BATTLE: StatSpread = StatSpread {
        iv: 31,
        ev: 85,
        nature: 1.0,
    };

    /// Full investment with a boosting nature
    pub const MAX: StatSpread = StatSpread {
        iv: 31,
        ev: 252,
        nature: 1.1,
    };

    /// No investment with a hindering nature
    pub const MIN: StatSpread = StatSpread {
        iv: 31,
        ev: 0,
        nature: 0.9,
    };
}

/// Non-HP stat formula
pub fn calculate_stat(base: u32, level: u8, spread: StatSpread) -> u32 {
    let level = level as u32;
    let raw = (2 * base + spread.iv + spread.ev / 4) * level / 100 + 5;
    (raw as f64 * spread.nature).floor() as u32
}

/// HP formula (Shedinja-style 1 HP species aside)
pub fn calculate_hp(base: u32, level: u8, spread: StatSpread) -> u32 {
    if base == 1 {
        return 1;
    }
    let level = level as u32;
    (2 * base + spread.iv + spread.ev / 4) * level / 100 + level + 10
}

impl BattleStats {
    /// Estimate every stat from base stats with a single spread
    pub fn estimate(base: &BaseStats, level: u8, spread: StatSpread) -> Self {
        Self {
            hp: calculate_hp(base.hp, level, spread),
            atk: calculate_stat(base.atk, level, spread),
            def: calculate_stat(base.def, level, spread),
            spa: calculate_stat(base.spa, level, spread),
            spd: calculate_stat(base.spd, level, spread),
            spe: calculate_stat(base.spe, level, spread),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stages_are_zero() {
        let stages = StatStages::new();
        assert_eq!(stages.atk, 0);
        assert_eq!(stages.spe, 0);
        assert!(stages.is_clear());
    }

    #[test]
    fn test_set_clamps_to_bounds() {
        let mut stages = StatStages::new();
        stages.set(Stat::Atk, 10);
        assert_eq!(stages.atk, 6);

        stages.set(Stat::Def, -10);
        assert_eq!(stages.def, -6);
    }

    #[test]
    fn test_boost() {
        let mut stages = StatStages::new();

        let change = stages.boost(Stat::Atk, 2);
        assert_eq!(change, 2);
        assert_eq!(stages.atk, 2);

        // Boost that hits cap
        stages.atk = 5;
        let change = stages.boost(Stat::Atk, 3);
        assert_eq!(change, 1);
        assert_eq!(stages.atk, 6);

        let change = stages.boost(Stat::Atk, 1);
        assert_eq!(change, 0);
    }

    #[test]
    fn test_unboost() {
        let mut stages = StatStages::new();
        stages.def = -5;
        let change = stages.unboost(Stat::Def, 3);
        assert_eq!(change, -1);
        assert_eq!(stages.def, -6);
    }

    #[test]
    fn test_clear_positive_and_negative() {
        let mut stages = StatStages {
            atk: 3,
            def: -2,
            spa: 1,
            spd: -1,
            ..Default::default()
        };

        let mut positive = stages.clone();
        positive.clear_positive();
        assert_eq!((positive.atk, positive.def), (0, -2));

        stages.clear_negative();
        assert_eq!((stages.atk, stages.def, stages.spd), (3, 0, 0));
    }

    #[test]
    fn test_invert() {
        let mut stages = StatStages {
            atk: 3,
            spe: -6,
            ..Default::default()
        };

        stages.invert();
        assert_eq!(stages.atk, -3);
        assert_eq!(stages.spe, 6);
    }

    #[test]
    fn test_stat_multiplier() {
        assert!((StatStages::multiplier(0) - 1.0).abs() < 0.001);
        assert!((StatStages::multiplier(1) - 1.5).abs() < 0.001);
        assert!((StatStages::multiplier(6) - 4.0).abs() < 0.001);
        assert!((StatStages::multiplier(-1) - 2.0 / 3.0).abs() < 0.001);
        assert!((StatStages::multiplier(-6) - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_max_speed_formula() {
        // Caterpie, base 45 speed, level 100
        assert_eq!(calculate_stat(45, 100, StatSpread::MAX), 207);
        assert_eq!(calculate_stat(45, 100, StatSpread::MIN), 113);
    }

    #[test]
    fn test_random_battle_spread() {
        // Floette-Eternal, base 92 speed, level 80
        assert_eq!(calculate_stat(92, 80, StatSpread::RANDOM_BATTLE), 193);
    }

    #[test]
    fn test_hp_formula() {
        assert_eq!(calculate_hp(45, 100, StatSpread::RANDOM_BATTLE), 252);
        assert_eq!(calculate_hp(1, 100, StatSpread::MAX), 1);
    }
}
