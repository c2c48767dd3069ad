//! Type matchups against what is known about a Pokemon

use crate::dex::Dex;
use crate::types::{PokemonState, Type};

/// How a set of defending types fares against every attacking type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeMatchup {
    /// Super-effective types with their multiplier (2.0 or 4.0)
    pub weaknesses: Vec<(Type, f32)>,
    pub resistances: Vec<Type>,
    pub immunities: Vec<Type>,
}

impl TypeMatchup {
    pub fn of(defender: &[Type]) -> Self {
        let mut matchup = Self::default();
        for attacking in Type::ALL {
            let multiplier = attacking.effectiveness_against(defender);
            if multiplier == 0.0 {
                matchup.immunities.push(attacking);
            } else if multiplier < 1.0 {
                matchup.resistances.push(attacking);
            } else if multiplier > 1.0 {
                matchup.weaknesses.push((attacking, multiplier));
            }
        }
        matchup
    }

    pub fn is_weak_to(&self, attacking: Type) -> bool {
        self.weaknesses.iter().any(|(t, _)| *t == attacking)
    }
}

/// Multiplier of an attacking type against the Pokemon, terastallization included
pub fn effectiveness(attacking: Type, defender: &PokemonState) -> f32 {
    attacking.effectiveness_against(&defender.effective_types())
}

/// Multiplier of a move against the Pokemon; `None` for status or unknown moves
pub fn move_effectiveness(dex: &dyn Dex, move_id: &str, defender: &PokemonState) -> Option<f32> {
    let data = dex.move_data(move_id)?;
    if !data.is_damaging() {
        return None;
    }
    Some(effectiveness(data.move_type, defender))
}

/// The attacker's best multiplier against the defender among its known moves
pub fn best_known_move(
    dex: &dyn Dex,
    attacker: &PokemonState,
    defender: &PokemonState,
) -> Option<(String, f32)> {
    attacker
        .moves
        .iter()
        .filter_map(|known| {
            move_effectiveness(dex, &known.id, defender).map(|m| (known.id.clone(), m))
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
}

/// Whether every type the attacker has shown is resisted or ignored by the defender
pub fn walls(defender: &PokemonState, attacking: &[Type]) -> bool {
    !attacking.is_empty() && attacking.iter().all(|t| effectiveness(*t, defender) < 1.0)
}
