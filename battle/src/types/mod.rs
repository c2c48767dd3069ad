//! Entity model for battle state tracking

mod battle;
mod conditions;
mod field;
mod knowledge;
mod pokemon;
mod pokemon_type;
mod side;
mod stats;
mod status;

pub use battle::Battle;
pub use conditions::{SideCondition, Terrain, Weather};
pub use field::{FieldState, WeatherSource};
pub use knowledge::{CHOICE_ITEMS, ExclusionSet, Item, SpeedRange};
pub use pokemon::{KnownMove, PokemonIdentity, PokemonState, PreTransform};
pub use pokemon_type::{TYPE_CHART, Type};
pub use side::{LastUsedMove, SideRole, SideState};
pub use stats::{BaseStats, BattleStats, StatSpread, StatStages, calculate_hp, calculate_stat};
pub use status::{Status, Volatile};
