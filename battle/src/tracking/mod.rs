//! Battle state tracking from server messages

mod battle;
mod effects;
mod field;
mod moves;
mod request;
mod switching;
mod updater;
mod upkeep;


pub use battle::TrackedBattle;
pub(crate) use switching::{is_zoroark_family, new_pokemon};
