//! Battle state tracking and hidden-information inference for Pokemon Showdown singles.
//!
//! `scry-battle` sits on top of `scry-protocol` (the wire format) and keeps a
//! [`Battle`] snapshot current from the server's line stream, as seen by one
//! player (the bot):
//!
//! ```text
//! scry-protocol (lines -> ServerMessage)
//!        │
//!        ▼
//! scry-battle
//!   tracking   dispatcher, per-event mutators, upkeep
//!   inference  deductions across a turn's lines (speed, items, illusion)
//!        │
//!        ▼
//! Battle snapshot -> decision-maker / search workers
//! ```
//!
//! Besides what the protocol states outright, the snapshot records what is
//! merely possible and what has been ruled out: speed bounds, impossible items
//! and abilities, inferred items, and which Pokemon a Zoroark was disguised as.
//!
//! # Main Types
//!
//! - [`TrackedBattle`] - entry point; feed it lines or whole frames
//! - [`Battle`] - the owned snapshot (`Clone + Send + Serialize`)
//! - [`PokemonState`], [`SideState`], [`FieldState`] - entity model
//! - [`TrackerConfig`] - perspective, generation, battle type, inference switch
//! - [`Dex`] - species and move metadata, [`builtin_dex`] or [`JsonDex`]
//! - [`GenerationPolicy`] - per-generation mechanics in one table
//!
//! # Example Usage
//!
//! ```ignore
//! use scry_battle::{TrackedBattle, TrackerConfig};
//!
//! let config = TrackerConfig {
//!     username: Some("scrybot".to_string()),
//!     ..Default::default()
//! };
//! let mut tracked = TrackedBattle::for_format("gen9randombattle", config)?;
//!
//! // One frame per server message
//! tracked.process_frame(frame)?;
//!
//! if let Some(opponent) = tracked.battle().opponent.active() {
//!     println!("{} holds {:?}", opponent.name(), opponent.item);
//! }
//!
//! // Hand an owned copy to a search worker
//! let snapshot = tracked.snapshot();
//! ```

pub mod config;
pub mod dex;
pub mod error;
pub mod inference;
pub mod policy;
pub mod query;
pub mod tracking;
pub mod types;

pub use config::{BattleType, TrackerConfig};
pub use dex::{Dex, JsonDex, MoveData, SpeciesData, builtin_dex};
pub use error::TrackerError;
pub use inference::DamageDealt;
pub use policy::GenerationPolicy;
pub use tracking::TrackedBattle;
pub use types::{
    Battle, FieldState, Item, KnownMove, PokemonIdentity, PokemonState, SideCondition, SideRole,
    SideState, SpeedRange, StatStages, Status, TYPE_CHART, Terrain, Type, Volatile, Weather,
};

// Re-export commonly used protocol types
pub use scry_protocol::server::{GameType, Player, Stat};
