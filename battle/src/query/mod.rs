//! Read-only questions a decision-maker asks of the tracked state

mod matchup;

pub use matchup::{TypeMatchup, best_known_move, effectiveness, move_effectiveness, walls};
