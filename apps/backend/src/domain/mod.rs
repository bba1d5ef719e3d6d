//! Domain layer: pure game logic types and helpers.

pub mod board;
pub mod errors;
pub mod moves;
pub mod narrative;
pub mod state;
pub mod step;
pub mod streak;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod test_state_helpers;
#[cfg(test)]
mod tests_props_moves;
#[cfg(test)]
mod tests_scenarios;

// Re-exports for ergonomics
pub use board::{Board, MAX_ROLL, START_CELL, TOTAL_CELLS, WIN_CELL};
pub use errors::RuleError;
pub use moves::apply_roll;
pub use narrative::{NarrativeGenerator, PlainNarrator};
pub use state::{MoveResult, NarrativeContext, PlayerId, PlayerState, RollValue, TransitionKind};
pub use step::{resolve_step, StepOutcome};
pub use streak::{track_consecutive_sixes, StreakOutcome, STREAK_LIMIT};
