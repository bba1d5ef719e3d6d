//! Step resolution: where a candidate cell actually leaves the player.

use crate::domain::board::{Board, MAX_ROLL, START_CELL, TOTAL_CELLS, WIN_CELL};
use crate::domain::state::TransitionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub final_cell: i32,
    pub transition_kind: TransitionKind,
    pub is_game_finished: bool,
}

impl StepOutcome {
    const fn new(final_cell: i32, transition_kind: TransitionKind, is_game_finished: bool) -> Self {
        Self {
            final_cell,
            transition_kind,
            is_game_finished,
        }
    }
}

/// Resolve a candidate cell against the board. Rules are checked in order and
/// the first match wins:
///
/// 1. start gate (dormant on the win cell; only a six re-enters)
/// 2. exact landing on the win cell
/// 3. overshooting the board (the move is refused)
/// 4. snake
/// 5. arrow
/// 6. plain step
pub fn resolve_step(
    board: &Board,
    candidate_cell: i32,
    is_finished: bool,
    roll: i32,
    current_cell: i32,
) -> StepOutcome {
    if current_cell == WIN_CELL && is_finished {
        return if roll == MAX_ROLL {
            StepOutcome::new(START_CELL, TransitionKind::Step, false)
        } else {
            StepOutcome::new(WIN_CELL, TransitionKind::Stop, true)
        };
    }

    if candidate_cell == WIN_CELL {
        return StepOutcome::new(WIN_CELL, TransitionKind::Win, true);
    }

    if candidate_cell > TOTAL_CELLS {
        return StepOutcome::new(current_cell, TransitionKind::Stop, false);
    }

    if let Some(target) = board.snake_target(candidate_cell) {
        return StepOutcome::new(target, TransitionKind::Snake, target == WIN_CELL);
    }

    if let Some(target) = board.arrow_target(candidate_cell) {
        return StepOutcome::new(target, TransitionKind::Arrow, target == WIN_CELL);
    }

    StepOutcome::new(candidate_cell, TransitionKind::Step, false)
}
