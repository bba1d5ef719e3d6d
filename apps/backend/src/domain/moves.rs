//! One roll, one state transition.
//!
//! `apply_roll` composes the streak tracker and the step resolver. It never
//! touches storage and never mutates its input: the caller persists the
//! returned `MoveResult` (see `MoveResult::apply_to`).

use crate::domain::board::{Board, WIN_CELL};
use crate::domain::errors::RuleError;
use crate::domain::state::{MoveResult, NarrativeContext, PlayerState, RollValue, TransitionKind};
use crate::domain::step::resolve_step;
use crate::domain::streak::track_consecutive_sixes;

pub fn apply_roll(
    board: &Board,
    state: &PlayerState,
    roll: RollValue,
) -> Result<MoveResult, RuleError> {
    state.check_invariants()?;

    // The runner gates on this before calling in; reaching here is a caller bug.
    if state.needs_report {
        return Err(RuleError::ReportPending);
    }

    let current = state.position;
    let roll = roll.get();

    if state.is_dormant() {
        let step = resolve_step(board, current + roll, true, roll, current);
        // Entering the board from the dormant state does not owe a report.
        return Ok(assemble(
            current,
            roll,
            step.final_cell,
            step.transition_kind,
            step.is_game_finished,
            0,
            state.position_before_streak,
            false,
        ));
    }

    let streak = track_consecutive_sixes(
        roll,
        current,
        state.consecutive_sixes,
        state.position_before_streak,
    );
    let step = resolve_step(board, streak.candidate_cell, state.is_finished, roll, current);

    let (final_cell, kind, finished) = match streak.forced_transition {
        Some(kind) => (
            streak.candidate_cell,
            kind,
            streak.candidate_cell == WIN_CELL,
        ),
        None => (step.final_cell, step.transition_kind, step.is_game_finished),
    };

    let needs_report = final_cell != current && !finished;

    Ok(assemble(
        current,
        roll,
        final_cell,
        kind,
        finished,
        streak.consecutive_sixes,
        streak.position_before_streak,
        needs_report,
    ))
}

#[allow(clippy::too_many_arguments)]
fn assemble(
    current: i32,
    roll: i32,
    final_cell: i32,
    transition_kind: TransitionKind,
    is_finished: bool,
    consecutive_sixes: i32,
    position_before_streak: i32,
    needs_report: bool,
) -> MoveResult {
    MoveResult {
        destination_cell: final_cell,
        previous_cell: current,
        transition_kind,
        consecutive_sixes,
        position_before_streak,
        is_finished,
        needs_report,
        narrative_context: NarrativeContext {
            current_cell: final_cell,
            previous_cell: current,
            roll,
            transition_kind,
            is_finished,
            consecutive_sixes,
        },
    }
}
