//! Builders for player states used across domain tests.

use crate::domain::board::{Board, WIN_CELL};
use crate::domain::moves::apply_roll;
use crate::domain::state::{MoveResult, PlayerId, PlayerState, RollValue};

pub fn pid() -> PlayerId {
    PlayerId::parse("test-player").expect("valid id")
}

pub fn dormant() -> PlayerState {
    PlayerState::awaiting_start(pid())
}

/// Active player on `cell` with no streak and no pending report.
pub fn at(cell: i32) -> PlayerState {
    PlayerState {
        position: cell,
        previous_position: cell,
        position_before_streak: cell,
        is_finished: false,
        ..dormant()
    }
}

pub fn with_streak(mut state: PlayerState, sixes: i32, before_streak: i32) -> PlayerState {
    state.consecutive_sixes = sixes;
    state.position_before_streak = before_streak;
    state
}

pub fn roll(value: i32) -> RollValue {
    RollValue::new(value).expect("test rolls are in range")
}

/// Apply a sequence of rolls, clearing the report gate between moves as a
/// submitted report would. Returns every intermediate result.
pub fn play(start: PlayerState, rolls: &[i32]) -> (PlayerState, Vec<MoveResult>) {
    let board = Board::standard();
    let mut state = start;
    let mut results = Vec::with_capacity(rolls.len());
    for &r in rolls {
        let result = apply_roll(&board, &state, roll(r)).expect("legal move");
        state = result.apply_to(&state, None);
        state.needs_report = false;
        results.push(result);
    }
    (state, results)
}

/// Whether any of the first two sixes from `cell` would finish the game,
/// which ends the streak before the penalty can apply.
pub fn streak_reaches_win(cell: i32) -> bool {
    let (_, results) = play(at(cell), &[6, 6]);
    results
        .iter()
        .any(|r| r.is_finished || r.destination_cell == WIN_CELL)
}
