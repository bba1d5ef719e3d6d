//! Property tests for roll application (pure domain, no DB).

use proptest::prelude::*;

use crate::domain::board::{Board, START_CELL, TOTAL_CELLS, WIN_CELL};
use crate::domain::moves::apply_roll;
use crate::domain::state::{PlayerState, TransitionKind};
use crate::domain::test_prelude;
use crate::domain::test_state_helpers::{at, dormant, play, roll, streak_reaches_win, with_streak};

/// Active cells a player can legally rest on.
fn active_cell() -> impl Strategy<Value = i32> {
    (1..=TOTAL_CELLS).prop_filter("win cell is only occupied when finished", |c| *c != WIN_CELL)
}

/// Active player with a consistent streak.
fn active_state() -> impl Strategy<Value = PlayerState> {
    (active_cell(), 0..=2i32, active_cell()).prop_map(|(cell, sixes, before)| {
        if sixes == 0 {
            at(cell)
        } else {
            with_streak(at(cell), sixes, before)
        }
    })
}

/// A resting cell near the end plus a roll that carries past the last cell.
fn overshooting_move() -> impl Strategy<Value = (i32, i32)> {
    ((WIN_CELL + 1)..=TOTAL_CELLS).prop_flat_map(|cell| (Just(cell), (TOTAL_CELLS - cell + 1)..=6))
}

/// Cells from which two sixes in a row never finish the game.
fn streak_safe_cell() -> impl Strategy<Value = i32> {
    let cells: Vec<i32> = (1..=TOTAL_CELLS)
        .filter(|&c| c != WIN_CELL && !streak_reaches_win(c))
        .collect();
    prop::sample::select(cells)
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: applying the same roll to the same state always yields the same result.
    #[test]
    fn prop_apply_roll_is_deterministic(state in active_state(), r in 1..=6i32) {
        let board = Board::standard();
        let a = apply_roll(&board, &state, roll(r));
        let b = apply_roll(&board, &state, roll(r));
        prop_assert_eq!(a, b);
    }

    /// Property: overshooting the last cell refuses the move.
    #[test]
    fn prop_overshoot_stops_in_place((cell, r) in overshooting_move()) {
        let result = apply_roll(&Board::standard(), &at(cell), roll(r)).unwrap();
        prop_assert_eq!(result.destination_cell, cell);
        prop_assert_eq!(result.transition_kind, TransitionKind::Stop);
        prop_assert!(!result.needs_report);
    }

    /// Property: a dormant player ignores anything but a six.
    #[test]
    fn prop_dormant_ignores_non_six(r in 1..=5i32) {
        let result = apply_roll(&Board::standard(), &dormant(), roll(r)).unwrap();
        prop_assert_eq!(result.destination_cell, WIN_CELL);
        prop_assert!(result.is_finished);
        prop_assert!(!result.needs_report);
        prop_assert_eq!(result.transition_kind, TransitionKind::Stop);
    }

    /// Property: three sixes in a row return the player to where the streak began.
    #[test]
    fn prop_three_sixes_roll_back(cell in streak_safe_cell()) {
        let (end, results) = play(at(cell), &[6, 6, 6]);
        prop_assert_eq!(end.position, cell);
        prop_assert_eq!(end.consecutive_sixes, 0);
        prop_assert_eq!(results[2].transition_kind, TransitionKind::Snake);
        prop_assert_eq!(results[0].consecutive_sixes, 1);
        prop_assert_eq!(results[1].consecutive_sixes, 2);
    }

    /// Property: a report is owed exactly when an active player actually moved.
    #[test]
    fn prop_report_gate_follows_movement(state in active_state(), r in 1..=6i32) {
        let result = apply_roll(&Board::standard(), &state, roll(r)).unwrap();
        let moved = result.destination_cell != state.position;
        prop_assert_eq!(result.needs_report, moved && !result.is_finished);
    }

    /// Property: no roll ever places a player outside the board.
    #[test]
    fn prop_destination_stays_on_board(state in active_state(), r in 1..=6i32) {
        let result = apply_roll(&Board::standard(), &state, roll(r)).unwrap();
        prop_assert!((1..=TOTAL_CELLS).contains(&result.destination_cell));
        prop_assert!((0..=2).contains(&result.consecutive_sixes));
    }
}

/// Every table entry, reached by an exact non-six roll, lands on its target.
#[test]
fn snake_and_arrow_tables_round_trip() {
    let board = Board::standard();
    let cases = board
        .snakes()
        .iter()
        .map(|&(from, to)| (from, to, TransitionKind::Snake))
        .chain(
            board
                .arrows()
                .iter()
                .map(|&(from, to)| (from, to, TransitionKind::Arrow)),
        );

    for (from, to, kind) in cases {
        // approach from up to five cells below so the roll is never a six
        let r = (from - 1).min(5);
        let origin = from - r;
        assert_ne!(origin, WIN_CELL);
        let result = apply_roll(&board, &at(origin), roll(r)).unwrap();
        assert_eq!(result.destination_cell, to, "{origin}+{r} -> {from}");
        assert_eq!(result.transition_kind, kind, "{origin}+{r} -> {from}");
        assert_eq!(result.is_finished, to == WIN_CELL);
    }
}

#[test]
fn six_from_dormant_restarts() {
    let result = apply_roll(&Board::standard(), &dormant(), roll(6)).unwrap();
    assert_eq!(result.destination_cell, START_CELL);
    assert!(!result.is_finished);
}
