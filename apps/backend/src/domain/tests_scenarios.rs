//! Worked examples of single rolls and short roll sequences.

use crate::domain::board::{Board, START_CELL, WIN_CELL};
use crate::domain::errors::RuleError;
use crate::domain::moves::apply_roll;
use crate::domain::state::TransitionKind;
use crate::domain::test_state_helpers::{at, dormant, play, roll, with_streak};

#[test]
fn six_from_dormant_enters_without_report() {
    let result = apply_roll(&Board::standard(), &dormant(), roll(6)).unwrap();
    assert_eq!(result.destination_cell, START_CELL);
    assert_eq!(result.previous_cell, WIN_CELL);
    assert_eq!(result.transition_kind, TransitionKind::Step);
    assert!(!result.is_finished);
    assert!(!result.needs_report);
}

#[test]
fn plain_step_requires_report() {
    let result = apply_roll(&Board::standard(), &at(15), roll(4)).unwrap();
    assert_eq!(result.destination_cell, 19);
    assert_eq!(result.previous_cell, 15);
    assert_eq!(result.transition_kind, TransitionKind::Step);
    assert!(result.needs_report);

    let next = result.apply_to(&at(15), Some("moved".into()));
    assert_eq!(next.position, 19);
    assert_eq!(next.previous_position, 15);
    assert_eq!(next.version, 1);
}

#[test]
fn third_six_returns_to_streak_start() {
    let state = with_streak(at(25), 2, 15);
    let result = apply_roll(&Board::standard(), &state, roll(6)).unwrap();
    assert_eq!(result.destination_cell, 15);
    assert_eq!(result.consecutive_sixes, 0);
    assert_eq!(result.transition_kind, TransitionKind::Snake);
}

#[test]
fn arrow_lifts_player() {
    let result = apply_roll(&Board::standard(), &at(1), roll(3)).unwrap();
    assert_eq!(result.destination_cell, 14);
    assert_eq!(result.transition_kind, TransitionKind::Arrow);
    assert!(result.needs_report);
}

#[test]
fn overshoot_leaves_player_in_place() {
    let result = apply_roll(&Board::standard(), &at(70), roll(6)).unwrap();
    assert_eq!(result.destination_cell, 70);
    assert_eq!(result.transition_kind, TransitionKind::Stop);
    assert!(!result.needs_report);
    // The refused six still counts toward the streak.
    assert_eq!(result.consecutive_sixes, 1);
    assert_eq!(result.position_before_streak, 70);
}

#[test]
fn exact_landing_on_win_cell_finishes() {
    let result = apply_roll(&Board::standard(), &at(66), roll(2)).unwrap();
    assert_eq!(result.destination_cell, WIN_CELL);
    assert_eq!(result.transition_kind, TransitionKind::Win);
    assert!(result.is_finished);
    assert!(!result.needs_report);
}

#[test]
fn pending_report_blocks_roll() {
    let mut state = at(20);
    state.needs_report = true;
    assert_eq!(
        apply_roll(&Board::standard(), &state, roll(3)),
        Err(RuleError::ReportPending)
    );
}

#[test]
fn corrupt_streak_is_refused() {
    let state = with_streak(at(20), 5, 10);
    assert!(matches!(
        apply_roll(&Board::standard(), &state, roll(2)),
        Err(RuleError::CorruptState(_))
    ));
}

#[test]
fn three_sixes_from_cell_one() {
    let (end, results) = play(at(1), &[6, 6, 6]);
    let kinds: Vec<_> = results.iter().map(|r| r.transition_kind).collect();
    assert_eq!(
        kinds,
        vec![TransitionKind::Step, TransitionKind::Step, TransitionKind::Snake]
    );
    assert_eq!(end.position, 1);
    assert_eq!(end.consecutive_sixes, 0);
}

#[test]
fn non_six_breaks_streak() {
    let (end, _) = play(at(1), &[6, 6, 2, 6]);
    // 1 -> 7 -> 13 -> 15 -> 21, streak restarted at 15
    assert_eq!(end.position, 21);
    assert_eq!(end.consecutive_sixes, 1);
    assert_eq!(end.position_before_streak, 15);
}

#[test]
fn full_game_back_to_dormant() {
    // enter on 6, arrows 10->23, 27->41, 46->62, then a six lands on the win cell
    let (end, results) = play(dormant(), &[6, 4, 4, 5, 6]);
    let cells: Vec<_> = results.iter().map(|r| r.destination_cell).collect();
    assert_eq!(cells, vec![6, 23, 41, 62, WIN_CELL]);
    assert_eq!(results.last().unwrap().transition_kind, TransitionKind::Win);
    assert!(end.is_dormant());

    // dormant again: anything but a six is a no-op
    let (still, _) = play(end.clone(), &[3]);
    assert_eq!(still.position, WIN_CELL);
    assert!(still.is_finished);
}
