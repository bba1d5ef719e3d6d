//! Three-sixes penalty bookkeeping.

use crate::domain::board::MAX_ROLL;
use crate::domain::state::TransitionKind;

/// Sixes in a row that trigger the rollback.
pub const STREAK_LIMIT: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakOutcome {
    pub consecutive_sixes: i32,
    pub candidate_cell: i32,
    pub position_before_streak: i32,
    /// Set when the streak penalty overrides normal resolution.
    pub forced_transition: Option<TransitionKind>,
}

/// Update the sixes streak for `roll` and compute the candidate cell.
///
/// The first six of a streak snapshots `current_cell`; the third six sends the
/// player back to that snapshot and clears the streak.
pub fn track_consecutive_sixes(
    roll: i32,
    current_cell: i32,
    consecutive_sixes: i32,
    position_before_streak: i32,
) -> StreakOutcome {
    if roll != MAX_ROLL {
        return StreakOutcome {
            consecutive_sixes: 0,
            candidate_cell: current_cell + roll,
            position_before_streak,
            forced_transition: None,
        };
    }

    let count = consecutive_sixes + 1;
    if count == STREAK_LIMIT {
        return StreakOutcome {
            consecutive_sixes: 0,
            candidate_cell: position_before_streak,
            position_before_streak,
            forced_transition: Some(TransitionKind::Snake),
        };
    }

    let snapshot = if consecutive_sixes == 0 {
        current_cell
    } else {
        position_before_streak
    };

    StreakOutcome {
        consecutive_sixes: count,
        candidate_cell: current_cell + roll,
        position_before_streak: snapshot,
        forced_transition: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_six_clears_streak_and_keeps_snapshot() {
        let out = track_consecutive_sixes(4, 20, 2, 9);
        assert_eq!(
            out,
            StreakOutcome {
                consecutive_sixes: 0,
                candidate_cell: 24,
                position_before_streak: 9,
                forced_transition: None,
            }
        );
    }

    #[test]
    fn first_six_snapshots_current_cell() {
        let out = track_consecutive_sixes(6, 15, 0, 68);
        assert_eq!(out.consecutive_sixes, 1);
        assert_eq!(out.candidate_cell, 21);
        assert_eq!(out.position_before_streak, 15);
        assert_eq!(out.forced_transition, None);
    }

    #[test]
    fn second_six_carries_snapshot() {
        let out = track_consecutive_sixes(6, 21, 1, 15);
        assert_eq!(out.consecutive_sixes, 2);
        assert_eq!(out.candidate_cell, 27);
        assert_eq!(out.position_before_streak, 15);
    }

    #[test]
    fn third_six_rolls_back() {
        let out = track_consecutive_sixes(6, 25, 2, 15);
        assert_eq!(
            out,
            StreakOutcome {
                consecutive_sixes: 0,
                candidate_cell: 15,
                position_before_streak: 15,
                forced_transition: Some(TransitionKind::Snake),
            }
        );
    }
}
