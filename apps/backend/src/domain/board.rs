//! Board topology: cell bounds and the snake/arrow tables.
//!
//! Pure data. The resolver only ever asks "where does this cell send you?",
//! so swapping the tables never requires touching rule code.

use crate::domain::errors::RuleError;

pub const TOTAL_CELLS: i32 = 72;
pub const WIN_CELL: i32 = 68;
pub const START_CELL: i32 = 6;
pub const MAX_ROLL: i32 = 6;

/// Landing on the first cell sends the player forward to the second.
const ARROWS: &[(i32, i32)] = &[
    (4, 14),
    (10, 23),
    (17, 69),
    (20, 32),
    (22, 60),
    (27, 41),
    (28, 50),
    (37, 66),
    (45, 67),
    (46, 62),
    (54, 68),
];

/// Landing on the first cell sends the player back to the second.
const SNAKES: &[(i32, i32)] = &[
    (12, 8),
    (16, 4),
    (24, 7),
    (29, 6),
    (44, 9),
    (52, 35),
    (55, 3),
    (61, 13),
    (63, 2),
    (72, 51),
];

/// A board layout. Tables are sorted by source cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    snakes: &'static [(i32, i32)],
    arrows: &'static [(i32, i32)],
}

impl Board {
    /// The canonical 72-cell layout.
    pub const fn standard() -> Self {
        Self {
            snakes: SNAKES,
            arrows: ARROWS,
        }
    }

    /// Build a board from custom tables (tests, alternative layouts).
    pub const fn with_tables(snakes: &'static [(i32, i32)], arrows: &'static [(i32, i32)]) -> Self {
        Self { snakes, arrows }
    }

    pub fn snake_target(&self, cell: i32) -> Option<i32> {
        lookup(self.snakes, cell)
    }

    pub fn arrow_target(&self, cell: i32) -> Option<i32> {
        lookup(self.arrows, cell)
    }

    pub fn snakes(&self) -> &'static [(i32, i32)] {
        self.snakes
    }

    pub fn arrows(&self) -> &'static [(i32, i32)] {
        self.arrows
    }

    /// Check the structural rules of the tables.
    ///
    /// Snakes must go down and arrows up, every endpoint must be on the
    /// board, a cell can carry at most one rule, and the win cell carries none.
    pub fn validate(&self) -> Result<(), RuleError> {
        let on_board = |c: i32| (1..=TOTAL_CELLS).contains(&c);
        let invalid = |detail: String| Err(RuleError::InvalidBoard(detail));

        for &(from, to) in self.snakes {
            if !on_board(from) || !on_board(to) {
                return invalid(format!("snake {from}->{to} leaves the board"));
            }
            if to >= from {
                return invalid(format!("snake {from}->{to} does not descend"));
            }
        }
        for &(from, to) in self.arrows {
            if !on_board(from) || !on_board(to) {
                return invalid(format!("arrow {from}->{to} leaves the board"));
            }
            if to <= from {
                return invalid(format!("arrow {from}->{to} does not ascend"));
            }
            if self.snake_target(from).is_some() {
                return invalid(format!("cell {from} is both a snake and an arrow"));
            }
        }
        if self.snake_target(WIN_CELL).is_some() || self.arrow_target(WIN_CELL).is_some() {
            return invalid(format!("win cell {WIN_CELL} must not carry a rule"));
        }
        if !self.snakes.windows(2).all(|w| w[0].0 < w[1].0)
            || !self.arrows.windows(2).all(|w| w[0].0 < w[1].0)
        {
            return invalid("tables must be sorted by source cell without duplicates".to_string());
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

fn lookup(table: &[(i32, i32)], cell: i32) -> Option<i32> {
    table
        .binary_search_by_key(&cell, |&(from, _)| from)
        .ok()
        .map(|idx| table[idx].1)
}
