//! Narrative seam. The text is advisory and lands in `PlayerState::message`;
//! rule code never reads it back.

use crate::domain::board::START_CELL;
use crate::domain::state::{NarrativeContext, TransitionKind};

/// Produces the human-readable line describing a move.
pub trait NarrativeGenerator: Send + Sync {
    fn narrate(&self, ctx: &NarrativeContext) -> String;
}

/// Minimal built-in narrator used when no richer generator is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainNarrator;

impl NarrativeGenerator for PlainNarrator {
    fn narrate(&self, ctx: &NarrativeContext) -> String {
        let NarrativeContext {
            current_cell: to,
            previous_cell: from,
            roll,
            ..
        } = *ctx;

        match ctx.transition_kind {
            TransitionKind::Stop if ctx.is_finished => {
                format!("Rolled {roll}. Only a six opens the way back onto the board.")
            }
            TransitionKind::Stop => {
                format!("Rolled {roll}. The move would leave the board; staying on {from}.")
            }
            TransitionKind::Win => format!("Rolled {roll} and reached cell {to}. The game is complete."),
            TransitionKind::Snake if ctx.consecutive_sixes == 0 && roll == 6 && to < from => {
                format!("Third six in a row. Returning from {from} to {to}.")
            }
            TransitionKind::Snake => format!("Rolled {roll}. A snake carries you from {from} down to {to}."),
            TransitionKind::Arrow if ctx.is_finished => {
                format!("Rolled {roll}. An arrow lifts you straight to {to}. The game is complete.")
            }
            TransitionKind::Arrow => format!("Rolled {roll}. An arrow lifts you from {from} up to {to}."),
            TransitionKind::Step if to == START_CELL && from > to => {
                format!("Rolled a six. The journey begins on cell {to}.")
            }
            TransitionKind::Step => format!("Rolled {roll}. Moved from {from} to {to}."),
        }
    }
}
