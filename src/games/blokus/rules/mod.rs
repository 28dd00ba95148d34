//! Game rules for Blokus-style placement.
//!
//! This module contains pure functions for evaluating placements against a
//! board. Rules are separated from state storage so the turn controller,
//! the contracts and the AI search all share one implementation.

pub mod mobility;
pub mod placement;
pub mod scoring;

use super::geometry::BoardPosition;

pub use mobility::{anchor_cells, count_legal_placements, has_legal_placement, legal_placements};
pub use placement::{
    CellsEmpty, CornerAnchored, LegalPlacement, NoEdgeContact, WithinBounds, commit_placement,
    validate_placement,
};
pub use scoring::{ScoringRule, winner_by_penalty};

/// How a seat's next placement must connect to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opening {
    /// The seat has not placed yet: the piece must cover this cell.
    FirstPlacement {
        /// The seat's designated starting corner.
        start_corner: BoardPosition,
    },
    /// The piece must touch an own piece at a corner.
    Continuation,
}

/// The designated starting corner of `seat`.
///
/// Two seats start in opposite corners (top-left, bottom-right); three or
/// four seats go clockwise from the top-left.
pub fn start_corner(board_size: usize, seat_count: usize, seat: usize) -> BoardPosition {
    let last = board_size as i32 - 1;
    let corners = if seat_count == 2 {
        [
            BoardPosition::new(0, 0),
            BoardPosition::new(last, last),
            BoardPosition::new(0, last),
            BoardPosition::new(last, 0),
        ]
    } else {
        [
            BoardPosition::new(0, 0),
            BoardPosition::new(0, last),
            BoardPosition::new(last, last),
            BoardPosition::new(last, 0),
        ]
    };
    corners[seat % corners.len()]
}
