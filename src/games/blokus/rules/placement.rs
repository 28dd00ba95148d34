//! Placement validation and commit.
//!
//! Validation rules are evaluated in a fixed order so the reported
//! rejection is deterministic: bounds, occupancy, edge contact, then the
//! corner anchor (or the starting corner for a seat's first piece).

use super::super::action::{Move, MoveKind, Placement, Rejection};
use super::super::geometry::{
    BoardPosition, Shape, cells_occupied, first_edge_contact, touches_corner,
};
use super::super::pieces::Catalog;
use super::super::powerups::collect_powerups;
use super::super::state::GameState;
use super::super::types::Board;
use super::Opening;
use chrono::{DateTime, Utc};
use tracing::{debug, error, instrument};

/// Precondition: every covered cell lies on the board.
pub struct WithinBounds;

impl WithinBounds {
    /// Checks the footprint against the board edges.
    pub fn check(board: &Board, cells: &[BoardPosition]) -> Result<(), Rejection> {
        match cells.iter().find(|c| !board.contains(**c)) {
            Some(cell) => Err(Rejection::OutOfBounds(*cell)),
            None => Ok(()),
        }
    }
}

/// Precondition: every covered cell is currently empty.
pub struct CellsEmpty;

impl CellsEmpty {
    /// Checks the footprint for occupied or blocked cells.
    pub fn check(board: &Board, cells: &[BoardPosition]) -> Result<(), Rejection> {
        match cells.iter().find(|c| !board.is_empty_at(**c)) {
            Some(cell) => Err(Rejection::CellOccupied(*cell)),
            None => Ok(()),
        }
    }
}

/// Precondition: no covered cell shares a side with the seat's own cells.
pub struct NoEdgeContact;

impl NoEdgeContact {
    /// Checks same-seat edge adjacency.
    pub fn check(board: &Board, cells: &[BoardPosition], seat: usize) -> Result<(), Rejection> {
        match first_edge_contact(cells, board, seat) {
            Some(cell) => Err(Rejection::IllegalEdgeAdjacency(cell)),
            None => Ok(()),
        }
    }
}

/// Precondition: the piece connects diagonally, or covers the start corner.
pub struct CornerAnchored;

impl CornerAnchored {
    /// Checks the corner anchor for the given opening.
    pub fn check(
        board: &Board,
        cells: &[BoardPosition],
        seat: usize,
        opening: Opening,
    ) -> Result<(), Rejection> {
        match opening {
            Opening::FirstPlacement { start_corner } => {
                if cells.contains(&start_corner) {
                    Ok(())
                } else {
                    Err(Rejection::MissingStartCorner(start_corner))
                }
            }
            Opening::Continuation => {
                if touches_corner(cells, board, seat) {
                    Ok(())
                } else {
                    Err(Rejection::MissingCornerAnchor)
                }
            }
        }
    }
}

/// Composite precondition: all placement rules, in reporting order.
pub struct LegalPlacement;

impl LegalPlacement {
    /// Validates a concrete footprint.
    pub fn check(
        board: &Board,
        cells: &[BoardPosition],
        seat: usize,
        opening: Opening,
    ) -> Result<(), Rejection> {
        WithinBounds::check(board, cells)?;
        CellsEmpty::check(board, cells)?;
        NoEdgeContact::check(board, cells, seat)?;
        CornerAnchored::check(board, cells, seat, opening)?;
        Ok(())
    }
}

/// Validates placing `shape` with its origin at `origin` for `seat`.
#[instrument(level = "trace", skip(board, shape))]
pub fn validate_placement(
    board: &Board,
    shape: &Shape,
    origin: BoardPosition,
    seat: usize,
    opening: Opening,
) -> Result<(), Rejection> {
    let cells = cells_occupied(shape, origin);
    LegalPlacement::check(board, &cells, seat, opening)
}

/// Commits a validated placement for the current player.
///
/// Returns the next snapshot: cells owned, piece used, powerups collected,
/// move appended to both histories, stats updated and the turn advanced.
///
/// # Panics
///
/// Panics when the placement is not legal for the current player. Callers
/// must validate first; reaching this with an invalid placement means the
/// validation step was bypassed.
#[instrument(skip(state), fields(seat = state.current_player()))]
pub fn commit_placement(state: &GameState, placement: &Placement, at: DateTime<Utc>) -> GameState {
    let seat = state.current_player();
    let catalog = Catalog::standard();

    let Some(piece) = catalog.get(placement.piece) else {
        error!(piece = %placement.piece, "Commit of unknown piece");
        panic!("commit_placement: unknown piece {}", placement.piece);
    };
    if !state.seats()[seat].has_unused(placement.piece) {
        error!(piece = %placement.piece, seat, "Commit of unavailable piece");
        panic!("commit_placement: seat {seat} cannot place piece {}", placement.piece);
    }

    let cells = cells_occupied(&piece.oriented(placement.orientation), placement.origin);
    if let Err(rejection) = LegalPlacement::check(state.board(), &cells, seat, state.opening_for(seat)) {
        error!(%rejection, %placement, "Commit of unvalidated placement");
        panic!("commit_placement: placement was never validated: {rejection}");
    }

    let mut next = state.clone();
    let mut board = next.board().with_owned(&cells, seat, placement.piece);
    let collected = collect_powerups(&mut board, &cells);
    next.replace_board(board);

    let seat_state = next.seat_mut(seat);
    seat_state.mark_used(placement.piece);
    seat_state.add_score(cells.len());
    seat_state.grant_powerups(collected.iter().copied());
    if !collected.is_empty() {
        debug!(seat, count = collected.len(), "Powerups granted");
    }

    next.record(Move::new(seat, MoveKind::Place(*placement), at));
    next.advance_turn();
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::blokus::geometry::Orientation;
    use crate::games::blokus::pieces::PieceId;
    use crate::games::blokus::types::Occupant;

    fn domino() -> Shape {
        Shape::from_mask(&["##"])
    }

    fn board_with(owned: &[(i32, i32, usize)]) -> Board {
        let mut board = Board::new(6);
        for &(r, c, seat) in owned {
            board.set_occupant(
                BoardPosition::new(r, c),
                Occupant::Owned { seat, piece: PieceId::new(0) },
            );
        }
        board
    }

    #[test]
    fn test_first_placement_must_cover_corner() {
        let board = Board::new(6);
        let opening = Opening::FirstPlacement { start_corner: BoardPosition::new(0, 0) };
        assert!(validate_placement(&board, &domino(), BoardPosition::new(0, 0), 0, opening).is_ok());
        assert_eq!(
            validate_placement(&board, &domino(), BoardPosition::new(1, 1), 0, opening),
            Err(Rejection::MissingStartCorner(BoardPosition::new(0, 0)))
        );
    }

    #[test]
    fn test_out_of_bounds_reported_first() {
        let board = board_with(&[(0, 5, 1)]);
        // Off the right edge and overlapping: bounds wins.
        assert_eq!(
            validate_placement(&board, &domino(), BoardPosition::new(0, 5), 0, Opening::Continuation),
            Err(Rejection::OutOfBounds(BoardPosition::new(0, 6)))
        );
    }

    #[test]
    fn test_occupied_reported_before_adjacency() {
        let board = board_with(&[(2, 2, 1), (2, 1, 0)]);
        assert_eq!(
            validate_placement(&board, &domino(), BoardPosition::new(2, 2), 0, Opening::Continuation),
            Err(Rejection::CellOccupied(BoardPosition::new(2, 2)))
        );
    }

    #[test]
    fn test_same_seat_edge_contact_rejected() {
        let board = board_with(&[(0, 0, 0)]);
        assert_eq!(
            validate_placement(&board, &domino(), BoardPosition::new(0, 1), 0, Opening::Continuation),
            Err(Rejection::IllegalEdgeAdjacency(BoardPosition::new(0, 1)))
        );
        // Other seats may touch along edges.
        assert!(
            validate_placement(&board, &domino(), BoardPosition::new(0, 1), 1, Opening::Continuation)
                .is_err_and(|r| r == Rejection::MissingCornerAnchor)
        );
    }

    #[test]
    fn test_corner_anchor_required() {
        let board = board_with(&[(0, 0, 0)]);
        assert!(validate_placement(&board, &domino(), BoardPosition::new(1, 1), 0, Opening::Continuation).is_ok());
        assert_eq!(
            validate_placement(&board, &domino(), BoardPosition::new(3, 3), 0, Opening::Continuation),
            Err(Rejection::MissingCornerAnchor)
        );
    }

    #[test]
    fn test_oriented_shape_validation() {
        let board = Board::new(6);
        let piece = Catalog::standard().get(PieceId::new(1)).unwrap();
        let vertical = piece.oriented(Orientation::new(1, false));
        let opening = Opening::FirstPlacement { start_corner: BoardPosition::new(5, 0) };
        assert!(validate_placement(&board, &vertical, BoardPosition::new(4, 0), 0, opening).is_ok());
        assert_eq!(
            validate_placement(&board, &vertical, BoardPosition::new(5, 0), 0, opening),
            Err(Rejection::OutOfBounds(BoardPosition::new(6, 0)))
        );
    }
}
