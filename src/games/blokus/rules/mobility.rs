//! Legal-move enumeration.
//!
//! A legal placement must cover an anchor: the seat's start corner for its
//! first piece, otherwise an empty cell diagonal to an own cell and not
//! edge-adjacent to one. Enumeration therefore only tries origins that put
//! some shape cell on an anchor, which keeps the search proportional to the
//! frontier instead of the board area.
//!
//! "Has at least one legal move" is answered here and nowhere else; the
//! turn controller, the contracts and the AI all call into this module.

use super::super::action::Placement;
use super::super::geometry::{BoardPosition, OwnerLookup, cells_occupied};
use super::super::pieces::Catalog;
use super::super::types::{Board, Seat};
use super::Opening;
use super::placement::LegalPlacement;
use std::collections::HashSet;
use std::ops::ControlFlow;
use tracing::{instrument, trace};

/// Cells a new piece of `seat` could cover to satisfy the anchor rule.
#[instrument(level = "trace", skip(board))]
pub fn anchor_cells(board: &Board, seat: usize, opening: Opening) -> Vec<BoardPosition> {
    match opening {
        Opening::FirstPlacement { start_corner } => {
            if board.is_empty_at(start_corner) {
                vec![start_corner]
            } else {
                Vec::new()
            }
        }
        Opening::Continuation => board
            .positions()
            .filter(|pos| board.is_empty_at(*pos))
            .filter(|pos| {
                pos.corner_neighbors()
                    .iter()
                    .any(|n| board.owner_at(*n) == Some(seat))
            })
            .filter(|pos| {
                !pos.edge_neighbors()
                    .iter()
                    .any(|n| board.owner_at(*n) == Some(seat))
            })
            .collect(),
    }
}

/// Visits every distinct legal placement in a deterministic order.
fn for_each_legal<B>(
    board: &Board,
    seat: &Seat,
    opening: Opening,
    mut visit: impl FnMut(Placement) -> ControlFlow<B>,
) -> ControlFlow<B> {
    let anchors = anchor_cells(board, seat.index(), opening);
    if anchors.is_empty() {
        return ControlFlow::Continue(());
    }
    let catalog = Catalog::standard();
    for piece_id in seat.unused_pieces() {
        let Some(piece) = catalog.get(piece_id) else {
            continue;
        };
        for (orientation, shape) in piece.orientations() {
            let mut tried: HashSet<BoardPosition> = HashSet::new();
            for anchor in &anchors {
                for &(dr, dc) in shape.cells() {
                    let origin = anchor.offset(-dr, -dc);
                    if !tried.insert(origin) {
                        continue;
                    }
                    let cells = cells_occupied(shape, origin);
                    if LegalPlacement::check(board, &cells, seat.index(), opening).is_ok() {
                        visit(Placement::new(piece_id, *orientation, origin))?;
                    }
                }
            }
        }
    }
    ControlFlow::Continue(())
}

/// Every distinct legal placement for `seat`.
///
/// Symmetric orientations are visited once, so each returned placement
/// covers a different set of cells or uses a different piece.
#[instrument(skip(board, seat), fields(seat = seat.index()))]
pub fn legal_placements(board: &Board, seat: &Seat, opening: Opening) -> Vec<Placement> {
    let mut out = Vec::new();
    let _ = for_each_legal::<()>(board, seat, opening, |p| {
        out.push(p);
        ControlFlow::Continue(())
    });
    trace!(count = out.len(), "Legal placements enumerated");
    out
}

/// Number of distinct legal placements for `seat`.
pub fn count_legal_placements(board: &Board, seat: &Seat, opening: Opening) -> usize {
    let mut count = 0;
    let _ = for_each_legal::<()>(board, seat, opening, |_| {
        count += 1;
        ControlFlow::Continue(())
    });
    count
}

/// True when `seat` has at least one legal placement.
#[instrument(level = "trace", skip(board, seat), fields(seat = seat.index()))]
pub fn has_legal_placement(board: &Board, seat: &Seat, opening: Opening) -> bool {
    for_each_legal(board, seat, opening, |_| ControlFlow::Break(())).is_break()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::blokus::geometry::Orientation;
    use crate::games::blokus::pieces::PieceId;
    use crate::games::blokus::rules::validate_placement;
    use crate::games::blokus::types::{Occupant, SeatKind};
    use std::collections::BTreeSet;

    fn footprint(p: &Placement) -> (PieceId, BTreeSet<BoardPosition>) {
        let cells = p.cells(Catalog::standard()).unwrap();
        (p.piece, cells.into_iter().collect())
    }

    fn brute_force(board: &Board, seat: &Seat, opening: Opening) -> BTreeSet<(PieceId, BTreeSet<BoardPosition>)> {
        let catalog = Catalog::standard();
        let size = board.size() as i32;
        let mut out = BTreeSet::new();
        for id in seat.unused_pieces() {
            let piece = catalog.get(id).unwrap();
            for orientation in Orientation::ALL {
                let shape = piece.oriented(orientation);
                for row in 0..size {
                    for col in 0..size {
                        let origin = BoardPosition::new(row, col);
                        if validate_placement(board, &shape, origin, seat.index(), opening).is_ok() {
                            out.insert((id, cells_occupied(&shape, origin).into_iter().collect()));
                        }
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_first_move_enumeration_matches_brute_force() {
        let board = Board::new(8);
        let seat = Seat::new(0, SeatKind::Human, Catalog::standard().ids());
        let opening = Opening::FirstPlacement { start_corner: BoardPosition::new(0, 0) };

        let placements = legal_placements(&board, &seat, opening);
        let found: BTreeSet<_> = placements.iter().map(footprint).collect();
        assert_eq!(found.len(), placements.len(), "no duplicate footprints");
        assert_eq!(found, brute_force(&board, &seat, opening));
    }

    #[test]
    fn test_continuation_enumeration_matches_brute_force() {
        let mut board = Board::new(8);
        for (r, c, seat) in [(0, 0, 0), (0, 1, 0), (1, 1, 0), (3, 3, 1), (2, 4, 1)] {
            board.set_occupant(
                BoardPosition::new(r, c),
                Occupant::Owned { seat, piece: PieceId::new(3) },
            );
        }
        let seat = Seat::new(0, SeatKind::Human, Catalog::standard().ids().skip(1));

        let placements = legal_placements(&board, &seat, Opening::Continuation);
        let found: BTreeSet<_> = placements.iter().map(footprint).collect();
        assert_eq!(found, brute_force(&board, &seat, Opening::Continuation));
        assert_eq!(count_legal_placements(&board, &seat, Opening::Continuation), placements.len());
    }

    #[test]
    fn test_no_pieces_means_no_moves() {
        let board = Board::new(5);
        let seat = Seat::new(0, SeatKind::Human, []);
        let opening = Opening::FirstPlacement { start_corner: BoardPosition::new(0, 0) };
        assert!(!has_legal_placement(&board, &seat, opening));
        assert!(legal_placements(&board, &seat, opening).is_empty());
    }

    #[test]
    fn test_taken_start_corner_blocks_first_move() {
        let mut board = Board::new(5);
        board.set_occupant(BoardPosition::new(0, 0), Occupant::Blocked);
        let seat = Seat::new(0, SeatKind::Human, [PieceId::new(0)]);
        let opening = Opening::FirstPlacement { start_corner: BoardPosition::new(0, 0) };
        assert!(anchor_cells(&board, 0, opening).is_empty());
        assert!(!has_legal_placement(&board, &seat, opening));
    }

    #[test]
    fn test_anchor_cells_exclude_edge_neighbors() {
        let mut board = Board::new(4);
        for (r, c) in [(0, 0), (0, 1)] {
            board.set_occupant(
                BoardPosition::new(r, c),
                Occupant::Owned { seat: 0, piece: PieceId::new(1) },
            );
        }
        let anchors = anchor_cells(&board, 0, Opening::Continuation);
        assert_eq!(anchors, vec![BoardPosition::new(1, 2)]);
    }
}
