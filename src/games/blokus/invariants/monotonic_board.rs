//! Board ownership invariant: every owned cell is backed by a placed piece.

use super::super::GameState;
use super::super::pieces::{Catalog, PieceId};
use super::super::types::Occupant;
use super::Invariant;
use std::collections::HashMap;

/// Invariant: owned cells match the pieces marked used.
///
/// Each `(seat, piece)` on the board must be a used piece of that seat and
/// cover exactly the piece's cell count; every used piece must be on the
/// board. Since pieces are never removed, this also pins ownership over time.
pub struct MonotonicBoardInvariant;

impl Invariant<GameState> for MonotonicBoardInvariant {
    fn holds(game: &GameState) -> bool {
        let catalog = Catalog::standard();
        let mut counts: HashMap<(usize, PieceId), usize> = HashMap::new();
        for cell in game.board().cells() {
            if let Occupant::Owned { seat, piece } = cell.occupant {
                let Some(owner) = game.seat(seat) else {
                    return false;
                };
                if owner.has_unused(piece) || !owner.owns(piece) {
                    return false;
                }
                *counts.entry((seat, piece)).or_default() += 1;
            }
        }

        let used: usize = game
            .seats()
            .iter()
            .map(|s| s.pieces().iter().filter(|p| p.used).count())
            .sum();
        if used != counts.len() {
            return false;
        }

        counts
            .iter()
            .all(|(&(_, piece), &cells)| catalog.size_of(piece) == cells)
    }

    fn description() -> &'static str {
        "Owned cells match placed pieces"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::blokus::geometry::BoardPosition;
    use crate::games::blokus::state::GameSetup;
    use crate::games::blokus::{MoveSubmission, Orientation};
    use chrono::Utc;

    #[test]
    fn test_empty_board_holds() {
        let game = GameSetup::two_player().start(Utc::now()).unwrap();
        assert!(MonotonicBoardInvariant::holds(&game));
    }

    #[test]
    fn test_placed_piece_holds() {
        let game = GameSetup::two_player().start(Utc::now()).unwrap();
        let game = game
            .submit(
                0,
                MoveSubmission::Place {
                    piece_id: PieceId::new(9),
                    position: BoardPosition::new(0, 0),
                    orientation: Orientation::new(1, false),
                },
                Utc::now(),
            )
            .unwrap();
        assert!(MonotonicBoardInvariant::holds(&game));
    }

    #[test]
    fn test_erased_cell_violates() {
        let game = GameSetup::two_player().start(Utc::now()).unwrap();
        let mut game = game
            .submit(
                0,
                MoveSubmission::Place {
                    piece_id: PieceId::new(1),
                    position: BoardPosition::new(0, 0),
                    orientation: Orientation::IDENTITY,
                },
                Utc::now(),
            )
            .unwrap();
        game.board.set_occupant(BoardPosition::new(0, 1), Occupant::Empty);
        assert!(!MonotonicBoardInvariant::holds(&game));
    }
}
