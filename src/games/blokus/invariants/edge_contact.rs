//! Board-level adjacency invariant.

use super::super::GameState;
use super::super::types::Occupant;
use super::Invariant;

/// Invariant: different pieces of the same seat never share an edge.
pub struct NoSameSeatEdgeContactInvariant;

impl Invariant<GameState> for NoSameSeatEdgeContactInvariant {
    fn holds(game: &GameState) -> bool {
        let board = game.board();
        board.positions().all(|pos| {
            let Some(Occupant::Owned { seat, piece }) = board.occupant(pos) else {
                return true;
            };
            pos.edge_neighbors().iter().all(|n| match board.occupant(*n) {
                Some(Occupant::Owned { seat: s, piece: p }) => s != seat || p == piece,
                _ => true,
            })
        })
    }

    fn description() -> &'static str {
        "Pieces of the same seat never share an edge"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::blokus::state::GameSetup;
    use crate::games::blokus::{BoardPosition, PieceId};

    #[test]
    fn test_same_piece_contact_holds() {
        let mut game = GameSetup::two_player().build().unwrap();
        for col in 0..2 {
            game.board.set_occupant(
                BoardPosition::new(0, col),
                Occupant::Owned { seat: 0, piece: PieceId::new(1) },
            );
        }
        assert!(NoSameSeatEdgeContactInvariant::holds(&game));
    }

    #[test]
    fn test_different_pieces_touching_violates() {
        let mut game = GameSetup::two_player().build().unwrap();
        game.board.set_occupant(
            BoardPosition::new(0, 0),
            Occupant::Owned { seat: 0, piece: PieceId::new(0) },
        );
        game.board.set_occupant(
            BoardPosition::new(0, 1),
            Occupant::Owned { seat: 0, piece: PieceId::new(1) },
        );
        assert!(!NoSameSeatEdgeContactInvariant::holds(&game));

        // The same contact between two seats is fine.
        game.board.set_occupant(
            BoardPosition::new(0, 1),
            Occupant::Owned { seat: 1, piece: PieceId::new(1) },
        );
        assert!(NoSameSeatEdgeContactInvariant::holds(&game));
    }
}
