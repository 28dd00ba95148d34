//! End-of-game scoring.
//!
//! Scores are penalties: the value of the pieces a seat could not place.
//! Lower is better. The exact formula is a game-rule parameter.

use super::super::pieces::{Catalog, PieceId};
use super::super::types::Seat;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Bonus subtracted under `Classic` when every piece was placed.
pub const ALL_PLACED_BONUS: i32 = 15;

/// Further bonus under `Classic` when the monomino was placed last.
pub const MONOMINO_LAST_BONUS: i32 = 5;

/// Scoring formula applied when the game finishes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoringRule {
    /// Penalty is the number of cells left in hand.
    #[default]
    RemainingCells,
    /// Remaining cells, with bonuses for clearing the whole inventory.
    Classic,
}

impl ScoringRule {
    /// Penalty for `seat`; `last_placed` is the seat's most recent piece.
    #[instrument(skip(seat), fields(seat = seat.index()))]
    pub fn penalty(self, seat: &Seat, last_placed: Option<PieceId>) -> i32 {
        let catalog = Catalog::standard();
        let remaining = seat.remaining_cells(catalog) as i32;
        match self {
            ScoringRule::RemainingCells => remaining,
            ScoringRule::Classic => {
                if remaining > 0 {
                    return remaining;
                }
                let monomino_last = last_placed
                    .and_then(|id| catalog.get(id))
                    .is_some_and(|p| p.size() == 1);
                if monomino_last {
                    -(ALL_PLACED_BONUS + MONOMINO_LAST_BONUS)
                } else {
                    -ALL_PLACED_BONUS
                }
            }
        }
    }
}

/// The seat with the strictly lowest penalty, or `None` on a tie.
#[instrument]
pub fn winner_by_penalty(penalties: &[i32]) -> Option<usize> {
    let best = *penalties.iter().min()?;
    let mut leaders = penalties.iter().enumerate().filter(|(_, p)| **p == best);
    let (seat, _) = leaders.next()?;
    if leaders.next().is_some() {
        None
    } else {
        Some(seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::blokus::types::SeatKind;

    fn seat_with(pieces: &[u8], used: &[u8]) -> Seat {
        let mut seat = Seat::new(0, SeatKind::Human, pieces.iter().map(|&p| PieceId::new(p)));
        for &p in used {
            seat.mark_used(PieceId::new(p));
        }
        seat
    }

    #[test]
    fn test_remaining_cells_penalty() {
        // I1 used, I3 and X5 left.
        let seat = seat_with(&[0, 2, 20], &[0]);
        assert_eq!(ScoringRule::RemainingCells.penalty(&seat, Some(PieceId::new(0))), 8);
    }

    #[test]
    fn test_classic_bonuses() {
        let seat = seat_with(&[0, 2], &[0, 2]);
        assert_eq!(ScoringRule::Classic.penalty(&seat, Some(PieceId::new(2))), -15);
        assert_eq!(ScoringRule::Classic.penalty(&seat, Some(PieceId::new(0))), -20);

        let unfinished = seat_with(&[0, 2], &[0]);
        assert_eq!(ScoringRule::Classic.penalty(&unfinished, Some(PieceId::new(0))), 3);
    }

    #[test]
    fn test_winner_is_lowest_penalty() {
        assert_eq!(winner_by_penalty(&[4, 1, 9]), Some(1));
        assert_eq!(winner_by_penalty(&[2, 2, 9]), None);
        assert_eq!(winner_by_penalty(&[]), None);
    }

    #[test]
    fn test_rule_parses_from_config_text() {
        assert_eq!("classic".parse::<ScoringRule>().ok(), Some(ScoringRule::Classic));
        assert_eq!(ScoringRule::RemainingCells.to_string(), "remaining_cells");
    }
}
