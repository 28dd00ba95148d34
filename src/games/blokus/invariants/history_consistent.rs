//! History invariant: the global log, seat logs and stats agree.

use super::super::GameState;
use super::super::action::MoveKind;
use super::Invariant;

/// Invariant: history is complete and consistently indexed.
///
/// - `stats.total_moves` equals the global log length
/// - seat logs partition the global log, each entry pointing at a move by
///   that seat, in increasing order
/// - each seat's `Place` moves match its used pieces one-to-one
pub struct HistoryConsistentInvariant;

impl Invariant<GameState> for HistoryConsistentInvariant {
    fn holds(game: &GameState) -> bool {
        let history = game.turn_history();
        if game.stats().total_moves != history.len() {
            return false;
        }

        let mut seen = vec![false; history.len()];
        for seat in game.seats() {
            if !seat.history().windows(2).all(|w| w[0] < w[1]) {
                return false;
            }
            let mut placed = Vec::new();
            for &turn in seat.history() {
                let Some(mv) = history.get(turn) else {
                    return false;
                };
                if mv.seat != seat.index() || seen[turn] {
                    return false;
                }
                seen[turn] = true;
                if let MoveKind::Place(p) = mv.kind {
                    placed.push(p.piece);
                }
            }
            let mut used: Vec<_> = seat.pieces().iter().filter(|p| p.used).map(|p| p.id).collect();
            placed.sort();
            used.sort();
            if placed != used {
                return false;
            }
        }

        seen.into_iter().all(|s| s)
    }

    fn description() -> &'static str {
        "Turn history, seat histories and stats agree"
    }
}
