//! Turn-pointer and status invariant.

use super::super::GameState;
use super::super::types::GameStatus;
use super::Invariant;

/// Invariant: `current_player` indexes a seat and the outcome fields match
/// the lifecycle status.
///
/// Waiting games have no history; playing games have no outcome; finished
/// games carry one penalty per seat and a winner consistent with them.
pub struct CurrentSeatInvariant;

impl Invariant<GameState> for CurrentSeatInvariant {
    fn holds(game: &GameState) -> bool {
        let seats = game.seats().len();
        if game.current_player() >= seats {
            return false;
        }
        match game.status() {
            GameStatus::Waiting => {
                game.turn_history().is_empty() && game.winner().is_none() && game.standings().is_none()
            }
            GameStatus::Playing => game.winner().is_none() && game.standings().is_none(),
            GameStatus::Finished => match game.standings() {
                Some(standings) if standings.len() == seats => {
                    game.winner() == super::super::rules::winner_by_penalty(standings)
                }
                _ => false,
            },
        }
    }

    fn description() -> &'static str {
        "Current seat is in range and the outcome matches the status"
    }
}
