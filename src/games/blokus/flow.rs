//! Turn and game-flow controller.
//!
//! Every transition takes `&self` and returns a new `GameState`; a rejected
//! move leaves the caller's snapshot untouched.

use super::GameState;
use super::action::{Move, MoveKind, MoveSubmission, Rejection};
use super::contracts::{Contract, MoveContract, SeatAction};
use super::geometry::BoardPosition;
use super::pieces::PieceId;
use super::powerups::{PowerupKind, apply_effect};
use super::rules::{commit_placement, winner_by_penalty};
use super::types::GameStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// Final result of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Penalty per seat under the game's scoring rule; lower is better.
    pub penalties: Vec<i32>,
    /// Seat with the strictly lowest penalty, `None` on a tie.
    pub winner: Option<usize>,
}

impl GameState {
    /// Moves a `waiting` game to `playing`.
    #[instrument(skip(self))]
    pub fn start(&self, at: DateTime<Utc>) -> Result<GameState, Rejection> {
        match self.status {
            GameStatus::Waiting => Ok(self.begin(at)),
            other => Err(Rejection::GameNotPlaying(other)),
        }
    }

    pub(crate) fn begin(&self, at: DateTime<Utc>) -> GameState {
        let mut next = self.clone();
        next.status = GameStatus::Playing;
        next.stats.started_at = Some(at);
        next.current_player = 0;
        if !next.seat_can_place(0) {
            debug!("Seat 0 cannot open, skipping forward");
            next.advance_turn();
        }
        info!(seats = next.seats.len(), current = next.current_player, "Game started");
        next
    }

    /// Checks a submission without applying it.
    pub fn validate(&self, seat: usize, submission: MoveSubmission) -> Result<(), Rejection> {
        MoveContract::pre(self, &SeatAction::new(seat, submission))
    }

    /// Applies a submission from `seat`, producing the next snapshot.
    ///
    /// Rejections are recoverable and leave `self` unchanged. In debug
    /// builds the postconditions are checked and a breach panics.
    #[instrument(skip(self), fields(move_count = self.move_count()))]
    pub fn submit(
        &self,
        seat: usize,
        submission: MoveSubmission,
        at: DateTime<Utc>,
    ) -> Result<GameState, Rejection> {
        MoveContract::pre(self, &SeatAction::new(seat, submission))?;

        let next = match submission.into_kind() {
            MoveKind::Place(placement) => commit_placement(self, &placement, at),
            MoveKind::Pass => self.commit_pass(at),
            MoveKind::UsePowerup { kind, target } => self.commit_powerup(kind, target, at),
        };

        if cfg!(debug_assertions)
            && let Err(violations) = MoveContract::post(self, &next)
        {
            for violation in &violations {
                error!(%violation, "Postcondition failed");
            }
            panic!("move postconditions violated: {} breach(es)", violations.len());
        }

        debug!(seat, next = next.current_player, status = %next.status, "Move applied");
        Ok(next)
    }

    /// Applies a submission on behalf of whoever's turn it is.
    pub fn submit_current(
        &self,
        submission: MoveSubmission,
        at: DateTime<Utc>,
    ) -> Result<GameState, Rejection> {
        self.submit(self.current_player, submission, at)
    }

    /// Final penalties and winner, once the game is finished.
    pub fn outcome(&self) -> Option<Outcome> {
        let penalties = self.standings.clone()?;
        Some(Outcome {
            penalties,
            winner: self.winner,
        })
    }

    /// The piece `seat` placed most recently.
    pub fn last_placed(&self, seat: usize) -> Option<PieceId> {
        let seat = self.seats.get(seat)?;
        seat.history()
            .iter()
            .rev()
            .filter_map(|&turn| self.turn_history.get(turn))
            .find_map(|mv| mv.placement().map(|p| p.piece))
    }

    fn commit_pass(&self, at: DateTime<Utc>) -> GameState {
        let mut next = self.clone();
        next.record(Move::new(self.current_player, MoveKind::Pass, at));
        next.advance_turn();
        next
    }

    fn commit_powerup(&self, kind: PowerupKind, target: BoardPosition, at: DateTime<Utc>) -> GameState {
        let seat = self.current_player;
        let mut next = self.clone();
        next.seat_mut(seat).spend_powerup(kind);
        apply_effect(&mut next.board, kind, target);
        next.record(Move::new(seat, MoveKind::UsePowerup { kind, target }, at));
        next.advance_turn();
        debug!(seat, %kind, %target, "Powerup used");
        next
    }

    /// Moves to the next seat with a legal placement, or finishes the game.
    ///
    /// Scans forward from the seat after the current one, wrapping, and
    /// includes the current seat last.
    pub(crate) fn advance_turn(&mut self) {
        let n = self.seats.len();
        let from = self.current_player;
        let next = (1..=n)
            .map(|step| (from + step) % n)
            .find(|&seat| self.seat_can_place(seat));
        match next {
            Some(seat) => {
                if seat != (from + 1) % n {
                    debug!(from, to = seat, "Skipped seats without legal placements");
                }
                self.current_player = seat;
            }
            None => self.finish(),
        }
    }

    fn finish(&mut self) {
        let penalties: Vec<i32> = (0..self.seats.len())
            .map(|seat| {
                self.scoring
                    .penalty(&self.seats[seat], self.last_placed(seat))
            })
            .collect();
        self.winner = winner_by_penalty(&penalties);
        self.status = GameStatus::Finished;
        info!(?penalties, winner = ?self.winner, "Game finished");
        self.standings = Some(penalties);
    }
}
