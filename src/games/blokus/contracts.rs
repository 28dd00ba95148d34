//! Contract-based validation for submitted moves.
//!
//! Contracts define correctness through preconditions and postconditions,
//! Hoare-style: {P} action {Q}. Preconditions produce the recoverable
//! rejections; postconditions guard the engine itself.

use super::GameState;
use super::action::{MoveSubmission, Rejection};
use super::invariants::{GameInvariants, InvariantSet, InvariantViolation};
use super::pieces::{Catalog, PieceId};
use super::powerups::{PowerupKind, PowerupTarget};
use super::rules::LegalPlacement;
use super::types::{GameStatus, Occupant};
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), Rejection>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), Vec<InvariantViolation>>;
}

/// A submission together with the seat proposing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct SeatAction {
    /// Acting seat.
    pub seat: usize,
    /// Proposed move.
    pub submission: MoveSubmission,
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the game is accepting moves.
pub struct GameIsPlaying;

impl GameIsPlaying {
    /// Rejects moves outside `playing`.
    pub fn check(game: &GameState) -> Result<(), Rejection> {
        match game.status() {
            GameStatus::Playing => Ok(()),
            other => Err(Rejection::GameNotPlaying(other)),
        }
    }
}

/// Precondition: it must be the seat's turn.
pub struct SeatsTurn;

impl SeatsTurn {
    /// Rejects actions from any seat other than the current one.
    pub fn check(game: &GameState, seat: usize) -> Result<(), Rejection> {
        if seat != game.current_player() {
            Err(Rejection::NotYourTurn {
                seat,
                current: game.current_player(),
            })
        } else {
            Ok(())
        }
    }
}

/// Precondition: the piece is in the seat's hand.
pub struct PieceAvailable;

impl PieceAvailable {
    /// Distinguishes unknown pieces from already-used ones.
    pub fn check(game: &GameState, seat: usize, piece: PieceId) -> Result<(), Rejection> {
        let owner = game.seat(seat).ok_or(Rejection::UnknownPiece(piece))?;
        if !Catalog::standard().contains(piece) || !owner.owns(piece) {
            return Err(Rejection::UnknownPiece(piece));
        }
        if !owner.has_unused(piece) {
            return Err(Rejection::PieceAlreadyUsed(piece));
        }
        Ok(())
    }
}

/// Precondition: passing is forced, never optional.
pub struct ForcedPass;

impl ForcedPass {
    /// Rejects a pass while the seat still has a legal placement.
    pub fn check(game: &GameState, seat: usize) -> Result<(), Rejection> {
        if game.seat_can_place(seat) {
            Err(Rejection::PassWithLegalMove)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the seat holds the powerup token.
pub struct PowerupHeld;

impl PowerupHeld {
    /// Rejects spending a token the seat does not hold.
    pub fn check(game: &GameState, seat: usize, kind: PowerupKind) -> Result<(), Rejection> {
        match game.seat(seat) {
            Some(s) if s.powerups().contains(&kind) => Ok(()),
            _ => Err(Rejection::PowerupNotHeld(kind)),
        }
    }
}

/// Composite precondition: every rule that applies to the submission.
pub struct LegalSubmission;

impl LegalSubmission {
    /// Validates all preconditions for an action, in reporting order.
    #[instrument(skip(game))]
    pub fn check(game: &GameState, action: &SeatAction) -> Result<(), Rejection> {
        GameIsPlaying::check(game)?;
        SeatsTurn::check(game, action.seat)?;
        match action.submission {
            MoveSubmission::Place { .. } => {
                let placement = action
                    .submission
                    .placement()
                    .ok_or(Rejection::NothingSelected)?;
                PieceAvailable::check(game, action.seat, placement.piece)?;
                let cells = placement
                    .cells(Catalog::standard())
                    .ok_or(Rejection::UnknownPiece(placement.piece))?;
                LegalPlacement::check(game.board(), &cells, action.seat, game.opening_for(action.seat))
            }
            MoveSubmission::Pass => ForcedPass::check(game, action.seat),
            MoveSubmission::UsePowerup { kind, target } => {
                PowerupHeld::check(game, action.seat, kind)?;
                PowerupTarget::check(game.board(), kind, target)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for submitted moves.
///
/// Preconditions:
/// - Game is playing and it is the seat's turn
/// - The submission obeys the placement, pass or powerup rules
///
/// Postconditions:
/// - All game invariants hold
/// - History grew by exactly one and kept its prefix
/// - Status never moved backward
/// - No owned or blocked cell changed
pub struct MoveContract;

impl Contract<GameState, SeatAction> for MoveContract {
    fn pre(game: &GameState, action: &SeatAction) -> Result<(), Rejection> {
        LegalSubmission::check(game, action).inspect_err(|rejection| {
            warn!(seat = action.seat, code = rejection.code(), %rejection, "Move rejected");
        })
    }

    fn post(before: &GameState, after: &GameState) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = match GameInvariants::check_all(after) {
            Ok(()) => Vec::new(),
            Err(v) => v,
        };

        let prior = before.turn_history();
        if after.turn_history().len() != prior.len() + 1 || &after.turn_history()[..prior.len()] != prior {
            violations.push(InvariantViolation::new("History is append-only, one move per transition"));
        }
        if after.status() < before.status() {
            violations.push(InvariantViolation::new("Status never moves backward"));
        }
        let changed = before
            .board()
            .cells()
            .iter()
            .zip(after.board().cells())
            .any(|(b, a)| b.occupant != Occupant::Empty && b.occupant != a.occupant);
        if changed {
            violations.push(InvariantViolation::new("Occupied cells never change"));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}
