//! First-class move types and rejection reasons.
//!
//! Moves are domain events, not side effects. A `MoveSubmission` is what an
//! actor proposes; a `Move` is what the history records once it is accepted.

use super::geometry::{BoardPosition, Orientation, Shape, cells_occupied};
use super::pieces::{Catalog, PieceId};
use super::powerups::PowerupKind;
use super::types::GameStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A piece under a chosen orientation, anchored at a board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_new::new)]
pub struct Placement {
    /// Piece being placed.
    pub piece: PieceId,
    /// Rotation/mirror applied to the piece.
    pub orientation: Orientation,
    /// Board position of the oriented shape's top-left offset.
    pub origin: BoardPosition,
}

impl Placement {
    /// The oriented shape, or `None` for an unknown piece.
    pub fn shape(&self, catalog: &Catalog) -> Option<Shape> {
        catalog.get(self.piece).map(|p| p.oriented(self.orientation))
    }

    /// Board cells this placement covers, or `None` for an unknown piece.
    pub fn cells(&self, catalog: &Catalog) -> Option<Vec<BoardPosition>> {
        self.shape(catalog).map(|s| cells_occupied(&s, self.origin))
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "piece {} {} at {}", self.piece, self.orientation, self.origin)
    }
}

/// What a recorded move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveKind {
    /// A piece was placed.
    Place(Placement),
    /// The seat had no legal placement and passed.
    Pass,
    /// A powerup token was spent on a cell.
    UsePowerup {
        /// Token spent.
        kind: PowerupKind,
        /// Targeted cell.
        target: BoardPosition,
    },
}

/// An accepted move. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Move {
    /// Acting seat.
    pub seat: usize,
    /// What happened.
    pub kind: MoveKind,
    /// Caller-supplied time of the move.
    pub at: DateTime<Utc>,
}

impl Move {
    /// The placement, for `Place` moves.
    pub fn placement(&self) -> Option<&Placement> {
        match &self.kind {
            MoveKind::Place(p) => Some(p),
            _ => None,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            MoveKind::Place(p) => write!(f, "seat {} places {}", self.seat, p),
            MoveKind::Pass => write!(f, "seat {} passes", self.seat),
            MoveKind::UsePowerup { kind, target } => {
                write!(f, "seat {} uses {} on {}", self.seat, kind, target)
            }
        }
    }
}

/// A move proposed by an actor, in the shape the external layers send.
///
/// ```
/// use strictly_blokus::MoveSubmission;
///
/// let json = r#"{"type":"place","piece_id":4,"position":{"row":0,"col":0}}"#;
/// let submission: MoveSubmission = serde_json::from_str(json).unwrap();
/// assert!(matches!(submission, MoveSubmission::Place { .. }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveSubmission {
    /// Place a piece.
    Place {
        /// Piece to place.
        #[serde(alias = "pieceId")]
        piece_id: PieceId,
        /// Origin of the oriented shape.
        position: BoardPosition,
        /// Orientation selected before committing.
        #[serde(default)]
        orientation: Orientation,
    },
    /// Forced pass.
    Pass,
    /// Spend a powerup token.
    UsePowerup {
        /// Token to spend.
        kind: PowerupKind,
        /// Targeted cell.
        target: BoardPosition,
    },
}

impl MoveSubmission {
    /// Wraps a placement.
    pub fn place(placement: Placement) -> Self {
        Self::Place {
            piece_id: placement.piece,
            position: placement.origin,
            orientation: placement.orientation,
        }
    }

    /// The placement, for `Place` submissions.
    pub fn placement(&self) -> Option<Placement> {
        match *self {
            Self::Place {
                piece_id,
                position,
                orientation,
            } => Some(Placement::new(piece_id, orientation, position)),
            _ => None,
        }
    }

    /// The history entry this submission becomes once accepted.
    pub fn into_kind(self) -> MoveKind {
        match self {
            Self::Place {
                piece_id,
                position,
                orientation,
            } => MoveKind::Place(Placement::new(piece_id, orientation, position)),
            Self::Pass => MoveKind::Pass,
            Self::UsePowerup { kind, target } => MoveKind::UsePowerup { kind, target },
        }
    }
}

/// Why a submission was refused. Rejections never change game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Rejection {
    /// A covered cell lies off the board.
    #[display("Cell {} is outside the board", _0)]
    OutOfBounds(BoardPosition),

    /// A covered cell is already taken.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(BoardPosition),

    /// A covered cell shares a side with the seat's own pieces.
    #[display("Cell {} would touch an own piece along an edge", _0)]
    IllegalEdgeAdjacency(BoardPosition),

    /// No covered cell touches an own piece at a corner.
    #[display("Placement does not touch an own piece at a corner")]
    MissingCornerAnchor,

    /// A first placement must cover the seat's starting corner.
    #[display("First placement must cover starting corner {}", _0)]
    MissingStartCorner(BoardPosition),

    /// The acting seat is not the current player.
    #[display("It is not seat {}'s turn (seat {} to move)", seat, current)]
    NotYourTurn {
        /// Seat that tried to act.
        seat: usize,
        /// Seat whose turn it is.
        current: usize,
    },

    /// The piece was already placed.
    #[display("Piece {} was already used", _0)]
    PieceAlreadyUsed(PieceId),

    /// The piece is not in the catalog or not in the seat's inventory.
    #[display("Piece {} is not in this seat's inventory", _0)]
    UnknownPiece(PieceId),

    /// Passing is only allowed without a legal placement.
    #[display("Cannot pass while a legal placement exists")]
    PassWithLegalMove,

    /// Moves are only accepted while playing.
    #[display("Game is not accepting moves ({})", _0)]
    GameNotPlaying(GameStatus),

    /// The seat does not hold the token.
    #[display("Seat does not hold a {} powerup", _0)]
    PowerupNotHeld(PowerupKind),

    /// The powerup cannot be aimed at this cell.
    #[display("Cell {} is not a valid powerup target", _0)]
    InvalidPowerupTarget(BoardPosition),

    /// Piece selection is suppressed while aiming a powerup.
    #[display("Cancel powerup targeting before selecting a piece")]
    PowerupTargetingActive,

    /// Nothing is selected to resolve.
    #[display("Nothing is selected")]
    NothingSelected,
}

impl Rejection {
    /// Stable snake_case reason code (`cell_occupied`, `not_your_turn`, ...).
    pub fn code(&self) -> &'static str {
        self.into()
    }
}

impl std::error::Error for Rejection {}
