//! Pre-commit turn interaction.
//!
//! A `TurnDraft` tracks what the acting seat has selected before it
//! submits: a piece with its current orientation, or a powerup awaiting a
//! target. The two modes are exclusive.

use super::action::{MoveSubmission, Placement, Rejection};
use super::geometry::{BoardPosition, Orientation, cells_occupied};
use super::pieces::{Catalog, PieceId};
use super::powerups::PowerupKind;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Selection state of the acting seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TurnDraft {
    /// Nothing selected.
    #[default]
    Idle,
    /// A piece is held in the given orientation.
    PieceSelected {
        /// Held piece.
        piece: PieceId,
        /// Current transform.
        orientation: Orientation,
    },
    /// A powerup is waiting for its target cell.
    PowerupTargeting {
        /// Powerup being aimed.
        kind: PowerupKind,
    },
}

impl TurnDraft {
    /// Picks up a piece, replacing any previously held piece.
    pub fn select_piece(self, piece: PieceId) -> Result<Self, Rejection> {
        match self {
            TurnDraft::PowerupTargeting { .. } => Err(Rejection::PowerupTargetingActive),
            _ => Ok(TurnDraft::PieceSelected {
                piece,
                orientation: Orientation::IDENTITY,
            }),
        }
    }

    /// Rotates the held piece a quarter turn clockwise.
    pub fn rotate(self) -> Self {
        match self {
            TurnDraft::PieceSelected { piece, orientation } => TurnDraft::PieceSelected {
                piece,
                orientation: orientation.rotated(),
            },
            other => other,
        }
    }

    /// Mirrors the held piece.
    pub fn flip(self) -> Self {
        match self {
            TurnDraft::PieceSelected { piece, orientation } => TurnDraft::PieceSelected {
                piece,
                orientation: orientation.flipped(),
            },
            other => other,
        }
    }

    /// Starts aiming a powerup; drops any held piece.
    pub fn enter_targeting(self, kind: PowerupKind) -> Self {
        TurnDraft::PowerupTargeting { kind }
    }

    /// Returns to `Idle`.
    pub fn cancel(self) -> Self {
        TurnDraft::Idle
    }

    /// Turns the draft into a submission anchored at `target`.
    #[instrument]
    pub fn resolve(self, target: BoardPosition) -> Result<MoveSubmission, Rejection> {
        match self {
            TurnDraft::Idle => Err(Rejection::NothingSelected),
            TurnDraft::PieceSelected { piece, orientation } => {
                Ok(MoveSubmission::place(Placement::new(piece, orientation, target)))
            }
            TurnDraft::PowerupTargeting { kind } => Ok(MoveSubmission::UsePowerup { kind, target }),
        }
    }

    /// Cells the held piece would cover at `target`, for hover previews.
    pub fn preview(self, target: BoardPosition) -> Vec<BoardPosition> {
        match self {
            TurnDraft::PieceSelected { piece, orientation } => Catalog::standard()
                .get(piece)
                .map(|p| cells_occupied(&p.oriented(orientation), target))
                .unwrap_or_default(),
            TurnDraft::PowerupTargeting { .. } => vec![target],
            TurnDraft::Idle => Vec::new(),
        }
    }
}
