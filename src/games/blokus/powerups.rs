//! Powerup cells, collection and targeting checks.
//!
//! Powerups are markers left on the board at setup. Covering a marked cell
//! with a piece moves the marker into the placing seat's token list; the
//! marker is cleared in the same step, so a cell pays out at most once.

use super::action::Rejection;
use super::geometry::BoardPosition;
use super::types::{Board, Occupant};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Kind of powerup token.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PowerupKind {
    /// Closes one empty cell to every seat for the rest of the game.
    Blocker,
}

/// Cells carrying a powerup at setup.
///
/// Two-seat games use the two corners that are nobody's starting corner;
/// other seat counts start without powerups.
#[instrument]
pub fn default_powerup_cells(board_size: usize, seat_count: usize) -> Vec<(BoardPosition, PowerupKind)> {
    if seat_count != 2 || board_size == 0 {
        return Vec::new();
    }
    let last = board_size as i32 - 1;
    vec![
        (BoardPosition::new(0, last), PowerupKind::Blocker),
        (BoardPosition::new(last, 0), PowerupKind::Blocker),
    ]
}

/// Clears and returns every marker under `cells`.
///
/// Running this twice over the same cells grants nothing the second time.
#[instrument(skip(board))]
pub fn collect_powerups(board: &mut Board, cells: &[BoardPosition]) -> Vec<PowerupKind> {
    let mut collected = Vec::new();
    for pos in cells {
        if let Some(kind) = board.powerup_at(*pos) {
            board.set_powerup(*pos, None);
            debug!(%pos, %kind, "Powerup collected");
            collected.push(kind);
        }
    }
    collected
}

/// Precondition: a powerup target is an empty, unmarked cell on the board.
pub struct PowerupTarget;

impl PowerupTarget {
    /// Checks that `kind` may be aimed at `target`.
    #[instrument(skip(board))]
    pub fn check(board: &Board, kind: PowerupKind, target: BoardPosition) -> Result<(), Rejection> {
        match kind {
            PowerupKind::Blocker => {
                let cell = board
                    .cell(target)
                    .ok_or(Rejection::InvalidPowerupTarget(target))?;
                if cell.occupant != Occupant::Empty || cell.powerup.is_some() {
                    return Err(Rejection::InvalidPowerupTarget(target));
                }
                Ok(())
            }
        }
    }
}

/// Writes the effect of `kind` at `target`. Assumes `PowerupTarget` passed.
pub(crate) fn apply_effect(board: &mut Board, kind: PowerupKind, target: BoardPosition) {
    match kind {
        PowerupKind::Blocker => board.set_occupant(target, Occupant::Blocked),
    }
}
