//! Core domain types: board, cells, seats and game bookkeeping.

use super::ai::Difficulty;
use super::geometry::{BoardPosition, OwnerLookup};
use super::pieces::{Catalog, PieceId};
use super::powerups::PowerupKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What occupies a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Occupant {
    /// Nothing placed here.
    #[default]
    Empty,
    /// Covered by a piece of the given seat.
    Owned {
        /// Owning seat.
        seat: usize,
        /// Piece that covers the cell.
        piece: PieceId,
    },
    /// Closed for the rest of the game by a blocker powerup.
    Blocked,
}

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Occupant of the cell.
    pub occupant: Occupant,
    /// Uncollected powerup marker, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub powerup: Option<PowerupKind>,
}

/// Square game board.
///
/// Cells sit behind an `Arc`; cloning a board is cheap and writes go through
/// copy-on-write, so snapshots share storage until one of them changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Arc<Vec<Cell>>,
}

impl Board {
    /// Creates an empty `size` x `size` board.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: Arc::new(vec![Cell::default(); size * size]),
        }
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true when the position lies on the board.
    pub fn contains(&self, pos: BoardPosition) -> bool {
        self.index(pos).is_some()
    }

    fn index(&self, pos: BoardPosition) -> Option<usize> {
        let size = self.size as i32;
        if pos.row < 0 || pos.col < 0 || pos.row >= size || pos.col >= size {
            return None;
        }
        Some(pos.row as usize * self.size + pos.col as usize)
    }

    /// The cell at `pos`, or `None` off the board.
    pub fn cell(&self, pos: BoardPosition) -> Option<Cell> {
        self.index(pos).and_then(|i| self.cells.get(i).copied())
    }

    /// The occupant at `pos`, or `None` off the board.
    pub fn occupant(&self, pos: BoardPosition) -> Option<Occupant> {
        self.cell(pos).map(|c| c.occupant)
    }

    /// True when `pos` is on the board and nothing occupies it.
    pub fn is_empty_at(&self, pos: BoardPosition) -> bool {
        matches!(self.occupant(pos), Some(Occupant::Empty))
    }

    /// Uncollected powerup at `pos`.
    pub fn powerup_at(&self, pos: BoardPosition) -> Option<PowerupKind> {
        self.cell(pos).and_then(|c| c.powerup)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = BoardPosition> + use<> {
        let size = self.size as i32;
        (0..size).flat_map(move |row| (0..size).map(move |col| BoardPosition::new(row, col)))
    }

    /// Positions owned by `seat`, row-major.
    pub fn owned_by(&self, seat: usize) -> impl Iterator<Item = BoardPosition> + '_ {
        self.positions()
            .filter(move |pos| self.owner_at(*pos) == Some(seat))
    }

    /// Number of cells owned by `seat`.
    pub fn owned_count(&self, seat: usize) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c.occupant, Occupant::Owned { seat: s, .. } if s == seat))
            .count()
    }

    /// Positions still carrying a powerup marker.
    pub fn powerup_cells(&self) -> Vec<(BoardPosition, PowerupKind)> {
        self.positions()
            .filter_map(|pos| self.powerup_at(pos).map(|kind| (pos, kind)))
            .collect()
    }

    /// Returns true when both boards share the same cell storage.
    pub fn shares_storage_with(&self, other: &Board) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }

    pub(crate) fn set_occupant(&mut self, pos: BoardPosition, occupant: Occupant) {
        if let Some(cell) = self.index(pos).and_then(|i| Arc::make_mut(&mut self.cells).get_mut(i)) {
            cell.occupant = occupant;
        }
    }

    pub(crate) fn set_powerup(&mut self, pos: BoardPosition, powerup: Option<PowerupKind>) {
        if let Some(cell) = self.index(pos).and_then(|i| Arc::make_mut(&mut self.cells).get_mut(i)) {
            cell.powerup = powerup;
        }
    }

    /// A copy of this board with `cells` owned by `seat` under `piece`.
    pub(crate) fn with_owned(&self, cells: &[BoardPosition], seat: usize, piece: PieceId) -> Board {
        let mut next = self.clone();
        for pos in cells {
            next.set_occupant(*pos, Occupant::Owned { seat, piece });
        }
        next
    }

    /// Formats the board as text: `.` empty, digits for seats, `x` blocked,
    /// `*` an uncollected powerup.
    pub fn display(&self) -> String {
        let mut result = String::with_capacity(self.size * (self.size + 1));
        for (i, cell) in self.cells.iter().enumerate() {
            let symbol = match (cell.occupant, cell.powerup) {
                (Occupant::Owned { seat, .. }, _) => char::from_digit(seat as u32, 36).unwrap_or('?'),
                (Occupant::Blocked, _) => 'x',
                (Occupant::Empty, Some(_)) => '*',
                (Occupant::Empty, None) => '.',
            };
            result.push(symbol);
            if self.size > 0 && (i + 1) % self.size == 0 && i + 1 < self.cells.len() {
                result.push('\n');
            }
        }
        result
    }
}

impl OwnerLookup for Board {
    fn owner_at(&self, pos: BoardPosition) -> Option<usize> {
        match self.occupant(pos) {
            Some(Occupant::Owned { seat, .. }) => Some(seat),
            _ => None,
        }
    }
}

/// Who controls a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatKind {
    /// Moves arrive from a person through the UI.
    #[default]
    Human,
    /// Moves are chosen by the search at the given tier.
    Ai(Difficulty),
}

/// One piece in a seat's inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceSlot {
    /// Catalog piece.
    pub id: PieceId,
    /// Whether the piece has been placed.
    pub used: bool,
}

/// A player slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    index: usize,
    kind: SeatKind,
    pieces: Vec<PieceSlot>,
    score: u32,
    powerups: Vec<PowerupKind>,
    history: Vec<usize>,
}

impl Seat {
    /// Creates a seat holding the given unused pieces.
    pub fn new(index: usize, kind: SeatKind, inventory: impl IntoIterator<Item = PieceId>) -> Self {
        Self {
            index,
            kind,
            pieces: inventory
                .into_iter()
                .map(|id| PieceSlot { id, used: false })
                .collect(),
            score: 0,
            powerups: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Ordinal seat index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Controller of the seat.
    pub fn kind(&self) -> SeatKind {
        self.kind
    }

    /// AI tier, when the seat is AI-controlled.
    pub fn difficulty(&self) -> Option<Difficulty> {
        match self.kind {
            SeatKind::Ai(d) => Some(d),
            SeatKind::Human => None,
        }
    }

    /// Full inventory including used pieces.
    pub fn pieces(&self) -> &[PieceSlot] {
        &self.pieces
    }

    /// Pieces not yet placed, in inventory order.
    pub fn unused_pieces(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.pieces.iter().filter(|s| !s.used).map(|s| s.id)
    }

    /// Returns true when the seat still holds `piece` unplaced.
    pub fn has_unused(&self, piece: PieceId) -> bool {
        self.pieces.iter().any(|s| s.id == piece && !s.used)
    }

    /// Returns true when `piece` is part of the inventory at all.
    pub fn owns(&self, piece: PieceId) -> bool {
        self.pieces.iter().any(|s| s.id == piece)
    }

    /// True until the seat places its first piece.
    pub fn is_first_placement(&self) -> bool {
        !self.pieces.iter().any(|s| s.used)
    }

    /// Cells placed so far.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Cells of the pieces still in hand.
    pub fn remaining_cells(&self, catalog: &Catalog) -> usize {
        self.unused_pieces().map(|id| catalog.size_of(id)).sum()
    }

    /// Powerup tokens held.
    pub fn powerups(&self) -> &[PowerupKind] {
        &self.powerups
    }

    /// Indices into the global turn history of this seat's moves.
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    pub(crate) fn mark_used(&mut self, piece: PieceId) -> bool {
        match self.pieces.iter_mut().find(|s| s.id == piece && !s.used) {
            Some(slot) => {
                slot.used = true;
                true
            }
            None => false,
        }
    }

    pub(crate) fn add_score(&mut self, cells: usize) {
        self.score += cells as u32;
    }

    pub(crate) fn grant_powerups(&mut self, tokens: impl IntoIterator<Item = PowerupKind>) {
        self.powerups.extend(tokens);
    }

    pub(crate) fn spend_powerup(&mut self, kind: PowerupKind) -> bool {
        match self.powerups.iter().position(|k| *k == kind) {
            Some(i) => {
                self.powerups.remove(i);
                true
            }
            None => false,
        }
    }

    pub(crate) fn record_turn(&mut self, turn: usize) {
        self.history.push(turn);
    }
}

/// Lifecycle of a game. Transitions only move forward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameStatus {
    /// Seats assigned, first move not yet allowed.
    Waiting,
    /// Moves are being accepted.
    Playing,
    /// No seat can move; outcome fixed.
    Finished,
}

/// Aggregate move statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    /// Moves committed so far (placements, passes and powerups).
    pub total_moves: usize,
    /// When the game left `waiting`.
    pub started_at: Option<DateTime<Utc>>,
    /// Timestamp of the most recent move.
    pub last_move_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_bounds() {
        let board = Board::new(5);
        assert!(board.contains(BoardPosition::new(0, 0)));
        assert!(board.contains(BoardPosition::new(4, 4)));
        assert!(!board.contains(BoardPosition::new(5, 0)));
        assert!(!board.contains(BoardPosition::new(0, -1)));
        assert_eq!(board.cell(BoardPosition::new(-1, 2)), None);
    }

    #[test]
    fn test_short_cell_vector_reads_as_off_board() {
        let mut value = serde_json::to_value(Board::new(5)).unwrap();
        value["cells"].as_array_mut().unwrap().truncate(10);
        let board: Board = serde_json::from_value(value).unwrap();

        assert!(board.is_empty_at(BoardPosition::new(1, 4)));
        assert_eq!(board.cell(BoardPosition::new(4, 4)), None);
        assert_eq!(board.owner_at(BoardPosition::new(4, 4)), None);
        let next = board.with_owned(&[BoardPosition::new(4, 4)], 0, PieceId::new(0));
        assert_eq!(next.owned_count(0), 0);
    }

    #[test]
    fn test_copy_on_write_keeps_original() {
        let board = Board::new(4);
        let copy = board.clone();
        assert!(board.shares_storage_with(&copy));

        let next = board.with_owned(&[BoardPosition::new(1, 1)], 0, PieceId::new(0));
        assert!(!next.shares_storage_with(&board));
        assert!(board.is_empty_at(BoardPosition::new(1, 1)));
        assert_eq!(next.owner_at(BoardPosition::new(1, 1)), Some(0));
    }

    #[test]
    fn test_display_marks_cells() {
        let mut board = Board::new(3);
        board.set_occupant(BoardPosition::new(0, 0), Occupant::Owned { seat: 1, piece: PieceId::new(0) });
        board.set_occupant(BoardPosition::new(1, 1), Occupant::Blocked);
        board.set_powerup(BoardPosition::new(2, 2), Some(PowerupKind::Blocker));
        assert_eq!(board.display(), "1..\n.x.\n..*");
    }

    #[test]
    fn test_seat_inventory_bookkeeping() {
        let mut seat = Seat::new(0, SeatKind::Human, [PieceId::new(0), PieceId::new(1)]);
        assert!(seat.is_first_placement());
        assert!(seat.mark_used(PieceId::new(1)));
        assert!(!seat.mark_used(PieceId::new(1)));
        assert!(!seat.is_first_placement());
        assert_eq!(seat.unused_pieces().collect::<Vec<_>>(), vec![PieceId::new(0)]);
        assert_eq!(seat.remaining_cells(Catalog::standard()), 1);
    }
}
