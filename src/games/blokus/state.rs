//! The `GameState` aggregate and game setup.
//!
//! A `GameState` is an immutable snapshot. Every accepted move produces a new
//! value; the board, seats and history sit behind `Arc`s and are written
//! copy-on-write, so snapshots share whatever did not change.

use super::action::{Move, Placement};
use super::geometry::BoardPosition;
use super::pieces::{Catalog, PieceId};
use super::powerups::default_powerup_cells;
use super::rules::{self, Opening, ScoringRule};
use super::types::{Board, GameStats, GameStatus, Seat, SeatKind};
use chrono::{DateTime, Utc};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Fewest seats a game can have.
pub const MIN_SEATS: usize = 2;
/// Most seats a game can have.
pub const MAX_SEATS: usize = 4;
/// Smallest playable board.
pub const MIN_BOARD_SIZE: usize = 3;
/// Largest supported board.
pub const MAX_BOARD_SIZE: usize = 64;

/// Complete game snapshot.
///
/// Deserializing checks structure and invariants, so a decoded state is
/// always playable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameState")]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) seats: Arc<Vec<Seat>>,
    pub(crate) current_player: usize,
    pub(crate) turn_history: Arc<Vec<Move>>,
    pub(crate) stats: GameStats,
    pub(crate) status: GameStatus,
    pub(crate) winner: Option<usize>,
    pub(crate) scoring: ScoringRule,
    pub(crate) standings: Option<Vec<i32>>,
}

/// Field-for-field wire form of [`GameState`], not yet validated.
#[derive(Debug, Deserialize)]
pub(crate) struct RawGameState {
    board: Board,
    seats: Arc<Vec<Seat>>,
    current_player: usize,
    turn_history: Arc<Vec<Move>>,
    stats: GameStats,
    status: GameStatus,
    winner: Option<usize>,
    scoring: ScoringRule,
    standings: Option<Vec<i32>>,
}

impl RawGameState {
    /// The state as decoded, without any checks.
    pub(crate) fn into_unchecked(self) -> GameState {
        GameState {
            board: self.board,
            seats: self.seats,
            current_player: self.current_player,
            turn_history: self.turn_history,
            stats: self.stats,
            status: self.status,
            winner: self.winner,
            scoring: self.scoring,
            standings: self.standings,
        }
    }
}

impl GameState {
    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// All seats in turn order.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// A seat by index.
    pub fn seat(&self, index: usize) -> Option<&Seat> {
        self.seats.get(index)
    }

    /// Index of the seat to move.
    pub fn current_player(&self) -> usize {
        self.current_player
    }

    /// The seat to move.
    pub fn current_seat(&self) -> &Seat {
        &self.seats[self.current_player]
    }

    /// Global, append-only move log.
    pub fn turn_history(&self) -> &[Move] {
        &self.turn_history
    }

    /// Number of moves committed.
    pub fn move_count(&self) -> usize {
        self.turn_history.len()
    }

    /// Moves made by one seat, oldest first.
    pub fn seat_moves(&self, seat: usize) -> impl Iterator<Item = &Move> + '_ {
        self.seats
            .get(seat)
            .into_iter()
            .flat_map(|s| s.history().iter())
            .filter_map(|i| self.turn_history.get(*i))
    }

    /// Aggregate statistics.
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Lifecycle status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Winning seat once finished; `None` while playing or on a tie.
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    /// Scoring formula in force.
    pub fn scoring(&self) -> ScoringRule {
        self.scoring
    }

    /// Final penalty per seat, available once finished.
    pub fn standings(&self) -> Option<&[i32]> {
        self.standings.as_deref()
    }

    /// Returns true when no more moves are accepted.
    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    /// Designated starting corner of `seat`.
    pub fn start_corner(&self, seat: usize) -> BoardPosition {
        rules::start_corner(self.board.size(), self.seats.len(), seat)
    }

    /// Anchor rule that applies to `seat`'s next placement.
    pub fn opening_for(&self, seat: usize) -> Opening {
        match self.seats.get(seat) {
            Some(s) if s.is_first_placement() => Opening::FirstPlacement {
                start_corner: self.start_corner(seat),
            },
            _ => Opening::Continuation,
        }
    }

    /// True when `seat` has any legal placement on the current board.
    pub fn seat_can_place(&self, seat: usize) -> bool {
        self.seats
            .get(seat)
            .is_some_and(|s| rules::has_legal_placement(&self.board, s, self.opening_for(seat)))
    }

    /// All distinct legal placements for `seat`.
    pub fn legal_placements_for(&self, seat: usize) -> Vec<Placement> {
        match self.seats.get(seat) {
            Some(s) => rules::legal_placements(&self.board, s, self.opening_for(seat)),
            None => Vec::new(),
        }
    }

    pub(crate) fn replace_board(&mut self, board: Board) {
        self.board = board;
    }

    pub(crate) fn seat_mut(&mut self, seat: usize) -> &mut Seat {
        &mut Arc::make_mut(&mut self.seats)[seat]
    }

    /// Appends a move to both histories and updates the stats.
    pub(crate) fn record(&mut self, mv: Move) {
        let turn = self.turn_history.len();
        self.seat_mut(mv.seat).record_turn(turn);
        Arc::make_mut(&mut self.turn_history).push(mv);
        self.stats.total_moves += 1;
        self.stats.last_move_at = Some(mv.at);
    }
}

/// Error building a game from a `GameSetup`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SetupError {
    /// Seat count outside 2..=4.
    #[display("A game needs 2 to 4 seats, got {count}")]
    InvalidSeatCount {
        /// Requested seats.
        count: usize,
    },
    /// Board side outside the supported range.
    #[display("Board size {size} is outside 3..=64")]
    InvalidBoardSize {
        /// Requested size.
        size: usize,
    },
    /// An inventory override names a seat that does not exist.
    #[display("Inventory given for missing seat {seat}")]
    UnknownSeat {
        /// Seat index.
        seat: usize,
    },
    /// An inventory names a piece outside the catalog.
    #[display("Piece {piece} is not in the catalog")]
    UnknownPiece {
        /// Offending piece.
        piece: PieceId,
    },
    /// An inventory lists the same piece twice.
    #[display("Piece {piece} appears twice in seat {seat}'s inventory")]
    DuplicatePiece {
        /// Seat index.
        seat: usize,
        /// Offending piece.
        piece: PieceId,
    },
}

/// Builder for a new game.
///
/// ```
/// use strictly_blokus::{GameSetup, GameStatus, SeatKind};
///
/// let state = GameSetup::new(vec![SeatKind::Human, SeatKind::Human])
///     .with_board_size(10)
///     .start(chrono::Utc::now())
///     .unwrap();
/// assert_eq!(state.status(), GameStatus::Playing);
/// assert_eq!(state.board().size(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Setters)]
#[setters(prefix = "with_")]
pub struct GameSetup {
    #[setters(skip)]
    seats: Vec<SeatKind>,
    #[setters(strip_option)]
    board_size: Option<usize>,
    powerups: bool,
    scoring: ScoringRule,
    #[setters(skip)]
    inventories: Vec<(usize, Vec<PieceId>)>,
}

impl GameSetup {
    /// Creates a setup for the given seats with default rules.
    #[instrument]
    pub fn new(seats: Vec<SeatKind>) -> Self {
        Self {
            seats,
            board_size: None,
            powerups: true,
            scoring: ScoringRule::default(),
            inventories: Vec::new(),
        }
    }

    /// Two human seats.
    pub fn two_player() -> Self {
        Self::new(vec![SeatKind::Human, SeatKind::Human])
    }

    /// Replaces one seat's starting inventory (the full catalog by default).
    pub fn with_inventory(mut self, seat: usize, pieces: impl IntoIterator<Item = PieceId>) -> Self {
        self.inventories.retain(|(s, _)| *s != seat);
        self.inventories.push((seat, pieces.into_iter().collect()));
        self
    }

    /// Board side used when none is set: 14 for two seats, 20 otherwise.
    pub fn default_board_size(seat_count: usize) -> usize {
        if seat_count == 2 { 14 } else { 20 }
    }

    /// Builds the game in `waiting`.
    #[instrument(skip(self), fields(seats = self.seats.len()))]
    pub fn build(self) -> Result<GameState, SetupError> {
        let count = self.seats.len();
        if !(MIN_SEATS..=MAX_SEATS).contains(&count) {
            return Err(SetupError::InvalidSeatCount { count });
        }
        let size = self
            .board_size
            .unwrap_or_else(|| Self::default_board_size(count));
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(SetupError::InvalidBoardSize { size });
        }

        let catalog = Catalog::standard();
        for (seat, pieces) in &self.inventories {
            if *seat >= count {
                return Err(SetupError::UnknownSeat { seat: *seat });
            }
            for (i, piece) in pieces.iter().enumerate() {
                if !catalog.contains(*piece) {
                    return Err(SetupError::UnknownPiece { piece: *piece });
                }
                if pieces[..i].contains(piece) {
                    return Err(SetupError::DuplicatePiece { seat: *seat, piece: *piece });
                }
            }
        }

        let mut board = Board::new(size);
        if self.powerups {
            for (pos, kind) in default_powerup_cells(size, count) {
                board.set_powerup(pos, Some(kind));
            }
        }

        let seats = self
            .seats
            .iter()
            .enumerate()
            .map(|(index, kind)| {
                match self.inventories.iter().find(|(s, _)| *s == index) {
                    Some((_, pieces)) => Seat::new(index, *kind, pieces.iter().copied()),
                    None => Seat::new(index, *kind, catalog.ids()),
                }
            })
            .collect();

        info!(size, seats = count, powerups = self.powerups, "Game created");
        Ok(GameState {
            board,
            seats: Arc::new(seats),
            current_player: 0,
            turn_history: Arc::new(Vec::new()),
            stats: GameStats::default(),
            status: GameStatus::Waiting,
            winner: None,
            scoring: self.scoring,
            standings: None,
        })
    }

    /// Builds the game and moves it straight to `playing`.
    pub fn start(self, at: DateTime<Utc>) -> Result<GameState, SetupError> {
        Ok(self.build()?.begin(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_defaults() {
        let state = GameSetup::two_player().build().unwrap();
        assert_eq!(state.status(), GameStatus::Waiting);
        assert_eq!(state.board().size(), 14);
        assert_eq!(state.seats().len(), 2);
        assert_eq!(state.seats()[1].pieces().len(), 21);
        assert_eq!(state.board().powerup_cells().len(), 2);
    }

    #[test]
    fn test_four_seats_default_to_twenty() {
        let state = GameSetup::new(vec![SeatKind::Human; 4]).build().unwrap();
        assert_eq!(state.board().size(), 20);
        assert!(state.board().powerup_cells().is_empty());
        assert_eq!(state.start_corner(2), BoardPosition::new(19, 19));
    }

    #[test]
    fn test_rejects_bad_setups() {
        assert_eq!(
            GameSetup::new(vec![SeatKind::Human]).build(),
            Err(SetupError::InvalidSeatCount { count: 1 })
        );
        assert_eq!(
            GameSetup::two_player().with_board_size(2).build(),
            Err(SetupError::InvalidBoardSize { size: 2 })
        );
        assert_eq!(
            GameSetup::two_player().with_inventory(5, [PieceId::new(0)]).build(),
            Err(SetupError::UnknownSeat { seat: 5 })
        );
        assert_eq!(
            GameSetup::two_player().with_inventory(0, [PieceId::new(40)]).build(),
            Err(SetupError::UnknownPiece { piece: PieceId::new(40) })
        );
        assert_eq!(
            GameSetup::two_player()
                .with_inventory(1, [PieceId::new(2), PieceId::new(2)])
                .build(),
            Err(SetupError::DuplicatePiece { seat: 1, piece: PieceId::new(2) })
        );
    }

    #[test]
    fn test_powerups_can_be_disabled() {
        let state = GameSetup::two_player().with_powerups(false).build().unwrap();
        assert!(state.board().powerup_cells().is_empty());
    }

    #[test]
    fn test_clone_shares_storage() {
        let state = GameSetup::two_player().build().unwrap();
        let copy = state.clone();
        assert!(copy.board().shares_storage_with(state.board()));
        assert!(Arc::ptr_eq(&copy.seats, &state.seats));
    }
}
