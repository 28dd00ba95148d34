//! Strictly Blokus - a Blokus-style game-state engine
//!
//! This library validates and applies piece placements, advances turns,
//! scores finished games and searches for AI moves. It performs no I/O:
//! every transition maps one immutable [`GameState`] to the next.
//!
//! # Architecture
//!
//! - **Geometry**: shapes, the eight orientations, adjacency tests
//! - **Rules**: placement validation, legal-move enumeration, scoring
//! - **Flow**: turn advancement, forced passes, termination
//! - **Powerups**: marked cells, collection, the blocker effect
//! - **AI**: move search by difficulty tier with injected randomness
//! - **Boundary**: versioned snapshots and the local/remote [`Replica`]
//!
//! # Example
//!
//! ```
//! use strictly_blokus::{BoardPosition, GameSetup, MoveSubmission, Orientation, PieceId};
//!
//! let game = GameSetup::two_player().start(chrono::Utc::now())?;
//! let next = game.submit(
//!     0,
//!     MoveSubmission::Place {
//!         piece_id: PieceId::new(9),
//!         position: BoardPosition::new(0, 0),
//!         orientation: Orientation::IDENTITY,
//!     },
//!     chrono::Utc::now(),
//! )?;
//! assert_eq!(next.current_player(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod games;

// Crate-level exports - Configuration
pub use config::{ConfigError, MatchConfig};

// Crate-level exports - Geometry
pub use games::blokus::{
    BoardPosition, Orientation, OwnerLookup, Shape, cells_occupied, flip_horizontal, rotate90,
    touches_corner, touches_edge,
};

// Crate-level exports - Pieces and board
pub use games::blokus::{
    Board, Catalog, Cell, GameStats, GameStatus, Occupant, Piece, PieceId, PieceSlot, Seat,
    SeatKind,
};

// Crate-level exports - Moves and rules
pub use games::blokus::{
    Move, MoveKind, MoveSubmission, Opening, Placement, Rejection, ScoringRule, commit_placement,
    count_legal_placements, has_legal_placement, legal_placements, validate_placement,
    winner_by_penalty,
};

// Crate-level exports - Game state
pub use games::blokus::{GameSetup, GameState, Outcome, SetupError, TurnDraft};

// Crate-level exports - Contracts
pub use games::blokus::{
    Contract, GameInvariants, Invariant, InvariantSet, InvariantViolation, MoveContract,
    SeatAction,
};

// Crate-level exports - Powerups
pub use games::blokus::{PowerupKind, collect_powerups, default_powerup_cells};

// Crate-level exports - AI
pub use games::blokus::{Difficulty, SearchBudget, SearchInFlight, find_move};

// Crate-level exports - Snapshot boundary
pub use games::blokus::{
    DEFAULT_UNDO_DEPTH, RemoteUpdate, Replica, ReplicaError, SCHEMA_VERSION, SnapshotEnvelope,
    SnapshotError, SnapshotErrorKind, parse_snapshot, to_snapshot_json,
};
