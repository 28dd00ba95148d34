//! Blokus-style tile placement.
//!
//! Seats take turns placing polyomino pieces on a square board. A piece
//! must touch its own colour only at corners, and a seat's first piece
//! must cover its starting corner. Seats without a legal placement are
//! skipped; the game ends when nobody can place.
//!
//! # Architecture
//!
//! - **Geometry**: shapes, orientations and adjacency tests
//! - **Rules**: placement validation, enumeration and scoring
//! - **Flow**: the transitions on [`GameState`]
//! - **Contracts**: pre/postconditions wrapped around every transition
//! - **AI**: move search by difficulty tier
//! - **Snapshot / Replica**: the boundary with external storage

pub mod action;
pub mod ai;
pub mod contracts;
pub mod draft;
pub mod flow;
pub mod geometry;
pub mod invariants;
pub mod pieces;
pub mod powerups;
pub mod replica;
pub mod rules;
pub mod snapshot;
pub mod state;
pub mod types;

pub use action::{Move, MoveKind, MoveSubmission, Placement, Rejection};
pub use ai::{Difficulty, SearchBudget, SearchInFlight, find_move};
pub use contracts::{Contract, MoveContract, SeatAction};
pub use draft::TurnDraft;
pub use flow::Outcome;
pub use geometry::{
    BoardPosition, Orientation, OwnerLookup, Shape, cells_occupied, flip_horizontal, rotate90,
    touches_corner, touches_edge,
};
pub use invariants::{GameInvariants, Invariant, InvariantSet, InvariantViolation};
pub use pieces::{Catalog, Piece, PieceId};
pub use powerups::{PowerupKind, collect_powerups, default_powerup_cells};
pub use replica::{DEFAULT_UNDO_DEPTH, RemoteUpdate, Replica, ReplicaError};
pub use rules::{
    Opening, ScoringRule, commit_placement, count_legal_placements, has_legal_placement,
    legal_placements, validate_placement, winner_by_penalty,
};
pub use snapshot::{
    SCHEMA_VERSION, SnapshotEnvelope, SnapshotError, SnapshotErrorKind, parse_snapshot,
    to_snapshot_json,
};
pub use state::{GameSetup, GameState, SetupError};
pub use types::{Board, Cell, GameStats, GameStatus, Occupant, PieceSlot, Seat, SeatKind};
