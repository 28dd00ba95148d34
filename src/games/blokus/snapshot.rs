//! Versioned snapshot boundary.
//!
//! Snapshots cross the boundary as JSON envelopes. Parsing never trusts
//! the payload: the version is checked first, then the structure, then the
//! game invariants.

use super::GameState;
use super::invariants::{GameInvariants, InvariantSet};
use super::pieces::Catalog;
use super::state::{MAX_BOARD_SIZE, MAX_SEATS, MIN_BOARD_SIZE, MIN_SEATS, RawGameState};
use super::types::{GameStatus, Occupant};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Envelope version this build reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

/// A snapshot with its schema version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEnvelope {
    /// Schema of `game`.
    pub schema_version: u32,
    /// Full game state.
    pub game: GameState,
}

/// Envelope whose game has not been checked yet.
#[derive(Deserialize)]
struct RawEnvelope {
    game: RawGameState,
}

impl SnapshotEnvelope {
    /// Wraps a state at the current schema version.
    pub fn new(game: GameState) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            game,
        }
    }
}

/// Why a snapshot was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SnapshotErrorKind {
    /// Not JSON, or not shaped like an envelope.
    #[display("malformed")]
    Malformed,
    /// Envelope written by an unknown schema.
    #[display("unsupported version {_0}")]
    UnsupportedVersion(u64),
    /// Fields are individually valid but inconsistent with each other.
    #[display("structure")]
    Structure,
    /// The game fails an invariant.
    #[display("invariant")]
    Invariant,
}

/// Snapshot parse error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Snapshot error ({}): {} at {}:{}", kind, message, file, line)]
pub struct SnapshotError {
    /// Failure category.
    pub kind: SnapshotErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SnapshotError {
    /// Creates a new snapshot error with caller location tracking.
    #[track_caller]
    pub fn new(kind: SnapshotErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(SnapshotErrorKind::Malformed, format!("JSON error: {}", err))
    }
}

/// Serializes a state as a versioned JSON envelope.
#[instrument(skip(game), fields(move_count = game.move_count()))]
pub fn to_snapshot_json(game: &GameState) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(&SnapshotEnvelope::new(game.clone()))?)
}

/// Parses and validates a JSON envelope.
#[instrument(skip(json), fields(bytes = json.len()))]
pub fn parse_snapshot(json: &str) -> Result<GameState, SnapshotError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let version = value
        .get("schema_version")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| SnapshotError::new(SnapshotErrorKind::Malformed, "Missing schema_version"))?;
    if version != u64::from(SCHEMA_VERSION) {
        warn!(version, "Unsupported snapshot version");
        return Err(SnapshotError::new(
            SnapshotErrorKind::UnsupportedVersion(version),
            format!("Expected schema version {}", SCHEMA_VERSION),
        ));
    }

    let envelope: RawEnvelope = serde_json::from_value(value)?;
    let game = GameState::try_from(envelope.game)?;
    debug!(move_count = game.move_count(), "Snapshot accepted");
    Ok(game)
}

impl TryFrom<RawGameState> for GameState {
    type Error = SnapshotError;

    fn try_from(raw: RawGameState) -> Result<Self, Self::Error> {
        let game = raw.into_unchecked();
        check_structure(&game)?;

        if let Err(violations) = GameInvariants::check_all(&game) {
            let message = violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            warn!(%message, "Snapshot violates invariants");
            return Err(SnapshotError::new(SnapshotErrorKind::Invariant, message));
        }
        Ok(game)
    }
}

fn structure(message: impl Into<String>) -> SnapshotError {
    SnapshotError::new(SnapshotErrorKind::Structure, message)
}

/// Range and cross-reference checks that serde cannot express.
fn check_structure(game: &GameState) -> Result<(), SnapshotError> {
    let catalog = Catalog::standard();
    let size = game.board().size();
    let seats = game.seats().len();

    if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        return Err(structure(format!("Board size {} out of range", size)));
    }
    if game.board().cells().len() != size * size {
        return Err(structure(format!(
            "Board has {} cells, expected {}",
            game.board().cells().len(),
            size * size
        )));
    }
    if !(MIN_SEATS..=MAX_SEATS).contains(&seats) {
        return Err(structure(format!("{} seats out of range", seats)));
    }
    if game.current_player() >= seats {
        return Err(structure(format!("Current player {} out of range", game.current_player())));
    }
    if let Some(winner) = game.winner()
        && winner >= seats
    {
        return Err(structure(format!("Winner {} out of range", winner)));
    }
    if game.status() == GameStatus::Finished && game.standings().is_none() {
        return Err(structure("Finished game without standings"));
    }

    for (index, seat) in game.seats().iter().enumerate() {
        if seat.index() != index {
            return Err(structure(format!("Seat {} stored at position {}", seat.index(), index)));
        }
        for (i, slot) in seat.pieces().iter().enumerate() {
            if !catalog.contains(slot.id) {
                return Err(structure(format!("Seat {} holds unknown piece {}", index, slot.id)));
            }
            if seat.pieces()[..i].iter().any(|s| s.id == slot.id) {
                return Err(structure(format!("Seat {} holds piece {} twice", index, slot.id)));
            }
        }
    }

    for cell in game.board().cells() {
        if let Occupant::Owned { seat, piece } = cell.occupant
            && (seat >= seats || !catalog.contains(piece))
        {
            return Err(structure(format!("Cell owned by seat {} with piece {}", seat, piece)));
        }
    }

    if let Some(mv) = game.turn_history().iter().find(|mv| mv.seat >= seats) {
        return Err(structure(format!("Move by unknown seat {}", mv.seat)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::blokus::action::MoveSubmission;
    use crate::games::blokus::geometry::{BoardPosition, Orientation};
    use crate::games::blokus::pieces::PieceId;
    use crate::games::blokus::state::GameSetup;
    use chrono::Utc;

    fn played() -> GameState {
        let game = GameSetup::two_player().start(Utc::now()).unwrap();
        game.submit(
            0,
            MoveSubmission::Place {
                piece_id: PieceId::new(9),
                position: BoardPosition::new(0, 0),
                orientation: Orientation::IDENTITY,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let game = played();
        let json = to_snapshot_json(&game).unwrap();
        assert_eq!(parse_snapshot(&json).unwrap(), game);
    }

    #[test]
    fn test_rejects_garbage() {
        let err = parse_snapshot("not json").unwrap_err();
        assert_eq!(err.kind, SnapshotErrorKind::Malformed);
    }

    #[test]
    fn test_rejects_future_version() {
        let mut value: serde_json::Value =
            serde_json::from_str(&to_snapshot_json(&played()).unwrap()).unwrap();
        value["schema_version"] = serde_json::json!(2);
        let err = parse_snapshot(&value.to_string()).unwrap_err();
        assert_eq!(err.kind, SnapshotErrorKind::UnsupportedVersion(2));
    }

    #[test]
    fn test_rejects_out_of_range_current_player() {
        let mut value: serde_json::Value =
            serde_json::from_str(&to_snapshot_json(&played()).unwrap()).unwrap();
        value["game"]["current_player"] = serde_json::json!(7);
        let err = parse_snapshot(&value.to_string()).unwrap_err();
        assert_eq!(err.kind, SnapshotErrorKind::Structure);
    }

    #[test]
    fn test_rejects_truncated_board() {
        let mut value: serde_json::Value =
            serde_json::from_str(&to_snapshot_json(&played()).unwrap()).unwrap();
        value["game"]["board"]["cells"]
            .as_array_mut()
            .unwrap()
            .pop();
        let err = parse_snapshot(&value.to_string()).unwrap_err();
        assert_eq!(err.kind, SnapshotErrorKind::Structure);
    }

    #[test]
    fn test_direct_decode_validates() {
        let mut value = serde_json::to_value(played()).unwrap();
        value["board"]["cells"].as_array_mut().unwrap().truncate(10);
        let err = serde_json::from_value::<GameState>(value).unwrap_err();
        assert!(err.to_string().contains("structure"));

        let mut value = serde_json::to_value(SnapshotEnvelope::new(played())).unwrap();
        value["game"]["stats"]["total_moves"] = serde_json::json!(5);
        assert!(serde_json::from_value::<SnapshotEnvelope>(value).is_err());

        let game = played();
        let value = serde_json::to_value(&game).unwrap();
        assert_eq!(serde_json::from_value::<GameState>(value).unwrap(), game);
    }

    #[test]
    fn test_rejects_invariant_breach() {
        let mut value: serde_json::Value =
            serde_json::from_str(&to_snapshot_json(&played()).unwrap()).unwrap();
        value["game"]["stats"]["total_moves"] = serde_json::json!(5);
        let err = parse_snapshot(&value.to_string()).unwrap_err();
        assert_eq!(err.kind, SnapshotErrorKind::Invariant);
    }
}
