//! The piece catalog.
//!
//! Every seat draws its inventory from the same immutable catalog. A piece
//! precomputes its distinct orientations once, so symmetric pieces are not
//! enumerated twice by move generation.

use super::geometry::{Orientation, Shape};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::instrument;

/// Identifier of a piece template in the catalog.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[display("#{_0}")]
#[serde(transparent)]
pub struct PieceId(u8);

impl PieceId {
    /// Wraps a raw catalog index.
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Index into the catalog.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An immutable shape template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    name: &'static str,
    shape: Shape,
    orientations: Vec<(Orientation, Shape)>,
}

impl Piece {
    fn new(id: u8, name: &'static str, mask: &[&str]) -> Self {
        let shape = Shape::from_mask(mask);
        let mut orientations: Vec<(Orientation, Shape)> = Vec::with_capacity(8);
        for orientation in Orientation::ALL {
            let oriented = orientation.apply(&shape);
            if !orientations.iter().any(|(_, seen)| *seen == oriented) {
                orientations.push((orientation, oriented));
            }
        }
        Self {
            id: PieceId::new(id),
            name,
            shape,
            orientations,
        }
    }

    /// Catalog identifier.
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// Conventional short name (`I1`, `X5`, ...).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The base shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Number of cells the piece covers.
    pub fn size(&self) -> usize {
        self.shape.len()
    }

    /// Distinct orientations, each with the first `Orientation` producing it.
    pub fn orientations(&self) -> &[(Orientation, Shape)] {
        &self.orientations
    }

    /// The shape under an arbitrary orientation.
    pub fn oriented(&self, orientation: Orientation) -> Shape {
        self.orientations
            .iter()
            .find(|(o, _)| *o == orientation)
            .map(|(_, s)| s.clone())
            .unwrap_or_else(|| orientation.apply(&self.shape))
    }
}

/// The full set of piece templates available to every seat.
#[derive(Debug, Clone)]
pub struct Catalog {
    pieces: Vec<Piece>,
}

static STANDARD: LazyLock<Catalog> = LazyLock::new(Catalog::build_standard);

impl Catalog {
    /// The standard 21-piece set (one monomino through the twelve pentominoes).
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    #[instrument]
    fn build_standard() -> Self {
        let pieces = vec![
            Piece::new(0, "I1", &["#"]),
            Piece::new(1, "I2", &["##"]),
            Piece::new(2, "I3", &["###"]),
            Piece::new(3, "V3", &["#.", "##"]),
            Piece::new(4, "I4", &["####"]),
            Piece::new(5, "O4", &["##", "##"]),
            Piece::new(6, "T4", &["###", ".#."]),
            Piece::new(7, "L4", &["###", "#.."]),
            Piece::new(8, "Z4", &["##.", ".##"]),
            Piece::new(9, "I5", &["#####"]),
            Piece::new(10, "L5", &["####", "#..."]),
            Piece::new(11, "Y5", &["####", ".#.."]),
            Piece::new(12, "N5", &["##..", ".###"]),
            Piece::new(13, "P5", &["##", "##", "#."]),
            Piece::new(14, "U5", &["#.#", "###"]),
            Piece::new(15, "V5", &["#..", "#..", "###"]),
            Piece::new(16, "W5", &["#..", "##.", ".##"]),
            Piece::new(17, "Z5", &["##.", ".#.", ".##"]),
            Piece::new(18, "T5", &["###", ".#.", ".#."]),
            Piece::new(19, "F5", &[".##", "##.", ".#."]),
            Piece::new(20, "X5", &[".#.", "###", ".#."]),
        ];
        Self { pieces }
    }

    /// Looks up a piece by id.
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    /// Returns true when `id` names a catalog piece.
    pub fn contains(&self, id: PieceId) -> bool {
        self.get(id).is_some()
    }

    /// All pieces in id order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// All piece ids in order.
    pub fn ids(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.pieces.iter().map(Piece::id)
    }

    /// Cell count of a piece, zero for unknown ids.
    pub fn size_of(&self, id: PieceId) -> usize {
        self.get(id).map_or(0, Piece::size)
    }

    /// The first piece with the most cells.
    pub fn largest(&self) -> &Piece {
        self.pieces
            .iter()
            .rev()
            .max_by_key(|p| p.size())
            .unwrap_or(&self.pieces[0])
    }
}
