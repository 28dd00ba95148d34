//! Pure shape geometry for polyomino pieces.
//!
//! Shapes are normalized cell lists. Rotation and mirroring are total
//! functions over finite grids; composing them yields the 8 orientations
//! of a piece. Nothing here knows about seats, turns or inventories.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A cell coordinate on the board (row-major, origin at the top-left).
///
/// Coordinates are signed so that a footprint hanging off the board edge
/// can still be described, then rejected by the bounds check.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_new::new,
)]
pub struct BoardPosition {
    /// Row index, 0 at the top.
    pub row: i32,
    /// Column index, 0 at the left.
    pub col: i32,
}

impl BoardPosition {
    /// Returns this position shifted by the given deltas.
    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }

    /// The four cells sharing a side with this one.
    pub fn edge_neighbors(self) -> [BoardPosition; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }

    /// The four cells touching this one only at a corner.
    pub fn corner_neighbors(self) -> [BoardPosition; 4] {
        [
            self.offset(-1, -1),
            self.offset(-1, 1),
            self.offset(1, -1),
            self.offset(1, 1),
        ]
    }
}

impl std::fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// An immutable piece shape: a normalized, sorted set of `(row, col)` offsets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Shape {
    cells: Vec<(i32, i32)>,
}

impl Shape {
    /// Builds a shape from arbitrary offsets, normalizing to a top-left origin.
    pub fn from_cells(cells: impl IntoIterator<Item = (i32, i32)>) -> Self {
        let mut cells: Vec<(i32, i32)> = cells.into_iter().collect();
        let min_row = cells.iter().map(|c| c.0).min().unwrap_or(0);
        let min_col = cells.iter().map(|c| c.1).min().unwrap_or(0);
        for cell in &mut cells {
            cell.0 -= min_row;
            cell.1 -= min_col;
        }
        cells.sort_unstable();
        cells.dedup();
        Self { cells }
    }

    /// Builds a shape from a textual mask where `#` marks a filled cell.
    ///
    /// ```
    /// use strictly_blokus::Shape;
    ///
    /// let z = Shape::from_mask(&["##.", ".##"]);
    /// assert_eq!(z.len(), 4);
    /// ```
    pub fn from_mask(rows: &[&str]) -> Self {
        Self::from_cells(rows.iter().enumerate().flat_map(|(r, line)| {
            line.chars()
                .enumerate()
                .filter(|(_, ch)| *ch == '#')
                .map(move |(c, _)| (r as i32, c as i32))
        }))
    }

    /// The normalized offsets, sorted row-major.
    pub fn cells(&self) -> &[(i32, i32)] {
        &self.cells
    }

    /// Number of cells the shape covers.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true for the degenerate empty shape.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Height of the bounding box.
    pub fn height(&self) -> i32 {
        self.cells.iter().map(|c| c.0 + 1).max().unwrap_or(0)
    }

    /// Width of the bounding box.
    pub fn width(&self) -> i32 {
        self.cells.iter().map(|c| c.1 + 1).max().unwrap_or(0)
    }

    /// Renders the shape back into mask rows.
    pub fn to_mask(&self) -> Vec<String> {
        (0..self.height())
            .map(|r| {
                (0..self.width())
                    .map(|c| if self.cells.contains(&(r, c)) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}

/// Rotates a shape a quarter turn clockwise.
#[instrument(level = "trace")]
pub fn rotate90(shape: &Shape) -> Shape {
    Shape::from_cells(shape.cells.iter().map(|&(r, c)| (c, -r)))
}

/// Mirrors a shape left-to-right.
#[instrument(level = "trace")]
pub fn flip_horizontal(shape: &Shape) -> Shape {
    Shape::from_cells(shape.cells.iter().map(|&(r, c)| (r, -c)))
}

/// One of the 8 rotation/mirror combinations of a shape.
///
/// Applying an orientation mirrors first (when `flipped`) and then rotates
/// clockwise `rotation` quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "RawOrientation")]
pub struct Orientation {
    rotation: u8,
    flipped: bool,
}

/// Orientation as it arrives on the wire, before the rotation is reduced.
#[derive(Deserialize)]
struct RawOrientation {
    #[serde(default)]
    rotation: u8,
    #[serde(default)]
    flipped: bool,
}

impl From<RawOrientation> for Orientation {
    fn from(raw: RawOrientation) -> Self {
        Self::new(raw.rotation, raw.flipped)
    }
}

impl Orientation {
    /// The untransformed orientation.
    pub const IDENTITY: Orientation = Orientation {
        rotation: 0,
        flipped: false,
    };

    /// All 8 orientations, unflipped first.
    pub const ALL: [Orientation; 8] = [
        Orientation { rotation: 0, flipped: false },
        Orientation { rotation: 1, flipped: false },
        Orientation { rotation: 2, flipped: false },
        Orientation { rotation: 3, flipped: false },
        Orientation { rotation: 0, flipped: true },
        Orientation { rotation: 1, flipped: true },
        Orientation { rotation: 2, flipped: true },
        Orientation { rotation: 3, flipped: true },
    ];

    /// Creates an orientation; rotation is taken modulo 4.
    pub fn new(rotation: u8, flipped: bool) -> Self {
        Self {
            rotation: rotation % 4,
            flipped,
        }
    }

    /// Clockwise quarter turns (0-3).
    pub fn rotation(self) -> u8 {
        self.rotation % 4
    }

    /// Whether the shape is mirrored before rotating.
    pub fn is_flipped(self) -> bool {
        self.flipped
    }

    /// The orientation reached by rotating the oriented shape once more.
    pub fn rotated(self) -> Self {
        Self::new(self.rotation() + 1, self.flipped)
    }

    /// The orientation reached by mirroring the oriented shape.
    ///
    /// Mirroring after `r` clockwise turns equals mirroring first and then
    /// turning `r` times counter-clockwise.
    pub fn flipped(self) -> Self {
        Self::new((4 - self.rotation()) % 4, !self.flipped)
    }

    /// Applies this orientation to a base shape.
    pub fn apply(self, shape: &Shape) -> Shape {
        let mut out = if self.flipped {
            flip_horizontal(shape)
        } else {
            shape.clone()
        };
        for _ in 0..self.rotation() {
            out = rotate90(&out);
        }
        out
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.rotation() as u32 * 90)?;
        if self.flipped {
            write!(f, "+flip")?;
        }
        Ok(())
    }
}

/// Board cells covered by `shape` when its top-left offset sits at `origin`.
pub fn cells_occupied(shape: &Shape, origin: BoardPosition) -> Vec<BoardPosition> {
    shape
        .cells
        .iter()
        .map(|&(r, c)| origin.offset(r, c))
        .collect()
}

/// Read access to cell ownership, as needed by the adjacency tests.
pub trait OwnerLookup {
    /// The seat owning the cell, or `None` when empty, blocked or off-board.
    fn owner_at(&self, pos: BoardPosition) -> Option<usize>;
}

/// True when any of `cells` touches a cell owned by `seat` diagonally.
pub fn touches_corner(cells: &[BoardPosition], owners: &impl OwnerLookup, seat: usize) -> bool {
    cells.iter().any(|cell| {
        cell.corner_neighbors()
            .iter()
            .any(|n| owners.owner_at(*n) == Some(seat))
    })
}

/// True when any of `cells` shares a side with a cell owned by `seat`.
pub fn touches_edge(cells: &[BoardPosition], owners: &impl OwnerLookup, seat: usize) -> bool {
    first_edge_contact(cells, owners, seat).is_some()
}

/// The first of `cells` sharing a side with a cell owned by `seat`.
pub(crate) fn first_edge_contact(
    cells: &[BoardPosition],
    owners: &impl OwnerLookup,
    seat: usize,
) -> Option<BoardPosition> {
    cells.iter().copied().find(|cell| {
        cell.edge_neighbors()
            .iter()
            .any(|n| owners.owner_at(*n) == Some(seat))
    })
}
