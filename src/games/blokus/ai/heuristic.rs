//! Static evaluation of a single placement.

use super::super::geometry::{BoardPosition, OwnerLookup};
use super::super::types::Board;
use std::collections::BTreeSet;

/// Weight of each covered cell.
pub const CELL_WEIGHT: i32 = 10;

/// Weight of each new corner anchor the placement opens.
pub const CORNER_WEIGHT: i32 = 3;

/// Scores a placement by size, centrality and the anchors it opens.
///
/// `board` is the position before the placement; `cells` is the footprint.
/// Distances use doubled coordinates so even-sized boards keep an integer
/// centre.
pub fn placement_score(board: &Board, cells: &[BoardPosition], seat: usize) -> i32 {
    let size = board.size() as i32;
    let centre_distance = cells
        .iter()
        .map(|c| (2 * c.row - (size - 1)).abs() + (2 * c.col - (size - 1)).abs())
        .min()
        .unwrap_or(0);

    CELL_WEIGHT * cells.len() as i32 - centre_distance
        + CORNER_WEIGHT * corners_created(board, cells, seat) as i32
}

/// Number of empty cells that become corner anchors for `seat`.
pub fn corners_created(board: &Board, cells: &[BoardPosition], seat: usize) -> usize {
    let owned_after = |pos: BoardPosition| {
        cells.contains(&pos) || board.owner_at(pos) == Some(seat)
    };
    let candidates: BTreeSet<BoardPosition> = cells
        .iter()
        .flat_map(|c| c.corner_neighbors())
        .filter(|pos| board.is_empty_at(*pos) && !cells.contains(pos))
        .collect();
    candidates
        .into_iter()
        .filter(|pos| !pos.edge_neighbors().into_iter().any(owned_after))
        .count()
}
