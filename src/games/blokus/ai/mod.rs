//! AI move search.
//!
//! The search is synchronous and reads a frozen snapshot. Randomness comes
//! from the caller's `Rng`, so a seeded generator replays the same game.

pub mod heuristic;

pub use heuristic::{corners_created, placement_score};

use super::GameState;
use super::action::{MoveSubmission, Placement};
use super::pieces::Catalog;
use super::rules::{Opening, count_legal_placements};
use super::types::Board;
use derive_getters::Getters;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// AI strength tier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Difficulty {
    /// Uniform choice among all legal placements.
    #[default]
    Easy,
    /// Random choice among the best few by heuristic.
    Medium,
    /// Heuristic plus opponent blocking and own mobility.
    Hard,
}

/// How much work a tier spends per decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    /// Candidates kept after heuristic ranking; `None` skips ranking.
    pub shortlist: Option<usize>,
    /// Whether shortlisted candidates are re-scored by mobility lookahead.
    pub mobility: bool,
}

impl Difficulty {
    /// The search budget for this tier.
    pub fn budget(self) -> SearchBudget {
        match self {
            Difficulty::Easy => SearchBudget { shortlist: None, mobility: false },
            Difficulty::Medium => SearchBudget { shortlist: Some(3), mobility: false },
            Difficulty::Hard => SearchBudget { shortlist: Some(16), mobility: true },
        }
    }
}

/// Caller-owned token for one search at a time.
///
/// `find_move` borrows it mutably, so a second search cannot run on the
/// same token while one is in progress.
#[derive(Debug, Clone, Default, Getters)]
pub struct SearchInFlight {
    /// Searches completed with this token.
    searches: u64,
    /// Legal placements seen by the most recent search.
    last_candidates: usize,
}

impl SearchInFlight {
    /// A fresh token.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Picks a placement for `seat`, or `None` when it has no legal placement.
///
/// `None` means the caller should submit a pass.
#[instrument(skip(state, rng, token), fields(move_count = state.move_count()))]
pub fn find_move(
    state: &GameState,
    seat: usize,
    difficulty: Difficulty,
    rng: &mut impl Rng,
    token: &mut SearchInFlight,
) -> Option<MoveSubmission> {
    let candidates = state.legal_placements_for(seat);
    token.searches += 1;
    token.last_candidates = candidates.len();
    if candidates.is_empty() {
        debug!(seat, "No legal placement, pass required");
        return None;
    }

    let budget = difficulty.budget();
    let chosen = match budget.shortlist {
        None => candidates[rng.random_range(0..candidates.len())],
        Some(keep) => {
            let shortlist = shortlist(state, seat, candidates, keep);
            if budget.mobility {
                best_by_lookahead(state, seat, &shortlist, rng)
            } else {
                shortlist[rng.random_range(0..shortlist.len())].0
            }
        }
    };

    debug!(seat, %difficulty, placement = %chosen, "Move chosen");
    Some(MoveSubmission::place(chosen))
}

/// The `keep` best candidates by heuristic, with their scores.
///
/// The sort is stable, so equal scores keep enumeration order.
fn shortlist(
    state: &GameState,
    seat: usize,
    candidates: Vec<Placement>,
    keep: usize,
) -> Vec<(Placement, i32)> {
    let catalog = Catalog::standard();
    let mut scored: Vec<(Placement, i32)> = candidates
        .into_iter()
        .filter_map(|p| {
            let cells = p.cells(catalog)?;
            Some((p, placement_score(state.board(), &cells, seat)))
        })
        .collect();
    scored.sort_by_key(|(_, score)| std::cmp::Reverse(*score));
    scored.truncate(keep.max(1));
    scored
}

/// Re-scores the shortlist by how much each placement blocks opponents and
/// how much room it leaves the seat, then picks the best.
fn best_by_lookahead(
    state: &GameState,
    seat: usize,
    shortlist: &[(Placement, i32)],
    rng: &mut impl Rng,
) -> Placement {
    let catalog = Catalog::standard();
    let opponents: Vec<usize> = (0..state.seats().len()).filter(|&s| s != seat).collect();
    let opponent_mobility = |board: &Board| -> i32 {
        opponents
            .iter()
            .map(|&o| count_legal_placements(board, &state.seats()[o], state.opening_for(o)) as i32)
            .sum()
    };
    let before = opponent_mobility(state.board());

    let scored: Vec<(Placement, i32)> = shortlist
        .iter()
        .filter_map(|&(placement, base)| {
            let cells = placement.cells(catalog)?;
            let after = state.board().with_owned(&cells, seat, placement.piece);
            let mut own = state.seats()[seat].clone();
            own.mark_used(placement.piece);
            let own_mobility = count_legal_placements(&after, &own, Opening::Continuation) as i32;
            let blocked = before - opponent_mobility(&after);
            Some((placement, base + 2 * blocked + own_mobility))
        })
        .collect();

    let best = scored.iter().map(|(_, s)| *s).max().unwrap_or(i32::MIN);
    let ties: Vec<Placement> = scored
        .iter()
        .filter(|(_, s)| *s == best)
        .map(|(p, _)| *p)
        .collect();
    match ties.len() {
        0 => shortlist[0].0,
        n => ties[rng.random_range(0..n)],
    }
}
