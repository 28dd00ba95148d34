//! Caller-side arbiter between local moves and remote snapshots.
//!
//! A `Replica` holds the last authoritative snapshot and at most one local
//! move that has not been confirmed yet. Remote snapshots are full
//! replacements; one with at least as many moves as the local view wins.

use super::GameState;
use super::action::{MoveSubmission, Rejection};
use chrono::{DateTime, Utc};
use derive_more::{Display, Error};
use std::collections::VecDeque;
use tracing::{debug, info, instrument, warn};

/// Why a local proposal was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ReplicaError {
    /// A previous local move is still unconfirmed.
    #[display("A local move is already pending")]
    Pending,
    /// The engine rejected the move.
    #[display("Move rejected: {_0}")]
    Rejected(Rejection),
}

/// Snapshots kept for `undo` unless the caller picks another limit.
pub const DEFAULT_UNDO_DEPTH: usize = 64;

/// What happened to an incoming remote snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteUpdate {
    /// Matched the pending local move.
    Confirmed,
    /// Replaced the authoritative state; nothing was pending.
    Accepted,
    /// Replaced the authoritative state and dropped the pending move.
    DiscardedLocal,
    /// Older than the local view; ignored.
    Stale,
}

/// Local view of a shared game.
#[derive(Debug, Clone)]
pub struct Replica {
    authoritative: GameState,
    pending: Option<GameState>,
    undo: VecDeque<GameState>,
    undo_limit: usize,
}

impl Replica {
    /// Starts from an authoritative snapshot.
    pub fn new(authoritative: GameState) -> Self {
        Self {
            authoritative,
            pending: None,
            undo: VecDeque::new(),
            undo_limit: DEFAULT_UNDO_DEPTH,
        }
    }

    /// Keeps at most `limit` snapshots for `undo`; the oldest go first.
    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.undo_limit = limit;
        self.trim_undo();
        self
    }

    /// The state to show: the pending move if any, else the authoritative one.
    pub fn view(&self) -> &GameState {
        self.pending.as_ref().unwrap_or(&self.authoritative)
    }

    /// Last authoritative snapshot.
    pub fn authoritative(&self) -> &GameState {
        &self.authoritative
    }

    /// Snapshot to hand to the adapter for broadcast.
    pub fn outbound(&self) -> Option<&GameState> {
        self.pending.as_ref()
    }

    /// Number of snapshots `undo` can step back through.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Applies a local move on top of the authoritative snapshot.
    #[instrument(skip(self), fields(move_count = self.authoritative.move_count()))]
    pub fn propose(
        &mut self,
        seat: usize,
        submission: MoveSubmission,
        at: DateTime<Utc>,
    ) -> Result<&GameState, ReplicaError> {
        if self.pending.is_some() {
            warn!(seat, "Proposal while a move is pending");
            return Err(ReplicaError::Pending);
        }
        let next = self
            .authoritative
            .submit(seat, submission, at)
            .map_err(ReplicaError::Rejected)?;
        Ok(self.pending.insert(next))
    }

    /// Promotes the pending move to authoritative without a remote echo.
    pub fn settle(&mut self) -> bool {
        match self.pending.take() {
            Some(next) => {
                self.replace_authoritative(next);
                true
            }
            None => false,
        }
    }

    /// Takes in a full remote snapshot.
    #[instrument(skip(self, remote), fields(remote = remote.move_count(), local = self.view().move_count()))]
    pub fn receive_remote(&mut self, remote: GameState) -> RemoteUpdate {
        if remote.move_count() < self.view().move_count() {
            debug!("Stale remote snapshot ignored");
            return RemoteUpdate::Stale;
        }
        let update = match self.pending.take() {
            Some(local) if local == remote => RemoteUpdate::Confirmed,
            Some(_) => {
                info!("Remote snapshot replaced pending local move");
                RemoteUpdate::DiscardedLocal
            }
            None => RemoteUpdate::Accepted,
        };
        if remote != self.authoritative {
            self.replace_authoritative(remote);
        }
        update
    }

    /// Steps back one snapshot, dropping any pending move first.
    pub fn undo(&mut self) -> Option<&GameState> {
        if self.pending.take().is_some() {
            return Some(&self.authoritative);
        }
        let previous = self.undo.pop_back()?;
        self.authoritative = previous;
        Some(&self.authoritative)
    }

    fn replace_authoritative(&mut self, next: GameState) {
        let previous = std::mem::replace(&mut self.authoritative, next);
        self.undo.push_back(previous);
        self.trim_undo();
    }

    fn trim_undo(&mut self) {
        while self.undo.len() > self.undo_limit {
            self.undo.pop_front();
        }
    }
}
