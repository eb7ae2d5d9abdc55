//! Snapshot packaging on the authority and snapshot application on
//! receivers.
//!
//! ## Receiver rules
//!
//! - A turn result whose `turn_index` is not newer than the last one applied
//!   is stale and ignored, so duplicated or reordered deliveries are harmless.
//! - A full state whose turn is behind the local turn is stale. Otherwise it
//!   replaces local state wholesale.
//! - Any snapshot with a different version is rejected.

use tracing::{debug, info, warn};

use super::snapshot::{FullStateSnapshot, TurnResultSnapshot, SNAPSHOT_VERSION};
use crate::core::MatchState;
use crate::rules::FinalScores;
use crate::turn::TurnReport;

/// What happened to a received snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Local state now matches the snapshot.
    Applied,
    /// Older than what is already applied; ignored.
    Stale,
    /// Incompatible version; ignored.
    Rejected,
}

/// Keeps a receiver's state in step with the authority.
#[derive(Clone, Debug, Default)]
pub struct ReplicationCoordinator {
    turn: u32,
    last_applied_turn: Option<u32>,
}

impl ReplicationCoordinator {
    /// Create a coordinator that has applied nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Package a resolved turn for broadcast.
    #[must_use]
    pub fn turn_result(&self, state: &MatchState, report: &TurnReport) -> TurnResultSnapshot {
        TurnResultSnapshot::capture(state, report)
    }

    /// Package the full state at `turn` for a reconnecting participant.
    #[must_use]
    pub fn full_state(&self, state: &MatchState, turn: u32) -> FullStateSnapshot {
        FullStateSnapshot::capture(state, turn)
    }

    /// Final scores for the end-of-match broadcast.
    #[must_use]
    pub fn final_scores(&self, state: &MatchState) -> FinalScores {
        FinalScores::new(state.scores())
    }

    /// Apply a turn result received from the authority.
    ///
    /// Participants in the snapshot overwrite (or create) local entries.
    /// The local turn becomes the next turn, or stays on the resolved turn
    /// when it was the last one.
    pub fn apply_turn_result(
        &mut self,
        state: &mut MatchState,
        snapshot: &TurnResultSnapshot,
        total_turns: u32,
    ) -> ApplyOutcome {
        if snapshot.version != SNAPSHOT_VERSION {
            warn!(
                expected = SNAPSHOT_VERSION,
                got = snapshot.version,
                "turn result rejected: version mismatch"
            );
            return ApplyOutcome::Rejected;
        }
        if let Some(last) = self.last_applied_turn {
            if snapshot.turn_index <= last {
                debug!(turn = snapshot.turn_index, last, "stale turn result ignored");
                return ApplyOutcome::Stale;
            }
        }

        for (id, entry) in snapshot.participants.iter() {
            match state.participant_mut(id) {
                Some(participant) => entry.state.apply_to(participant),
                None => {
                    state.participants.insert(id, entry.state.restore(id));
                }
            }
        }

        let next = if snapshot.turn_index >= total_turns {
            snapshot.turn_index
        } else {
            snapshot.turn_index + 1
        };
        state.turn = next;
        self.turn = next;
        self.last_applied_turn = Some(snapshot.turn_index);
        info!(resolved = snapshot.turn_index, turn = next, "turn result applied");
        ApplyOutcome::Applied
    }

    /// Replace local state with a full snapshot.
    pub fn restore_full_state(&mut self, state: &mut MatchState, snapshot: &FullStateSnapshot) -> ApplyOutcome {
        if snapshot.version != SNAPSHOT_VERSION {
            warn!(
                expected = SNAPSHOT_VERSION,
                got = snapshot.version,
                "full state rejected: version mismatch"
            );
            return ApplyOutcome::Rejected;
        }
        if state.is_initialized() && snapshot.turn < state.turn {
            debug!(turn = snapshot.turn, local = state.turn, "stale full state ignored");
            return ApplyOutcome::Stale;
        }

        *state = snapshot.to_state();
        self.turn = snapshot.turn;
        // Everything before the snapshot's turn is already reflected
        let resolved = snapshot.turn.saturating_sub(1);
        self.last_applied_turn = Some(self.last_applied_turn.map_or(resolved, |last| last.max(resolved)));
        info!(turn = snapshot.turn, participants = state.participants.len(), "full state restored");
        ApplyOutcome::Applied
    }

    /// Local turn as last set by an applied snapshot.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Most recent resolved turn reflected locally.
    #[must_use]
    pub fn last_applied_turn(&self) -> Option<u32> {
        self.last_applied_turn
    }
}
