//! Serializable views of match state.
//!
//! ## TurnResultSnapshot
//!
//! Broadcast after every resolved turn. Each participant entry carries the
//! full replicated state (score, energy, hand, draw pile) plus what they
//! played. Because the authority starts the next turn before capturing, the
//! state fields already include the next turn's refill and draw, while
//! `played`, `abilities`, and `final_power` describe the resolved turn.
//!
//! ## FullStateSnapshot
//!
//! Answer to a reconnect request: the current turn and every participant's
//! state, applied wholesale by the requester.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{AbilityTag, CardId};
use crate::core::{MatchState, ParticipantId, ParticipantMap, ParticipantState};
use crate::turn::TurnReport;

/// Wire version of both snapshot kinds.
pub const SNAPSHOT_VERSION: u16 = 1;

/// One participant's replicated state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSnapshot {
    /// Accumulated score.
    pub score: i32,
    /// Resource pool.
    pub energy: u32,
    /// Cards in hand.
    pub hand: Vector<CardId>,
    /// Cards left to draw, front first.
    pub draw_pile: Vector<CardId>,
}

impl ParticipantSnapshot {
    /// Capture a participant's state.
    #[must_use]
    pub fn capture(participant: &ParticipantState) -> Self {
        Self {
            score: participant.score,
            energy: participant.energy,
            hand: participant.hand.clone(),
            draw_pile: participant.draw_pile.clone(),
        }
    }

    /// Overwrite a participant's state with this snapshot.
    pub fn apply_to(&self, participant: &mut ParticipantState) {
        participant.score = self.score;
        participant.energy = self.energy;
        participant.hand = self.hand.clone();
        participant.draw_pile = self.draw_pile.clone();
    }

    /// Build a participant from this snapshot.
    #[must_use]
    pub fn restore(&self, id: ParticipantId) -> ParticipantState {
        let mut participant = ParticipantState::new(id, self.energy);
        self.apply_to(&mut participant);
        participant
    }
}

/// One participant's entry in a turn result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantTurnResult {
    /// State after the turn (and after the next turn's start, if any).
    pub state: ParticipantSnapshot,
    /// Cards that took effect.
    pub played: Vec<CardId>,
    /// Ability tags that applied.
    pub abilities: Vec<AbilityTag>,
    /// Power after doubling and blocking.
    pub final_power: i32,
}

/// Result of one resolved turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResultSnapshot {
    /// Snapshot format version.
    pub version: u16,
    /// The turn that was resolved.
    pub turn_index: u32,
    /// Per-participant result.
    pub participants: ParticipantMap<ParticipantTurnResult>,
}

impl TurnResultSnapshot {
    /// Capture a resolved turn from the authority's state.
    ///
    /// Participants missing from the report get an empty play.
    #[must_use]
    pub fn capture(state: &MatchState, report: &TurnReport) -> Self {
        let participants = state.participants.map(|id, participant| {
            let turn = report.results.get(id).cloned().unwrap_or_default();
            ParticipantTurnResult {
                state: ParticipantSnapshot::capture(participant),
                played: turn.played,
                abilities: turn.abilities,
                final_power: turn.final_power,
            }
        });
        Self {
            version: SNAPSHOT_VERSION,
            turn_index: report.turn,
            participants,
        }
    }

    /// A participant's entry.
    #[must_use]
    pub fn entry(&self, id: ParticipantId) -> Option<&ParticipantTurnResult> {
        self.participants.get(id)
    }
}

/// Complete state for a reconnecting participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullStateSnapshot {
    /// Snapshot format version.
    pub version: u16,
    /// Turn current on the authority.
    pub turn: u32,
    /// Every participant's state.
    pub participants: ParticipantMap<ParticipantSnapshot>,
}

impl FullStateSnapshot {
    /// Capture the full state at `turn`.
    #[must_use]
    pub fn capture(state: &MatchState, turn: u32) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            turn,
            participants: state.participants.map(|_, p| ParticipantSnapshot::capture(p)),
        }
    }

    /// Rebuild a match state from this snapshot.
    #[must_use]
    pub fn to_state(&self) -> MatchState {
        MatchState {
            turn: self.turn,
            participants: self.participants.map(|id, snapshot| snapshot.restore(id)),
        }
    }
}
