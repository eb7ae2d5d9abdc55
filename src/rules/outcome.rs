//! End-of-match determination.

use serde::{Deserialize, Serialize};

use crate::core::{ParticipantId, ParticipantMap};

/// Result of a completed match from one participant's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// Strictly more points than the opponent.
    Win,
    /// Equal points.
    Draw,
    /// Fewer points.
    Loss,
}

impl MatchOutcome {
    /// Compare own score against the opponent's.
    ///
    /// Equality is checked first, so a draw can never be reported as a win.
    #[must_use]
    pub fn from_scores(own: i32, opponent: i32) -> Self {
        if own == opponent {
            MatchOutcome::Draw
        } else if own > opponent {
            MatchOutcome::Win
        } else {
            MatchOutcome::Loss
        }
    }
}

/// Every participant's final score, broadcast once when the match ends.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScores {
    /// Final score by participant.
    pub scores: ParticipantMap<i32>,
}

impl FinalScores {
    /// Wrap a score map.
    #[must_use]
    pub fn new(scores: ParticipantMap<i32>) -> Self {
        Self { scores }
    }

    /// A participant's score, if present.
    #[must_use]
    pub fn score_of(&self, id: ParticipantId) -> Option<i32> {
        self.scores.get(id).copied()
    }

    /// The opponent's score from `local`'s point of view (0 if none).
    ///
    /// Duels have exactly one opponent; with more entries the last one in id
    /// order is used.
    #[must_use]
    pub fn opponent_score(&self, local: ParticipantId) -> i32 {
        self.scores
            .iter()
            .filter(|(id, _)| *id != local)
            .map(|(_, score)| *score)
            .last()
            .unwrap_or(0)
    }

    /// Outcome for `local`. A missing local entry counts as 0 points.
    #[must_use]
    pub fn outcome_for(&self, local: ParticipantId) -> MatchOutcome {
        let own = self.score_of(local).unwrap_or(0);
        MatchOutcome::from_scores(own, self.opponent_score(local))
    }
}
