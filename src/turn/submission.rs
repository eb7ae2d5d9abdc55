//! Per-turn submission bookkeeping.
//!
//! The collector is a plain map from participant to the cards they chose.
//! It does no legality checks; trimming during resolution takes care of
//! affordability and unknown cards.

use rustc_hash::FxHashMap;

use crate::cards::CardId;
use crate::core::ParticipantId;

/// Collects each participant's chosen cards for the current turn.
///
/// ```
/// use duel_ccg::cards::CardId;
/// use duel_ccg::core::ParticipantId;
/// use duel_ccg::turn::SubmissionCollector;
///
/// let p1 = ParticipantId::new(1);
/// let p2 = ParticipantId::new(2);
///
/// let mut collector = SubmissionCollector::new();
/// collector.submit(p1, vec![CardId::new(3)]);
/// assert!(!collector.is_complete([p1, p2]));
///
/// collector.submit(p2, vec![]);
/// assert!(collector.is_complete([p1, p2]));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SubmissionCollector {
    pending: FxHashMap<ParticipantId, Vec<CardId>>,
}

impl SubmissionCollector {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a participant's submission, replacing any earlier one.
    pub fn submit(&mut self, participant: ParticipantId, cards: Vec<CardId>) {
        self.pending.insert(participant, cards);
    }

    /// A participant's recorded submission.
    #[must_use]
    pub fn get(&self, participant: ParticipantId) -> Option<&[CardId]> {
        self.pending.get(&participant).map(Vec::as_slice)
    }

    /// Check whether every expected participant has submitted.
    #[must_use]
    pub fn is_complete(&self, expected: impl IntoIterator<Item = ParticipantId>) -> bool {
        expected.into_iter().all(|p| self.pending.contains_key(&p))
    }

    /// Drop all submissions. Called once at the start of every turn.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Number of participants that have submitted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check whether nothing has been submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
