//! Match state: per-participant piles, energy, and score.
//!
//! ## ParticipantState
//!
//! One participant's mutable state:
//! - Draw pile (front = next draw)
//! - Hand (order irrelevant to the rules, kept stable for replication)
//! - Resource pool ("energy"), bounded after each refill
//! - Score
//!
//! ## MatchState
//!
//! The turn counter plus every participant's state. On the authority it is
//! written by the turn resolver; on a replica only by applied snapshots.
//!
//! Piles use `im::Vector` so that building a snapshot of every participant
//! is O(1) per pile.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::config::MatchConfig;
use super::participant::{ParticipantId, ParticipantMap};
use super::rng::GameRng;
use crate::cards::{CardCatalog, CardId};

/// One participant's state for the lifetime of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantState {
    /// Stable participant identifier.
    pub id: ParticipantId,

    /// Cards still to draw; the front is drawn next.
    pub draw_pile: Vector<CardId>,

    /// Cards available to submit.
    pub hand: Vector<CardId>,

    /// Resource pool available for this turn.
    pub energy: u32,

    /// Accumulated score.
    pub score: i32,
}

impl ParticipantState {
    /// Create an empty participant with the given starting energy.
    #[must_use]
    pub fn new(id: ParticipantId, energy: u32) -> Self {
        Self {
            id,
            draw_pile: Vector::new(),
            hand: Vector::new(),
            energy,
            score: 0,
        }
    }

    /// Create a participant with a seeded, shuffled deck and an initial hand.
    ///
    /// The deck is every catalog card in id order, repeated until it reaches
    /// `config.deck_size` (a larger catalog is used whole), then shuffled
    /// from the participant's own RNG stream.
    #[must_use]
    pub fn seeded(
        id: ParticipantId,
        catalog: &CardCatalog,
        config: &MatchConfig,
        rng: &GameRng,
    ) -> Self {
        let mut state = Self::new(id, config.starting_energy);

        let ids = catalog.sorted_ids();
        if ids.is_empty() {
            warn!(participant = %id, "empty catalog, participant starts with an empty deck");
            return state;
        }

        let target = config.deck_size.max(ids.len());
        let mut deck: Vec<CardId> = ids.iter().copied().cycle().take(target).collect();
        rng.for_participant(id).shuffle(&mut deck);
        state.draw_pile = deck.into_iter().collect();

        for _ in 0..config.initial_hand_size {
            state.draw();
        }
        state
    }

    /// Draw the front card of the pile into hand.
    ///
    /// Returns the drawn card, or None if the pile is empty.
    pub fn draw(&mut self) -> Option<CardId> {
        let card = self.draw_pile.pop_front()?;
        self.hand.push_back(card);
        Some(card)
    }

    /// Remove one occurrence of a card from hand.
    ///
    /// Returns true if the card was found and removed.
    pub fn remove_from_hand(&mut self, card: CardId) -> bool {
        match self.hand.index_of(&card) {
            Some(pos) => {
                self.hand.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Per-turn refill: +1 energy, bounded by `max`.
    pub fn refill(&mut self, max: u32) {
        self.energy = self.energy.saturating_add(1).min(max);
    }

    /// Spend energy, clamping at zero.
    pub fn spend(&mut self, cost: u32) {
        self.energy = self.energy.saturating_sub(cost);
    }
}

/// Complete match state: turn counter and every participant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    /// Current turn (0 before the first turn starts).
    pub turn: u32,

    /// Per-participant state, ordered by id.
    pub participants: ParticipantMap<ParticipantState>,
}

impl MatchState {
    /// Create an empty state (no participants yet).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed every participant from the catalog.
    #[must_use]
    pub fn seeded(
        ids: impl IntoIterator<Item = ParticipantId>,
        catalog: &CardCatalog,
        config: &MatchConfig,
    ) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            turn: 0,
            participants: ParticipantMap::from_ids(ids, |id| {
                ParticipantState::seeded(id, catalog, config, &rng)
            }),
        }
    }

    /// Get a participant's state.
    #[must_use]
    pub fn participant(&self, id: ParticipantId) -> Option<&ParticipantState> {
        self.participants.get(id)
    }

    /// Get a participant's mutable state.
    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut ParticipantState> {
        self.participants.get_mut(id)
    }

    /// Check whether any participant state exists.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        !self.participants.is_empty()
    }

    /// Current scores by participant.
    #[must_use]
    pub fn scores(&self) -> ParticipantMap<i32> {
        self.participants.map(|_, p| p.score)
    }
}
