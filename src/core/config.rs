//! Match configuration.
//!
//! `MatchConfig` holds every tunable of a duel: turn count, timer length,
//! energy bounds, deck and hand sizes, and the shuffle seed. The authority and
//! every replica must run with the same values; replicas read `total_turns`
//! to decide how the turn counter behaves after the final snapshot.

use serde::{Deserialize, Serialize};

use super::error::{DuelError, DuelResult};

/// Number of participants a duel is defined for.
pub const PARTICIPANTS_PER_MATCH: usize = 2;

/// Complete match configuration.
///
/// Missing fields fall back to the defaults when deserialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Number of turns before the match ends.
    pub total_turns: u32,

    /// Seconds each turn waits for submissions before forcing resolution.
    pub turn_duration: u32,

    /// Upper bound of the resource pool after the per-turn refill.
    pub max_energy: u32,

    /// Resource pool a participant joins with (before the first refill).
    pub starting_energy: u32,

    /// Cards drawn when a participant is seeded.
    pub initial_hand_size: usize,

    /// Target deck size. Smaller catalogs are repeated until reaching it.
    pub deck_size: usize,

    /// Seed for deck shuffling.
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            total_turns: 6,
            turn_duration: 30,
            max_energy: 6,
            starting_energy: 1,
            initial_hand_size: 3,
            deck_size: 12,
            seed: 42,
        }
    }
}

impl MatchConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> DuelResult<Self> {
        serde_json::from_str(json).map_err(|e| DuelError::Config(e.to_string()))
    }

    /// Set the number of turns.
    #[must_use]
    pub fn with_total_turns(mut self, turns: u32) -> Self {
        self.total_turns = turns;
        self
    }

    /// Set the per-turn timer length in seconds.
    #[must_use]
    pub fn with_turn_duration(mut self, seconds: u32) -> Self {
        self.turn_duration = seconds;
        self
    }

    /// Set the resource pool bound.
    #[must_use]
    pub fn with_max_energy(mut self, max: u32) -> Self {
        self.max_energy = max;
        self
    }

    /// Set the starting resource pool.
    #[must_use]
    pub fn with_starting_energy(mut self, energy: u32) -> Self {
        self.starting_energy = energy;
        self
    }

    /// Set the initial hand size.
    #[must_use]
    pub fn with_initial_hand_size(mut self, size: usize) -> Self {
        self.initial_hand_size = size;
        self
    }

    /// Set the target deck size.
    #[must_use]
    pub fn with_deck_size(mut self, size: usize) -> Self {
        self.deck_size = size;
        self
    }

    /// Set the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check whether `turn` is the final configured turn (or past it).
    #[must_use]
    pub fn is_last_turn(&self, turn: u32) -> bool {
        turn >= self.total_turns
    }
}
