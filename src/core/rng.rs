//! Deterministic random number generation for deck seeding.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Per-participant streams**: Each participant's deck is shuffled from
//!   its own stream, so adding a participant never reorders another's deck
//!
//! ```
//! use duel_ccg::core::{GameRng, ParticipantId};
//!
//! let rng = GameRng::new(42);
//! let mut a = rng.for_participant(ParticipantId::new(1));
//! let mut b = GameRng::new(42).for_participant(ParticipantId::new(1));
//!
//! let mut left = vec![1, 2, 3, 4, 5];
//! let mut right = left.clone();
//! a.shuffle(&mut left);
//! b.shuffle(&mut right);
//! assert_eq!(left, right);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::participant::ParticipantId;

/// Deterministic RNG used by the authority when seeding decks.
///
/// Uses ChaCha8 for speed while keeping good statistical quality.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Get the seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Create an independent stream for one participant.
    ///
    /// The same participant always gets the same stream from the same seed.
    #[must_use]
    pub fn for_participant(&self, participant: ParticipantId) -> Self {
        let stream_seed = self
            .seed
            .wrapping_add((u64::from(participant.raw()) + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(stream_seed)
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range_usize(0..1000), rng2.gen_range_usize(0..1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(43);

        let seq1: Vec<_> = (0..10).map(|_| rng1.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_participant_streams_differ() {
        let rng = GameRng::new(42);
        let mut a = rng.for_participant(ParticipantId::new(1));
        let mut b = rng.for_participant(ParticipantId::new(2));

        let seq_a: Vec<_> = (0..10).map(|_| a.gen_range_usize(0..1000)).collect();
        let seq_b: Vec<_> = (0..10).map(|_| b.gen_range_usize(0..1000)).collect();

        assert_ne!(seq_a, seq_b);
        assert_ne!(a.seed(), rng.seed());
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = GameRng::new(42);
        let mut values: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut values);

        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }
}
