//! Random number generation for shuffles and turn-order permutation.
//!
//! Shuffling is always performed by the authoritative side with its own
//! local RNG; the resulting order is broadcast as a full identifier
//! sequence and mirrors replace their copy verbatim. Seeds are therefore
//! never shared across peers - only the *result* of a shuffle is.
//!
//! Seeded construction exists so tests can replay exact shuffles.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Match RNG backed by ChaCha8.
///
/// Uniform Fisher-Yates shuffles via `rand::seq::SliceRandom`.
#[derive(Clone, Debug)]
pub struct MatchRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl MatchRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG seeded from process entropy.
    ///
    /// This is the production path: each peer shuffles with its own
    /// unpredictable stream.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Get the seed this RNG was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random usize in the given range.
    pub fn gen_range(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place (uniform Fisher-Yates).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}
