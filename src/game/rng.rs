//! Seedable random number generation for shuffles and chamber spins.
//!
//! Every random decision the engine makes flows through [`GameRng`] so a
//! fixed seed reproduces the same shuffle, theme, and chamber assignments
//! under test. The generator state serializes alongside the session, so a
//! reloaded session continues the same stream instead of re-seeding.

use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG backing all engine randomness.
///
/// Wraps ChaCha8: fast, high quality, and with an O(1) serializable
/// stream position.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(from = "GameRngState", into = "GameRngState")]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create an RNG with the given seed. Same seed, same sequence.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random `u8` in `[0, bound)`.
    pub fn roll(&mut self, bound: u8) -> u8 {
        self.inner.random_range(0..bound)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Capture the current stream state.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }
}

impl From<GameRngState> for GameRng {
    fn from(state: GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl From<GameRng> for GameRngState {
    fn from(rng: GameRng) -> Self {
        rng.state()
    }
}

/// Serializable RNG state.
///
/// The ChaCha8 word position captures how far the stream has advanced,
/// so restore cost is constant no matter how many values were drawn.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameRngState {
    pub seed: u64,
    pub word_pos: u128,
}
