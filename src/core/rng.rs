//! Seeded randomness.
//!
//! The only randomness in a match is the deck shuffle at setup. Both peers
//! derive it from the shared `MatchConfig::seed`, one named stream per use,
//! so no random value ever has to cross the wire.
//!
//! ```
//! use duel_engine::core::{GameRng, Seat};
//!
//! let mut deck = vec!["a", "b", "c", "d", "e", "f"];
//! let mut replica = deck.clone();
//!
//! GameRng::new(42).deck_stream(Seat::First).shuffle(&mut deck);
//! GameRng::new(42).deck_stream(Seat::First).shuffle(&mut replica);
//!
//! assert_eq!(deck, replica);
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

use super::seat::Seat;

/// ChaCha8 stream, stable across platforms.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Root stream for a match seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Derive an independent stream named `context`.
    ///
    /// The child seed is the first eight bytes (little-endian) of
    /// `SHA-256(seed_le || context)`. It must not depend on pointer width or
    /// on the std hasher, since peers may run on different targets.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let digest = Sha256::new()
            .chain_update(self.seed.to_le_bytes())
            .chain_update(context.as_bytes())
            .finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Self::new(u64::from_le_bytes(head))
    }

    /// Stream used to shuffle `seat`'s deck.
    #[must_use]
    pub fn deck_stream(&self, seat: Seat) -> Self {
        self.for_context(&format!("deck:{}", seat))
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }

    /// Uniform pick, `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }
}
