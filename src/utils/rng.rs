//! Seedable random number generator for reproducible training.
//!
//! [`SimpleRng`] is a small xorshift engine exposed through the `rand` traits, so
//! it can be handed to anything that takes `&mut impl Rng` (weight
//! initialisation, per-epoch shuffling). The same seed always yields the same
//! stream, which makes whole training runs repeatable.

use rand::{Error, RngCore, SeedableRng};

const FALLBACK_STATE: u64 = 0x9e3779b97f4a7c15;

/// Xorshift64 generator. Not cryptographic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new RNG with explicit seed (if zero, use a fixed value).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { FALLBACK_STATE } else { seed };
        Self { state }
    }

    /// Advance the xorshift state and return it.
    fn advance(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl RngCore for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        (self.advance() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.advance()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SimpleRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    // Keeps `seed_from_u64(n)` identical to `SimpleRng::new(n)`.
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
