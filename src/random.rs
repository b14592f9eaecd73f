//! Reproducible randomness for shareable game links.
//!
//! A seed string is hashed to a 32-bit integer and fed to Mulberry32. Both
//! steps match the browser implementation bit for bit, so a link carrying a
//! seed selects the same track whichever side computes it.

use rand::{Rng, SeedableRng, rngs::StdRng};

// Only this many UTF-16 code units of a seed take part in hashing
const SEED_HASH_LIMIT: usize = 100;

const MULBERRY32_INCREMENT: u32 = 0x6D2B_79F5;

/// Hashes the first 100 UTF-16 code units of `seed` with the classic
/// `hash * 31 + c` rolling hash, wrapped to a signed 32-bit integer.
pub fn hash_seed(seed: &str) -> i32 {
    seed.encode_utf16()
        .take(SEED_HASH_LIMIT)
        .fold(0i32, |hash, c| {
            (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(c))
        })
}

/// Mulberry32 generator producing floats in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: i32) -> Self {
        Mulberry32 {
            state: seed.cast_unsigned(),
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY32_INCREMENT);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(1 | a);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        t ^ (t >> 14)
    }

    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// Source of uniform draws for track selection, chosen once per request.
#[derive(Debug)]
pub enum RandomSource {
    /// Reproducible stream derived from a caller-supplied seed
    Seeded(Mulberry32),
    /// OS-seeded, non-reproducible stream
    System(StdRng),
}

impl RandomSource {
    /// Builds a seeded source for a non-empty seed and a system source
    /// otherwise. An empty seed string counts as no seed.
    pub fn from_seed(seed: Option<&str>) -> Self {
        match seed.filter(|s| !s.is_empty()) {
            Some(s) => RandomSource::Seeded(Mulberry32::new(hash_seed(s))),
            None => RandomSource::System(StdRng::from_os_rng()),
        }
    }

    pub fn is_seeded(&self) -> bool {
        matches!(self, RandomSource::Seeded(_))
    }

    pub fn next_f64(&mut self) -> f64 {
        match self {
            RandomSource::Seeded(generator) => generator.next_f64(),
            RandomSource::System(rng) => rng.random::<f64>(),
        }
    }
}
