//! Injectable source of random integers.

use crate::seed::Seed;
use rand::Rng;
use rand::rngs::StdRng;

/// Uniform integers in an inclusive range.
pub trait RandomGenerator: Send {
    fn random_integer(&mut self, min: i64, max: i64) -> i64;
}

/// [`RandomGenerator`] backed by the run's deterministic RNG.
pub struct SeededRandomGenerator {
    rng: StdRng,
}

impl SeededRandomGenerator {
    pub fn new(seed: &Seed) -> Self {
        Self {
            rng: seed.create_deterministic_rng(),
        }
    }
}

impl RandomGenerator for SeededRandomGenerator {
    fn random_integer(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..=max)
    }
}
