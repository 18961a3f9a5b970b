use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::collections::VecDeque;

/// Source of secret numbers.
pub trait SecretSource {
    /// Uniformly distributed value in `low..=high`. Callers guarantee `low <= high`.
    fn draw(&mut self, low: i64, high: i64) -> i64;
}

/// Entropy-seeded generator; reproducible when built with an explicit seed.
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: u64,
    rng: StdRng,
}

impl RandomSource {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().next_u64());
        trace!(target: "rng", "Seeding secret source with {}", seed);
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SecretSource for RandomSource {
    fn draw(&mut self, low: i64, high: i64) -> i64 {
        self.rng.random_range(low..=high)
    }
}

/// Replays a fixed list of values, then repeats the last one. Values are
/// clamped into the requested range.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: VecDeque<i64>,
    last: i64,
}

impl ScriptedSource {
    pub fn new<I: IntoIterator<Item = i64>>(values: I) -> Self {
        let values: VecDeque<i64> = values.into_iter().collect();
        let last = values.back().copied().unwrap_or(1);
        Self { values, last }
    }
}

impl SecretSource for ScriptedSource {
    fn draw(&mut self, low: i64, high: i64) -> i64 {
        if let Some(next) = self.values.pop_front() {
            self.last = next;
        }
        self.last.clamp(low, high)
    }
}
