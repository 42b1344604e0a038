//! Injectable randomness for break-activity sampling and intervention picks.

use std::collections::VecDeque;

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

/// Source of uniform random indices.
pub trait RandomSource {
    /// Uniform index in `0..len`. Callers never pass `len == 0`.
    fn index(&mut self, len: usize) -> usize;
}

/// Pick one element of `items` through `rng`; `None` when empty.
pub fn choose<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let i = rng.index(items.len()).min(items.len() - 1);
    items.get(i)
}

/// PCG-backed source, seeded from entropy unless a seed is given.
pub struct PcgRandom {
    rng: Mcg128Xsl64,
}

impl PcgRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mcg128Xsl64::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mcg128Xsl64::seed_from_u64(seed),
        }
    }
}

impl Default for PcgRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for PcgRandom {
    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays a fixed list of picks (wrapped modulo `len`), then returns 0.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRandom {
    picks: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn index(&mut self, len: usize) -> usize {
        self.picks.pop_front().map(|p| p % len).unwrap_or(0)
    }
}
