//! Per-epoch iteration state of a bucketing sampler.

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Bucket-selection generator plus one depletion flag per bucket.
///
/// A fresh session is created for every epoch, so nothing carries over from
/// one pass to the next. Flags only ever go from `false` to `true`.
#[derive(Debug, Clone)]
pub(crate) struct EpochSession {
    rng: ChaCha8Rng,
    depleted: Vec<bool>,
}

impl EpochSession {
    pub(crate) fn new(num_buckets: usize, seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            depleted: vec![false; num_buckets],
        }
    }

    pub(crate) fn depleted(&self) -> &[bool] {
        &self.depleted
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.depleted.iter().all(|&d| d)
    }

    pub(crate) fn mark_depleted(&mut self, bucket: usize) {
        self.depleted[bucket] = true;
    }

    pub(crate) fn active(&self) -> Vec<usize> {
        self.depleted
            .iter()
            .enumerate()
            .filter_map(|(i, &d)| (!d).then_some(i))
            .collect()
    }

    /// Pick the next bucket to pull from, or `None` if every bucket is depleted.
    ///
    /// Without proportional sampling the choice is uniform over the active
    /// buckets. With it, two candidates are drawn uniformly (with replacement)
    /// and the first one wins with probability `d1 / (d1 + d2)`, where `d` is
    /// the candidate's remaining duration. If both durations are zero, or one
    /// is unknown, the first candidate wins without a further draw.
    pub(crate) fn select_bucket<F>(&mut self, proportional: bool, remaining: F) -> Option<usize>
    where
        F: Fn(usize) -> Option<f64>,
    {
        let active = self.active();
        if !proportional {
            return active.choose(&mut self.rng).copied();
        }
        if let [only] = active.as_slice() {
            return Some(*only);
        }
        let first = *active.choose(&mut self.rng)?;
        let second = *active.choose(&mut self.rng)?;
        let (Some(d1), Some(d2)) = (remaining(first), remaining(second)) else {
            return Some(first);
        };
        let total = d1 + d2;
        if total <= 0.0 {
            return Some(first);
        }
        let prob1 = d1 / total;
        if self.rng.random::<f64>() > prob1 {
            Some(second)
        } else {
            Some(first)
        }
    }
}
