//! The bucketing sampler: one sampler per duration bucket, interleaved by a
//! seeded bucket selection that is restarted every epoch.

use super::buckets::create_buckets;
use super::session::EpochSession;
use crate::config::BucketingConfig;
use crate::cut::CutPredicate;
use crate::cut_set::CutSet;
use crate::error::{Result, SamplingError};
use crate::sampler::{Batch, CutSampler, FromBucket, SamplingDiagnostics};
use log::{debug, warn};
use std::cell::OnceCell;

/// Sorts cuts by duration into buckets of similar durations and runs one
/// sampler per bucket.
///
/// Each call for the next batch picks a non-depleted bucket at random and pulls
/// a batch from its sampler. A bucket whose sampler runs dry is marked depleted
/// and the selection is retried; the epoch ends when every bucket is depleted.
///
/// With proportional sampling (the default) buckets with more remaining
/// duration are favored, so they drain at comparable rates. Lazy input falls
/// back to uniform selection since remaining durations are unknown.
///
/// ```
/// use asr_bucketing::*;
///
/// # fn main() -> asr_bucketing::Result<()> {
/// let cuts = CutSet::from_cuts((0..40).map(|i| Cut::new(format!("c{i}"), 1.0 + i as f64 / 4.0)).collect())?;
/// let config = BucketingConfig { num_buckets: 4, ..Default::default() };
/// let mut sampler: BucketingSampler<SingleCutSampler> =
///     BucketingSampler::new(vec![cuts], &config, &SingleCutSamplerConfig::with_max_duration(20.0))?;
///
/// let expected = sampler.num_batches();
/// let batches: Vec<Batch> = sampler.iter_epoch().collect();
/// assert_eq!(Some(batches.len()), expected);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BucketingSampler<S> {
    samplers: Vec<S>,
    proportional_sampling: bool,
    seed: u64,
    epoch: u64,
    /// The first cut set is streamed; bucket selection is uniform.
    lazy: bool,
    /// Some cut set is streamed; batch and cut counts are unknown.
    streamed: bool,
    filtered: bool,
    session: EpochSession,
    num_batches: OnceCell<Option<usize>>,
}

impl<S: FromBucket> BucketingSampler<S> {
    /// Bucket `cut_sets` and build one `S` per bucket.
    ///
    /// The first cut set decides bucket membership; any further cut sets must
    /// hold the same ids and are aligned to it. `drop_last` from `config` and
    /// the whole `sampler_config` are forwarded to every bucket's sampler.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty `cut_sets`, an invalid `config`, cut sets
    /// with different ids, or a `sampler_config` rejected by `S`.
    pub fn new(
        cut_sets: Vec<CutSet>,
        config: &BucketingConfig,
        sampler_config: &S::Config,
    ) -> Result<Self> {
        config.validate()?;
        let first = cut_sets.first().ok_or(SamplingError::NoCutSets)?;
        let lazy = first.is_lazy();
        let streamed = cut_sets.iter().any(CutSet::is_lazy);
        if lazy {
            warn!(
                "Lazy cut set detected in BucketingSampler: this is not well supported yet, \
                 and you might experience a potentially long lag while the buckets are being created"
            );
        }

        let buckets = create_buckets(&cut_sets, config.num_buckets, config.bucket_method)?;
        debug!(
            "Created {} {} buckets with sizes {:?}",
            buckets.len(),
            config.bucket_method,
            buckets.iter().map(|b| b[0].len()).collect::<Vec<_>>()
        );

        let samplers = buckets
            .into_iter()
            .map(|bucket| S::from_bucket(bucket, config.drop_last, sampler_config))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::assemble(samplers, config, lazy, streamed))
    }
}

impl<S: CutSampler> BucketingSampler<S> {
    /// Wrap samplers that were already built, one per bucket.
    ///
    /// `num_buckets`, `bucket_method` and `drop_last` in `config` are ignored;
    /// `lazy` selects uniform bucket selection and hides the batch count, as
    /// for lazy input.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::InvalidConfig`] if `samplers` is empty.
    pub fn from_samplers(samplers: Vec<S>, config: &BucketingConfig, lazy: bool) -> Result<Self> {
        if samplers.is_empty() {
            return Err(SamplingError::InvalidConfig(
                "at least one bucket sampler is required".to_string(),
            ));
        }
        Ok(Self::assemble(samplers, config, lazy, lazy))
    }

    fn assemble(samplers: Vec<S>, config: &BucketingConfig, lazy: bool, streamed: bool) -> Self {
        let epoch = 0;
        Self {
            session: EpochSession::new(samplers.len(), config.seed.wrapping_add(epoch)),
            samplers,
            proportional_sampling: config.proportional_sampling,
            seed: config.seed,
            epoch,
            lazy,
            streamed,
            filtered: false,
            num_batches: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn num_buckets(&self) -> usize {
        self.samplers.len()
    }

    /// Per-bucket samplers, in bucket order (shortest durations first).
    #[must_use]
    pub fn samplers(&self) -> &[S] {
        &self.samplers
    }

    #[must_use]
    pub const fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// True once every bucket is depleted for the current epoch.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.session.is_exhausted()
    }

    /// Depletion flag of every bucket for the current epoch.
    #[must_use]
    pub fn depleted_buckets(&self) -> &[bool] {
        self.session.depleted()
    }

    /// Start a new pass: reseed the selection generator with `seed + epoch`,
    /// rewind every bucket's sampler and clear all depletion flags.
    pub fn start_epoch(&mut self) {
        debug!("Starting bucketing epoch {}", self.epoch);
        self.session = EpochSession::new(self.samplers.len(), self.seed.wrapping_add(self.epoch));
        for s in &mut self.samplers {
            s.reset();
        }
    }

    /// Restart the epoch and iterate over its batches.
    pub fn iter_epoch(&mut self) -> EpochIter<'_, S> {
        self.start_epoch();
        EpochIter { sampler: self }
    }

    /// Next batch together with the index of the bucket it came from.
    pub fn next_batch_with_bucket(&mut self) -> Option<(usize, Batch)> {
        let proportional = self.proportional_sampling && !self.lazy;
        while !self.session.is_exhausted() {
            let samplers = &self.samplers;
            let idx = self
                .session
                .select_bucket(proportional, |i| samplers[i].remaining_duration())?;
            match self.samplers[idx].next_batch() {
                Some(batch) => return Some((idx, batch)),
                None => self.session.mark_depleted(idx),
            }
        }
        None
    }

    fn active_samplers(&self) -> impl Iterator<Item = &S> {
        self.samplers
            .iter()
            .zip(self.session.depleted())
            .filter_map(|(s, &depleted)| (!depleted).then_some(s))
    }

    /// Merged diagnostics of all buckets, rendered as text.
    #[must_use]
    pub fn report(&self) -> String {
        self.diagnostics().report()
    }
}

impl<S: CutSampler> CutSampler for BucketingSampler<S> {
    fn next_batch(&mut self) -> Option<Batch> {
        self.next_batch_with_bucket().map(|(_, batch)| batch)
    }

    fn reset(&mut self) {
        self.start_epoch();
    }

    fn epoch(&self) -> u64 {
        self.epoch
    }

    fn set_epoch(&mut self, epoch: u64) {
        for s in &mut self.samplers {
            s.set_epoch(epoch);
        }
        self.epoch = epoch;
    }

    /// Forward `predicate` to every bucket. The batch count becomes unknown.
    fn filter(&mut self, predicate: CutPredicate) {
        for s in &mut self.samplers {
            s.filter(predicate.clone());
        }
        self.filtered = true;
        self.num_batches = OnceCell::new();
    }

    /// Sum over non-depleted buckets.
    fn remaining_duration(&self) -> Option<f64> {
        self.active_samplers().map(CutSampler::remaining_duration).sum()
    }

    /// Sum over non-depleted buckets.
    fn remaining_cuts(&self) -> Option<usize> {
        self.active_samplers().map(CutSampler::remaining_cuts).sum()
    }

    /// Sum over all buckets, depleted or not.
    fn num_cuts(&self) -> Option<usize> {
        self.samplers.iter().map(CutSampler::num_cuts).sum()
    }

    /// Sum of the buckets' batch counts, computed on first use.
    fn num_batches(&self) -> Option<usize> {
        if self.streamed || self.filtered {
            return None;
        }
        *self
            .num_batches
            .get_or_init(|| self.samplers.iter().map(CutSampler::num_batches).sum())
    }

    fn diagnostics(&self) -> SamplingDiagnostics {
        self.samplers.iter().map(CutSampler::diagnostics).sum()
    }
}

/// Batches of one epoch, see [`BucketingSampler::iter_epoch`].
pub struct EpochIter<'a, S> {
    sampler: &'a mut BucketingSampler<S>,
}

impl<S: CutSampler> Iterator for EpochIter<'_, S> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        self.sampler.next_batch()
    }
}
