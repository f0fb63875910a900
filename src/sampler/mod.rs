//! Per-bucket batch samplers.
//!
//! Every sampler the bucketing orchestration can drive implements
//! [`CutSampler`]: a pull-based "next batch or end-of-data" call, an epoch
//! restart, an epoch setter, a cut filter, and a handful of statistics that
//! are `None` whenever the underlying data is lazily streamed.
//!
//! [`FromBucket`] adds the constructor the bucketing sampler uses to build one
//! sampler per bucket from the bucket's parallel cut sets.
//!
//! Two concrete samplers are provided:
//! - [`SingleCutSampler`] batches cuts from a single collection.
//! - [`CutPairsSampler`] batches aligned (source, target) cut pairs.

mod base;
pub mod constraint;
pub mod cut_pairs;
pub mod diagnostics;
pub mod single_cut;

pub use constraint::TimeConstraint;
pub use cut_pairs::{CutPairsSampler, CutPairsSamplerConfig};
pub use diagnostics::SamplingDiagnostics;
pub use single_cut::{SingleCutSampler, SingleCutSamplerConfig};

use crate::cut::CutPredicate;
use crate::cut_set::CutSet;
use crate::error::Result;

/// Cut ids of one batch, in the order they were sampled.
pub type Batch = Vec<String>;

/// The capability contract of a batch sampler.
pub trait CutSampler {
    /// Pull the next batch, or `None` once the current epoch is exhausted.
    ///
    /// After `None`, further calls keep returning `None` until [`reset`](Self::reset).
    fn next_batch(&mut self) -> Option<Batch>;

    /// Restart iteration for the current epoch.
    fn reset(&mut self);

    fn epoch(&self) -> u64;

    /// Set the epoch used by the next [`reset`](Self::reset).
    fn set_epoch(&mut self, epoch: u64);

    /// Add an inclusion predicate. Predicates accumulate: a cut must satisfy all of them.
    fn filter(&mut self, predicate: CutPredicate);

    /// Seconds of data not yet visited this epoch.
    fn remaining_duration(&self) -> Option<f64>;

    /// Number of cuts not yet visited this epoch.
    fn remaining_cuts(&self) -> Option<usize>;

    /// Total number of cuts, independent of iteration progress.
    fn num_cuts(&self) -> Option<usize>;

    /// Number of batches one full epoch yields. `None` for lazy data or once filtered.
    fn num_batches(&self) -> Option<usize>;

    fn diagnostics(&self) -> SamplingDiagnostics;
}

/// Constructor used by [`BucketingSampler`](crate::BucketingSampler) to build a
/// sampler over one bucket.
pub trait FromBucket: CutSampler + Sized {
    /// Configuration forwarded verbatim to every bucket's sampler.
    type Config;

    /// Build a sampler over one bucket's parallel cut sets.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of cut sets or the configuration does not
    /// suit this sampler.
    fn from_bucket(cut_sets: Vec<CutSet>, drop_last: bool, config: &Self::Config) -> Result<Self>;
}
