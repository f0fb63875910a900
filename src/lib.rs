//! # asr-bucketing
//!
//! **Duration-bucketing batch samplers** for training speech recognition models.
//! Cuts (labeled audio segments) of similar duration are grouped into buckets,
//! each bucket is batched by its own simpler sampler, and batches are
//! interleaved across buckets so that no bucket runs dry far ahead of the others.
//!
//! ## Key Features
//!
//! - **Bucket builders** - equal cut count or equal cumulative duration per bucket
//! - **Parallel cut sets** - bucket source/target pairs (or any N-tuple) together
//! - **Proportional sampling** - favor buckets with more remaining audio
//! - **Epoch determinism** - bucket selection is reproducible per `(seed, epoch)`
//! - **Pluggable samplers** - anything implementing [`CutSampler`] can fill a bucket
//! - **Diagnostics** - mergeable kept/discarded statistics with a text report
//!
//! ## Quick Start
//!
//! ```
//! use asr_bucketing::*;
//!
//! # fn main() -> asr_bucketing::Result<()> {
//! let cuts = CutSet::from_cuts(
//!     (0..100).map(|i| Cut::new(format!("utt-{i}"), 1.0 + (i % 10) as f64)).collect(),
//! )?;
//!
//! let config = BucketingConfig {
//!     num_buckets: 5,
//!     bucket_method: BucketMethod::EqualDuration,
//!     seed: 42,
//!     ..Default::default()
//! };
//! let mut sampler: BucketingSampler<SingleCutSampler> = BucketingSampler::new(
//!     vec![cuts],
//!     &config,
//!     &SingleCutSamplerConfig::with_max_duration(30.0),
//! )?;
//!
//! for epoch in 0..2 {
//!     sampler.set_epoch(epoch);
//!     for batch in sampler.iter_epoch() {
//!         assert!(!batch.is_empty());
//!     }
//! }
//! println!("{}", sampler.report());
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Cuts and cut sets
//!
//! A [`Cut`] has an id and a duration. A [`CutSet`] is an ordered collection of
//! cuts with unique ids. It is either eager or *lazy*; for lazy cut sets the
//! samplers report remaining durations and counts as unknown (`None`).
//!
//! ### Samplers
//!
//! A [`CutSampler`] yields batches of cut ids until its data runs out for the
//! current epoch. [`SingleCutSampler`] batches one cut set;
//! [`CutPairsSampler`] batches aligned source/target cut sets.
//!
//! ### Bucketing
//!
//! [`BucketingSampler`] sorts the first cut set by duration, splits it into
//! buckets ([`create_buckets_equal_len`] or [`create_buckets_equal_duration`]),
//! and builds one sampler per bucket. Every pull picks a bucket at random
//! among those not yet depleted.
//!
//! ## Module Overview
//!
//! - [`cut`] / [`cut_set`] - cuts and cut collections
//! - [`sampler`] - the sampler contract, per-bucket samplers, diagnostics
//! - [`bucketing`] - bucket builders and the bucketing sampler
//! - [`config`] - bucketing options, loadable from JSON
//! - [`error`] - the crate's error type
//! - [`testing`] - fixtures, assertions and a scripted sampler for tests

pub mod bucketing;
pub mod config;
pub mod cut;
pub mod cut_set;
pub mod error;
pub mod sampler;
pub mod testing;

pub use bucketing::{
    Bucket, BucketingSampler, EpochIter, create_buckets, create_buckets_equal_duration,
    create_buckets_equal_len,
};
pub use config::{BucketMethod, BucketingConfig};
pub use cut::{Cut, CutPredicate, predicate};
pub use cut_set::CutSet;
pub use error::{Result, SamplingError};
pub use sampler::{
    Batch, CutPairsSampler, CutPairsSamplerConfig, CutSampler, FromBucket, SamplingDiagnostics,
    SingleCutSampler, SingleCutSamplerConfig, TimeConstraint,
};
