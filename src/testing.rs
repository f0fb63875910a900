//! Testing utilities for samplers and bucket builders.
//!
//! - **Fixtures**: synthetic cut sets with known durations
//! - **Assertions**: partition and balance checks for buckets and batches
//! - **Scripted sampler**: a [`CutSampler`](crate::CutSampler) with a fixed
//!   remaining duration and a fixed number of batches, handy for exercising
//!   bucket selection in isolation
//!
//! # Quick Start
//!
//! ```
//! use asr_bucketing::*;
//! use asr_bucketing::testing::*;
//!
//! let cuts = evenly_spread_cuts(100, 1.0, 10.0);
//! let buckets = create_buckets_equal_len(&[cuts.clone()], 5).unwrap();
//!
//! assert_partition_complete(&cuts, &buckets);
//! assert_bucket_sizes_balanced(&buckets, 0);
//! ```

pub mod assertions;
pub mod fixtures;
pub mod scripted;

pub use assertions::*;
pub use fixtures::*;
pub use scripted::*;
