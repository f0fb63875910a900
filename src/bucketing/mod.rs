//! Duration bucketing.
//!
//! - [`buckets`] partitions cut sets into duration-homogeneous buckets.
//! - [`BucketingSampler`] drives one sampler per bucket and interleaves their
//!   batches.

pub mod buckets;
mod sampler;
mod session;

pub use buckets::{
    Bucket, create_buckets, create_buckets_equal_duration, create_buckets_equal_len,
};
pub use sampler::{BucketingSampler, EpochIter};
