//! Bucket builders.
//!
//! Both builders take one or more *parallel* cut sets (same ids, e.g. source
//! and target sides of a translation corpus). The first one decides bucket
//! membership; the others are reordered or subset so that every bucket holds
//! the same ids, in the same order, in every cut set.
//!
//! The result is one [`Bucket`] per bucket index, each holding one
//! sub-collection per input cut set.

use crate::config::BucketMethod;
use crate::cut_set::CutSet;
use crate::error::{Result, SamplingError};
use log::debug;

/// The parallel sub-collections of one bucket, in input order.
pub type Bucket = Vec<CutSet>;

/// Dispatch to the builder for `method`.
///
/// # Errors
///
/// See [`create_buckets_equal_len`] and [`create_buckets_equal_duration`].
pub fn create_buckets(
    cut_sets: &[CutSet],
    num_buckets: usize,
    method: BucketMethod,
) -> Result<Vec<Bucket>> {
    match method {
        BucketMethod::EqualLen => create_buckets_equal_len(cut_sets, num_buckets),
        BucketMethod::EqualDuration => create_buckets_equal_duration(cut_sets, num_buckets),
    }
}

/// Sort by ascending duration and cut into `num_buckets` contiguous buckets
/// whose sizes differ by at most one.
///
/// # Errors
///
/// Returns [`SamplingError::NoCutSets`] for an empty input,
/// [`SamplingError::InvalidConfig`] when `num_buckets` is zero, and
/// [`SamplingError::MismatchedCutIds`] when the cut sets do not share their ids.
pub fn create_buckets_equal_len(cut_sets: &[CutSet], num_buckets: usize) -> Result<Vec<Bucket>> {
    let (first, rest) = cut_sets.split_first().ok_or(SamplingError::NoCutSets)?;
    check_num_buckets(num_buckets)?;

    let first = first.sort_by_duration(true);
    let mut columns = Vec::with_capacity(cut_sets.len());
    columns.push(first.split(num_buckets)?);
    for cs in rest {
        columns.push(cs.sort_like(&first)?.split(num_buckets)?);
    }
    Ok(transpose(columns))
}

/// Sort by ascending duration and fill buckets greedily up to
/// `total_duration / num_buckets` each.
///
/// A bucket may overshoot by its last cut. Every odd-indexed bucket gives its
/// last cut back to the next bucket, and the final bucket takes everything
/// that is left. With uniform durations the give-backs accumulate in the final
/// bucket, which ends up `(num_buckets - 1) / 2` cuts larger than the others.
///
/// # Errors
///
/// Same as [`create_buckets_equal_len`].
pub fn create_buckets_equal_duration(
    cut_sets: &[CutSet],
    num_buckets: usize,
) -> Result<Vec<Bucket>> {
    let (first, rest) = cut_sets.split_first().ok_or(SamplingError::NoCutSets)?;
    check_num_buckets(num_buckets)?;

    let first = first.sort_by_duration(true);
    let lead = split_equal_duration(&first, num_buckets)?;
    let mut columns = Vec::with_capacity(cut_sets.len());
    for cs in rest {
        columns.push(cs.sort_like(&first)?.partition_like(&lead)?);
    }
    columns.insert(0, lead);
    Ok(transpose(columns))
}

#[allow(clippy::cast_precision_loss)]
fn split_equal_duration(sorted: &CutSet, num_buckets: usize) -> Result<Vec<CutSet>> {
    let cuts = sorted.cuts();
    let bucket_duration = sorted.total_duration() / num_buckets as f64;
    let mut sizes = Vec::with_capacity(num_buckets);
    let mut pos = 0;

    for bucket_idx in 0..num_buckets {
        let start = pos;
        if bucket_idx == num_buckets - 1 {
            pos = cuts.len();
        } else {
            let mut current = 0.0;
            while current < bucket_duration && pos < cuts.len() {
                current += cuts[pos].duration;
                pos += 1;
            }
            if current < bucket_duration {
                debug!(
                    "Ran out of cuts while filling bucket {bucket_idx} of {num_buckets}; \
                     the remaining buckets stay empty"
                );
            } else if bucket_idx % 2 == 1 && pos > start {
                pos -= 1;
            }
        }
        sizes.push(pos - start);
    }
    sorted.split_by_sizes(sizes)
}

fn check_num_buckets(num_buckets: usize) -> Result<()> {
    if num_buckets == 0 {
        return Err(SamplingError::InvalidConfig(
            "num_buckets must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// `columns[set][bucket]` -> `buckets[bucket][set]`
fn transpose(columns: Vec<Vec<CutSet>>) -> Vec<Bucket> {
    let num_buckets = columns.first().map_or(0, Vec::len);
    let mut buckets: Vec<Bucket> = (0..num_buckets)
        .map(|_| Vec::with_capacity(columns.len()))
        .collect();
    for column in columns {
        for (bucket, part) in buckets.iter_mut().zip(column) {
            bucket.push(part);
        }
    }
    buckets
}
