//! Assertion functions for bucket builders and sampler output.

use crate::bucketing::Bucket;
use crate::cut_set::CutSet;
use crate::sampler::Batch;
use std::collections::HashMap;

/// Assert that the first cut set of every bucket together holds each id of
/// `input` exactly once, and that the parallel cut sets of each bucket list
/// the same ids in the same order.
///
/// # Panics
///
/// Panics on a missing, duplicated, unexpected or misaligned id.
pub fn assert_partition_complete(input: &CutSet, buckets: &[Bucket]) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (b, bucket) in buckets.iter().enumerate() {
        let lead: Vec<&str> = bucket[0].ids().collect();
        for (k, other) in bucket.iter().enumerate().skip(1) {
            let ids: Vec<&str> = other.ids().collect();
            assert_eq!(
                lead, ids,
                "Bucket {b}: cut set {k} is not aligned with cut set 0"
            );
        }
        for id in lead {
            if let Some(prev) = seen.insert(id, b) {
                panic!("Cut '{id}' appears in bucket {prev} and bucket {b}");
            }
        }
    }
    for id in input.ids() {
        assert!(seen.remove(id).is_some(), "Cut '{id}' is missing from every bucket");
    }
    assert!(seen.is_empty(), "Buckets contain unexpected cuts: {:?}", seen.keys());
}

/// Assert that bucket sizes (of the first cut set) differ by at most `max_diff`.
///
/// # Panics
///
/// Panics if the spread between the largest and smallest bucket is larger.
pub fn assert_bucket_sizes_balanced(buckets: &[Bucket], max_diff: usize) {
    let sizes: Vec<usize> = buckets.iter().map(|b| b[0].len()).collect();
    let (Some(min), Some(max)) = (sizes.iter().min(), sizes.iter().max()) else {
        return;
    };
    assert!(
        max - min <= max_diff,
        "Bucket sizes differ by {} (> {max_diff}): {sizes:?}",
        max - min
    );
}

/// Assert that `batches` contain every id of `cuts` exactly once.
///
/// # Panics
///
/// Panics on a missing, duplicated or unexpected id.
pub fn assert_batches_cover(batches: &[Batch], cuts: &CutSet) {
    let mut counts: HashMap<&str, usize> = cuts.ids().map(|id| (id, 0)).collect();
    for id in batches.iter().flatten() {
        match counts.get_mut(id.as_str()) {
            Some(n) => *n += 1,
            None => panic!("Batch contains unexpected cut '{id}'"),
        }
    }
    let mut wrong: Vec<_> = counts.into_iter().filter(|&(_, n)| n != 1).collect();
    wrong.sort_unstable();
    assert!(wrong.is_empty(), "Cuts not sampled exactly once (id, times): {wrong:?}");
}
