//! Synthetic cut sets.

use crate::cut::Cut;
use crate::cut_set::CutSet;

fn build(cuts: Vec<Cut>) -> CutSet {
    CutSet::from_cuts(cuts).expect("fixture ids are unique")
}

/// `n` cuts of identical duration, with ids `cut-0`, `cut-1`, ...
///
/// # Example
///
/// ```
/// use asr_bucketing::testing::uniform_cuts;
///
/// let cuts = uniform_cuts(8, 2.5);
/// assert_eq!(cuts.total_duration(), 20.0);
/// ```
#[must_use]
pub fn uniform_cuts(n: usize, duration: f64) -> CutSet {
    build((0..n).map(|i| Cut::new(format!("cut-{i}"), duration)).collect())
}

/// `n` cuts with durations evenly spaced from `min` to `max` (both included),
/// in ascending order.
///
/// # Example
///
/// ```
/// use asr_bucketing::testing::evenly_spread_cuts;
///
/// let cuts = evenly_spread_cuts(5, 1.0, 3.0);
/// let durations: Vec<f64> = cuts.iter().map(|c| c.duration).collect();
/// assert_eq!(durations, vec![1.0, 1.5, 2.0, 2.5, 3.0]);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn evenly_spread_cuts(n: usize, min: f64, max: f64) -> CutSet {
    let steps = n.saturating_sub(1).max(1) as f64;
    build(
        (0..n)
            .map(|i| Cut::new(format!("cut-{i}"), min + (max - min) * i as f64 / steps))
            .collect(),
    )
}

/// Reorder a cut set by visiting indices `0, stride, 2*stride, ...` modulo its
/// length. `stride` must be coprime with the length for the result to be a
/// permutation.
///
/// # Panics
///
/// Panics if the stride does not produce a permutation.
#[must_use]
pub fn strided(cuts: &CutSet, stride: usize) -> CutSet {
    let n = cuts.len();
    let ids: Vec<&str> = cuts.ids().collect();
    let order: Vec<&str> = (0..n).map(|i| ids[(i * stride) % n]).collect();
    let out = cuts.subset(order).expect("ids come from the same set");
    assert!(
        CutSet::from_cuts(out.cuts().to_vec()).is_ok(),
        "stride {stride} is not coprime with {n}"
    );
    out
}

/// Target-side counterpart of `source`: the same ids, in reverse order, with
/// every duration multiplied by `ratio`.
#[must_use]
pub fn paired_targets(source: &CutSet, ratio: f64) -> CutSet {
    build(
        source
            .iter()
            .rev()
            .map(|c| Cut::new(c.id.clone(), c.duration * ratio))
            .collect(),
    )
}
