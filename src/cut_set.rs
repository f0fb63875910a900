//! Ordered cut collections.
//!
//! A [`CutSet`] is either *eager* (its size and total duration are meaningful
//! up front) or *lazy* (it stands for a streamed manifest whose aggregate
//! statistics are unknown). Laziness is a property the samplers consult; every
//! collection derived from a lazy one (sorted, split, subset) stays lazy.

use crate::cut::Cut;
use crate::error::{Result, SamplingError};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutSet {
    cuts: Vec<Cut>,
    lazy: bool,
}

impl CutSet {
    /// Build an eager collection. Cut ids must be unique and durations
    /// nonnegative.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::DuplicateCutId`] if two cuts share an id, or
    /// [`SamplingError::InvalidConfig`] for a negative or NaN duration.
    pub fn from_cuts(cuts: Vec<Cut>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(cuts.len());
        for c in &cuts {
            if !(c.duration >= 0.0) {
                return Err(SamplingError::InvalidConfig(format!(
                    "cut '{}' has invalid duration {}",
                    c.id, c.duration
                )));
            }
            if !seen.insert(c.id.as_str()) {
                return Err(SamplingError::DuplicateCutId(c.id.clone()));
            }
        }
        Ok(Self { cuts, lazy: false })
    }

    /// Build a lazy collection, i.e. one whose statistics samplers must treat
    /// as unknown.
    ///
    /// # Errors
    ///
    /// Same as [`from_cuts`](Self::from_cuts).
    pub fn from_cuts_lazy(cuts: Vec<Cut>) -> Result<Self> {
        Ok(Self::from_cuts(cuts)?.into_lazy())
    }

    /// Mark this collection as lazily streamed.
    #[must_use]
    pub fn into_lazy(mut self) -> Self {
        self.lazy = true;
        self
    }

    fn derive(&self, cuts: Vec<Cut>) -> Self {
        Self {
            cuts,
            lazy: self.lazy,
        }
    }

    #[must_use]
    pub const fn is_lazy(&self) -> bool {
        self.lazy
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    #[must_use]
    pub fn cuts(&self) -> &[Cut] {
        &self.cuts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cut> {
        self.cuts.iter()
    }

    /// Cut ids in collection order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.cuts.iter().map(|c| c.id.as_str())
    }

    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.cuts.iter().map(|c| c.duration).sum()
    }

    /// Stable sort by duration. Cuts of equal duration keep their relative order.
    #[must_use]
    pub fn sort_by_duration(&self, ascending: bool) -> Self {
        let mut cuts = self.cuts.clone();
        if ascending {
            stable_sort_by_key(&mut cuts, |c| OrderedFloat(c.duration));
        } else {
            stable_sort_by_key(&mut cuts, |c| Reverse(OrderedFloat(c.duration)));
        }
        self.derive(cuts)
    }

    /// Reorder this collection so its ids follow `other`'s order.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::MismatchedCutIds`] unless both collections hold
    /// exactly the same ids.
    pub fn sort_like(&self, other: &Self) -> Result<Self> {
        let cuts = self.pick(other.ids())?;
        if cuts.len() != self.len() {
            let wanted: HashSet<&str> = other.ids().collect();
            let stray = self
                .ids()
                .find(|id| !wanted.contains(id))
                .unwrap_or_default();
            return Err(SamplingError::MismatchedCutIds(stray.to_string()));
        }
        Ok(self.derive(cuts))
    }

    /// Select the cuts with the given ids, in the order the ids are listed.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::MismatchedCutIds`] if an id is not present.
    pub fn subset<I, S>(&self, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.derive(self.pick(ids)?))
    }

    /// Split into one part per collection in `parts`, each holding the cuts
    /// with that part's ids, in that part's order.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::MismatchedCutIds`] if an id is not present.
    pub fn partition_like(&self, parts: &[Self]) -> Result<Vec<Self>> {
        let index = self.index();
        parts
            .iter()
            .map(|part| Ok(self.derive(self.pick_with(&index, part.ids())?)))
            .collect()
    }

    fn index(&self) -> HashMap<&str, usize> {
        self.cuts
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.as_str(), i))
            .collect()
    }

    fn pick<I, S>(&self, ids: I) -> Result<Vec<Cut>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.pick_with(&self.index(), ids)
    }

    fn pick_with<I, S>(&self, index: &HashMap<&str, usize>, ids: I) -> Result<Vec<Cut>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .map(|id| {
                let id = id.as_ref();
                index
                    .get(id)
                    .map(|&i| self.cuts[i].clone())
                    .ok_or_else(|| SamplingError::MismatchedCutIds(id.to_string()))
            })
            .collect()
    }

    /// Split into `num_splits` contiguous parts whose sizes differ by at most one.
    ///
    /// The first `len % num_splits` parts get the extra cut. Asking for more
    /// parts than there are cuts yields trailing empty parts.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::InvalidConfig`] when `num_splits` is zero.
    pub fn split(&self, num_splits: usize) -> Result<Vec<Self>> {
        if num_splits == 0 {
            return Err(SamplingError::InvalidConfig(
                "cannot split a cut set into 0 parts".to_string(),
            ));
        }
        let base = self.len() / num_splits;
        let extra = self.len() % num_splits;
        self.split_by_sizes((0..num_splits).map(|i| base + usize::from(i < extra)))
    }

    /// Split into contiguous parts of the given sizes, which must add up to
    /// the collection's length.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::InvalidConfig`] if the sizes do not add up.
    pub fn split_by_sizes<I>(&self, sizes: I) -> Result<Vec<Self>>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut parts = Vec::new();
        let mut start = 0;
        for size in sizes {
            let Some(part) = self.cuts.get(start..start + size) else {
                return Err(SamplingError::InvalidConfig(format!(
                    "split sizes exceed the {} cuts available",
                    self.len()
                )));
            };
            parts.push(self.derive(part.to_vec()));
            start += size;
        }
        if start != self.len() {
            return Err(SamplingError::InvalidConfig(format!(
                "split sizes cover {start} of {} cuts",
                self.len()
            )));
        }
        Ok(parts)
    }
}

impl<'a> IntoIterator for &'a CutSet {
    type Item = &'a Cut;
    type IntoIter = std::slice::Iter<'a, Cut>;

    fn into_iter(self) -> Self::IntoIter {
        self.cuts.iter()
    }
}

fn stable_sort_by_key<K, F>(cuts: &mut [Cut], key: F)
where
    K: Ord + Send,
    F: Fn(&Cut) -> K + Sync,
{
    #[cfg(feature = "parallel-sort")]
    {
        use rayon::slice::ParallelSliceMut;
        cuts.par_sort_by_key(key);
    }
    #[cfg(not(feature = "parallel-sort"))]
    cuts.sort_by_key(key);
}
