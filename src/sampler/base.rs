//! Batching machinery shared by the concrete samplers.
//!
//! A [`SamplerCore`] walks one or more aligned cut sets ("views") in an
//! epoch-dependent order and packs consecutive cuts into batches until one of
//! the per-view [`TimeConstraint`]s would be exceeded.

use super::constraint::TimeConstraint;
use super::diagnostics::SamplingDiagnostics;
use super::Batch;
use crate::cut::{Cut, CutPredicate};
use crate::cut_set::CutSet;
use crate::error::{Result, SamplingError};
use log::warn;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::fmt;

/// Visiting order of one epoch plus the read position.
#[derive(Debug, Clone)]
struct Cursor {
    order: Vec<usize>,
    pos: usize,
    // suffix[i] = total duration of order[i..]; suffix[len] == 0.0 exactly
    suffix: Vec<f64>,
}

impl Cursor {
    fn new(cuts: &[Cut], shuffle: bool, seed: u64) -> Self {
        let mut order: Vec<usize> = (0..cuts.len()).collect();
        if shuffle {
            order.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
        }
        let mut suffix = vec![0.0; order.len() + 1];
        for i in (0..order.len()).rev() {
            suffix[i] = suffix[i + 1] + cuts[order[i]].duration;
        }
        Self {
            order,
            pos: 0,
            suffix,
        }
    }

    fn peek(&self) -> Option<usize> {
        self.order.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn remaining_cuts(&self) -> usize {
        self.order.len() - self.pos
    }

    fn remaining_duration(&self) -> f64 {
        self.suffix[self.pos]
    }
}

#[derive(Clone, Default)]
struct Filters(Vec<CutPredicate>);

impl Filters {
    fn accepts(&self, cut: &Cut) -> bool {
        self.0.iter().all(|p| p(cut))
    }
}

impl fmt::Debug for Filters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Filters({})", self.0.len())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SamplerCore {
    views: Vec<CutSet>,
    limits: Vec<TimeConstraint>,
    drop_last: bool,
    shuffle: bool,
    seed: u64,
    epoch: u64,
    cursor: Cursor,
    filters: Filters,
    diagnostics: SamplingDiagnostics,
}

impl SamplerCore {
    /// `limits[i]` applies to `views[i]`.
    pub(crate) fn new(
        views: Vec<CutSet>,
        limits: Vec<TimeConstraint>,
        drop_last: bool,
        shuffle: bool,
        seed: u64,
    ) -> Result<Self> {
        let Some(lead) = views.first() else {
            return Err(SamplingError::NoCutSets);
        };
        if views.len() != limits.len() {
            return Err(SamplingError::WrongNumberOfCutSets {
                expected: limits.len(),
                actual: views.len(),
            });
        }
        for other in &views[1..] {
            check_aligned(lead, other)?;
        }
        validate_limits(&limits)?;

        let cursor = Cursor::new(lead.cuts(), shuffle, seed);
        Ok(Self {
            views,
            limits,
            drop_last,
            shuffle,
            seed,
            epoch: 0,
            cursor,
            filters: Filters::default(),
            diagnostics: SamplingDiagnostics::default(),
        })
    }

    fn lead(&self) -> &CutSet {
        &self.views[0]
    }

    fn fresh_cursor(&self) -> Cursor {
        Cursor::new(
            self.lead().cuts(),
            self.shuffle,
            self.seed.wrapping_add(self.epoch),
        )
    }

    pub(crate) fn next_batch(&mut self) -> Option<Batch> {
        let indices = pack_batch(
            &self.views,
            &self.limits,
            &self.filters,
            self.drop_last,
            &mut self.cursor,
            &mut self.diagnostics,
            true,
        )?;
        let cuts = self.views[0].cuts();
        Some(indices.into_iter().map(|i| cuts[i].id.clone()).collect())
    }

    pub(crate) fn reset(&mut self) {
        self.cursor = self.fresh_cursor();
    }

    pub(crate) const fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn set_epoch(&mut self, epoch: u64) {
        self.epoch = epoch;
    }

    pub(crate) fn filter(&mut self, predicate: CutPredicate) {
        self.filters.0.push(predicate);
    }

    /// Statistics are only known when no view is streamed.
    fn is_eager(&self) -> bool {
        !self.views.iter().any(CutSet::is_lazy)
    }

    pub(crate) fn remaining_duration(&self) -> Option<f64> {
        self.is_eager().then(|| self.cursor.remaining_duration())
    }

    pub(crate) fn remaining_cuts(&self) -> Option<usize> {
        self.is_eager().then(|| self.cursor.remaining_cuts())
    }

    pub(crate) fn num_cuts(&self) -> Option<usize> {
        self.is_eager().then(|| self.lead().len())
    }

    /// Dry run over the current epoch's order.
    pub(crate) fn num_batches(&self) -> Option<usize> {
        if !self.is_eager() || !self.filters.0.is_empty() {
            return None;
        }
        let mut cursor = self.fresh_cursor();
        let mut scratch = SamplingDiagnostics::default();
        let mut count = 0;
        while pack_batch(
            &self.views,
            &self.limits,
            &self.filters,
            self.drop_last,
            &mut cursor,
            &mut scratch,
            false,
        )
        .is_some()
        {
            count += 1;
        }
        Some(count)
    }

    pub(crate) const fn diagnostics(&self) -> SamplingDiagnostics {
        self.diagnostics
    }
}

fn check_aligned(lead: &CutSet, other: &CutSet) -> Result<()> {
    if let Some((a, _)) = lead.ids().zip(other.ids()).find(|(a, b)| a != b) {
        return Err(SamplingError::MismatchedCutIds(a.to_string()));
    }
    if lead.len() != other.len() {
        let (longer, shorter) = if lead.len() > other.len() {
            (lead, other)
        } else {
            (other, lead)
        };
        let stray = longer.ids().nth(shorter.len()).unwrap_or_default();
        return Err(SamplingError::MismatchedCutIds(stray.to_string()));
    }
    Ok(())
}

fn validate_limits(limits: &[TimeConstraint]) -> Result<()> {
    if !limits.iter().any(TimeConstraint::is_active) {
        return Err(SamplingError::InvalidConfig(
            "at least one batch limit (max duration or max cuts) must be set".to_string(),
        ));
    }
    for limit in limits {
        if let Some(d) = limit.max_duration
            && !(d > 0.0)
        {
            return Err(SamplingError::InvalidConfig(format!(
                "max duration must be positive, got {d}"
            )));
        }
        if limit.max_cuts == Some(0) {
            return Err(SamplingError::InvalidConfig(
                "max cuts must be at least 1".to_string(),
            ));
        }
    }
    Ok(())
}

/// Pack the next batch starting at `cursor`, returning indices into the views.
///
/// A cut that would overflow a non-empty batch is left in the stream. A cut
/// that overflows an empty batch is yielded alone. An incomplete tail batch is
/// dropped under `drop_last`.
fn pack_batch(
    views: &[CutSet],
    limits: &[TimeConstraint],
    filters: &Filters,
    drop_last: bool,
    cursor: &mut Cursor,
    diagnostics: &mut SamplingDiagnostics,
    warn_oversized: bool,
) -> Option<Vec<usize>> {
    let mut limits = limits.to_vec();
    for l in &mut limits {
        l.reset();
    }
    let mut batch = Vec::new();

    // limits[0] tracks the lead view, whose durations the diagnostics report
    while let Some(idx) = cursor.peek() {
        let lead = &views[0].cuts()[idx];
        if !views.iter().all(|v| filters.accepts(&v.cuts()[idx])) {
            cursor.advance();
            diagnostics.record_discarded_cut(lead.duration);
            continue;
        }

        let overflow = limits
            .iter()
            .zip(views)
            .any(|(l, v)| l.would_exceed(&v.cuts()[idx]));
        if overflow && !batch.is_empty() {
            diagnostics.record_kept_batch(batch.len(), limits[0].current_duration());
            return Some(batch);
        }

        cursor.advance();
        for (l, v) in limits.iter_mut().zip(views) {
            l.add(&v.cuts()[idx]);
        }
        batch.push(idx);

        if overflow {
            if warn_oversized {
                warn!(
                    "Cut '{}' ({:.2}s) exceeds the batch limits on its own; yielding it as a single-cut batch",
                    lead.id, lead.duration
                );
            }
            diagnostics.record_kept_batch(1, limits[0].current_duration());
            return Some(batch);
        }
    }

    if batch.is_empty() {
        return None;
    }
    if drop_last && !limits.iter().any(TimeConstraint::close_to_exceeding) {
        diagnostics.record_discarded_batch(batch.len(), limits[0].current_duration());
        return None;
    }
    diagnostics.record_kept_batch(batch.len(), limits[0].current_duration());
    Some(batch)
}

/// Implement [`CutSampler`](crate::CutSampler) for a wrapper with a `core: SamplerCore` field.
macro_rules! delegate_cut_sampler {
    ($ty:ty) => {
        impl $crate::sampler::CutSampler for $ty {
            fn next_batch(&mut self) -> Option<$crate::sampler::Batch> {
                self.core.next_batch()
            }

            fn reset(&mut self) {
                self.core.reset();
            }

            fn epoch(&self) -> u64 {
                self.core.epoch()
            }

            fn set_epoch(&mut self, epoch: u64) {
                self.core.set_epoch(epoch);
            }

            fn filter(&mut self, predicate: $crate::cut::CutPredicate) {
                self.core.filter(predicate);
            }

            fn remaining_duration(&self) -> Option<f64> {
                self.core.remaining_duration()
            }

            fn remaining_cuts(&self) -> Option<usize> {
                self.core.remaining_cuts()
            }

            fn num_cuts(&self) -> Option<usize> {
                self.core.num_cuts()
            }

            fn num_batches(&self) -> Option<usize> {
                self.core.num_batches()
            }

            fn diagnostics(&self) -> $crate::sampler::SamplingDiagnostics {
                self.core.diagnostics()
            }
        }
    };
}

pub(crate) use delegate_cut_sampler;
