//! A sampler with scripted behavior.

use crate::cut::CutPredicate;
use crate::sampler::{Batch, CutSampler, SamplingDiagnostics};

/// Yields `batches_per_epoch` one-element batches (`"<label>-<n>"`) per epoch
/// and reports a fixed remaining duration until it runs dry.
///
/// # Example
///
/// ```
/// use asr_bucketing::CutSampler;
/// use asr_bucketing::testing::ScriptedSampler;
///
/// let mut s = ScriptedSampler::new("big", 2).with_remaining_duration(Some(100.0));
/// assert_eq!(s.next_batch(), Some(vec!["big-0".to_string()]));
/// assert_eq!(s.remaining_duration(), Some(100.0));
/// assert!(s.next_batch().is_some());
/// assert_eq!(s.next_batch(), None);
/// assert_eq!(s.remaining_duration(), Some(0.0));
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedSampler {
    label: String,
    batches_per_epoch: usize,
    remaining_duration: Option<f64>,
    yielded: usize,
    epoch: u64,
    filtered: bool,
    diagnostics: SamplingDiagnostics,
}

impl ScriptedSampler {
    #[must_use]
    pub fn new<S: Into<String>>(label: S, batches_per_epoch: usize) -> Self {
        Self {
            label: label.into(),
            batches_per_epoch,
            remaining_duration: Some(1.0),
            yielded: 0,
            epoch: 0,
            filtered: false,
            diagnostics: SamplingDiagnostics::default(),
        }
    }

    /// Remaining duration reported while batches are left; `None` acts like lazy data.
    #[must_use]
    pub const fn with_remaining_duration(mut self, remaining: Option<f64>) -> Self {
        self.remaining_duration = remaining;
        self
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub const fn yielded(&self) -> usize {
        self.yielded
    }

    const fn is_dry(&self) -> bool {
        self.yielded >= self.batches_per_epoch
    }
}

impl CutSampler for ScriptedSampler {
    fn next_batch(&mut self) -> Option<Batch> {
        if self.is_dry() {
            return None;
        }
        let batch = vec![format!("{}-{}", self.label, self.yielded)];
        self.yielded += 1;
        self.diagnostics.record_kept_batch(1, 0.0);
        Some(batch)
    }

    fn reset(&mut self) {
        self.yielded = 0;
    }

    fn epoch(&self) -> u64 {
        self.epoch
    }

    fn set_epoch(&mut self, epoch: u64) {
        self.epoch = epoch;
    }

    fn filter(&mut self, _predicate: CutPredicate) {
        self.filtered = true;
    }

    fn remaining_duration(&self) -> Option<f64> {
        if self.is_dry() {
            self.remaining_duration.map(|_| 0.0)
        } else {
            self.remaining_duration
        }
    }

    fn remaining_cuts(&self) -> Option<usize> {
        Some(self.batches_per_epoch - self.yielded)
    }

    fn num_cuts(&self) -> Option<usize> {
        Some(self.batches_per_epoch)
    }

    fn num_batches(&self) -> Option<usize> {
        (!self.filtered).then_some(self.batches_per_epoch)
    }

    fn diagnostics(&self) -> SamplingDiagnostics {
        self.diagnostics
    }
}
