//! The atomic unit of sampling.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single labeled audio segment.
///
/// The samplers only look at `id` and `duration`; everything else about the
/// segment (audio source, supervisions, features) lives outside this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cut {
    pub id: String,
    /// Duration in seconds.
    pub duration: f64,
}

impl Cut {
    #[must_use]
    pub fn new<S: Into<String>>(id: S, duration: f64) -> Self {
        Self {
            id: id.into(),
            duration,
        }
    }
}

/// Cut-level inclusion predicate accepted by [`CutSampler::filter`](crate::CutSampler::filter).
pub type CutPredicate = Arc<dyn Fn(&Cut) -> bool + Send + Sync>;

/// Wrap a closure into a [`CutPredicate`].
///
/// ```
/// use asr_bucketing::{predicate, Cut};
///
/// let short = predicate(|c: &Cut| c.duration <= 20.0);
/// assert!(short(&Cut::new("a", 3.0)));
/// ```
pub fn predicate<F>(f: F) -> CutPredicate
where
    F: Fn(&Cut) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}
