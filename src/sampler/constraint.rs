//! Batch size limits.

use crate::cut::Cut;
use serde::{Deserialize, Serialize};

/// Tracks how full the batch under construction is against optional
/// duration and count limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeConstraint {
    pub max_duration: Option<f64>,
    pub max_cuts: Option<usize>,
    #[serde(skip)]
    current_duration: f64,
    #[serde(skip)]
    num_cuts: usize,
    #[serde(skip)]
    longest_seen: f64,
}

impl TimeConstraint {
    #[must_use]
    pub const fn new(max_duration: Option<f64>, max_cuts: Option<usize>) -> Self {
        Self {
            max_duration,
            max_cuts,
            current_duration: 0.0,
            num_cuts: 0,
            longest_seen: 0.0,
        }
    }

    /// True if at least one limit is set.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.max_duration.is_some() || self.max_cuts.is_some()
    }

    pub fn add(&mut self, cut: &Cut) {
        self.current_duration += cut.duration;
        self.num_cuts += 1;
        self.longest_seen = self.longest_seen.max(cut.duration);
    }

    /// True if the batch is already over one of its limits.
    #[must_use]
    pub fn exceeded(&self) -> bool {
        self.max_duration.is_some_and(|m| self.current_duration > m)
            || self.max_cuts.is_some_and(|m| self.num_cuts > m)
    }

    /// True if adding `cut` would push the batch over one of its limits.
    #[must_use]
    pub fn would_exceed(&self, cut: &Cut) -> bool {
        let mut trial = *self;
        trial.add(cut);
        trial.exceeded()
    }

    /// True if the batch is full enough that another cut of the longest
    /// duration seen so far would not fit.
    #[must_use]
    pub fn close_to_exceeding(&self) -> bool {
        self.max_cuts.is_some_and(|m| self.num_cuts >= m)
            || self
                .max_duration
                .is_some_and(|m| self.current_duration + self.longest_seen > m)
    }

    pub fn reset(&mut self) {
        self.current_duration = 0.0;
        self.num_cuts = 0;
        self.longest_seen = 0.0;
    }

    #[must_use]
    pub const fn current_duration(&self) -> f64 {
        self.current_duration
    }

    #[must_use]
    pub const fn num_cuts(&self) -> usize {
        self.num_cuts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_to_limit_is_not_exceeded() {
        let mut c = TimeConstraint::new(Some(10.0), Some(2));
        c.add(&Cut::new("a", 4.0));
        c.add(&Cut::new("b", 6.0));
        assert!(!c.exceeded());
        assert!(c.would_exceed(&Cut::new("c", 0.5)));
        assert!(c.close_to_exceeding());
    }

    #[test]
    fn close_to_exceeding_uses_longest_cut() {
        let mut c = TimeConstraint::new(Some(10.0), None);
        c.add(&Cut::new("a", 4.0));
        assert!(!c.close_to_exceeding());
        c.add(&Cut::new("b", 3.0));
        assert!(c.close_to_exceeding());
        assert_eq!(c.current_duration(), 7.0);
        c.reset();
        assert_eq!(c.num_cuts(), 0);
        assert_eq!(c.current_duration(), 0.0);
        assert!(!c.close_to_exceeding());
    }
}
