//! Batches of cuts drawn from a single collection.

use super::base::{SamplerCore, delegate_cut_sampler};
use super::constraint::TimeConstraint;
use super::FromBucket;
use crate::cut_set::CutSet;
use crate::error::{Result, SamplingError};
use serde::{Deserialize, Serialize};

/// Limits and ordering for a [`SingleCutSampler`]. At least one limit must be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleCutSamplerConfig {
    /// Maximum total duration of a batch, in seconds.
    pub max_duration: Option<f64>,
    /// Maximum number of cuts in a batch.
    pub max_cuts: Option<usize>,
    /// Visit cuts in a random order, reseeded with `seed + epoch` on every reset.
    pub shuffle: bool,
    pub seed: u64,
}

impl SingleCutSamplerConfig {
    #[must_use]
    pub fn with_max_duration(max_duration: f64) -> Self {
        Self {
            max_duration: Some(max_duration),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_max_cuts(max_cuts: usize) -> Self {
        Self {
            max_cuts: Some(max_cuts),
            ..Default::default()
        }
    }
}

/// Packs consecutive cuts into batches bounded by total duration and/or cut count.
///
/// ```
/// use asr_bucketing::{Cut, CutSampler, CutSet, SingleCutSampler, SingleCutSamplerConfig};
///
/// # fn main() -> asr_bucketing::Result<()> {
/// let cuts = CutSet::from_cuts((0..5).map(|i| Cut::new(format!("c{i}"), 4.0)).collect())?;
/// let mut sampler = SingleCutSampler::new(cuts, false, &SingleCutSamplerConfig::with_max_duration(10.0))?;
///
/// assert_eq!(sampler.next_batch(), Some(vec!["c0".to_string(), "c1".to_string()]));
/// assert_eq!(sampler.num_batches(), Some(3));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SingleCutSampler {
    core: SamplerCore,
}

impl SingleCutSampler {
    /// # Errors
    ///
    /// Returns [`SamplingError::InvalidConfig`] if no limit is set or a limit is not positive.
    pub fn new(cuts: CutSet, drop_last: bool, config: &SingleCutSamplerConfig) -> Result<Self> {
        let limit = TimeConstraint::new(config.max_duration, config.max_cuts);
        let core = SamplerCore::new(vec![cuts], vec![limit], drop_last, config.shuffle, config.seed)?;
        Ok(Self { core })
    }
}

impl FromBucket for SingleCutSampler {
    type Config = SingleCutSamplerConfig;

    fn from_bucket(cut_sets: Vec<CutSet>, drop_last: bool, config: &Self::Config) -> Result<Self> {
        let actual = cut_sets.len();
        let Ok([cuts]) = <[CutSet; 1]>::try_from(cut_sets) else {
            return Err(SamplingError::WrongNumberOfCutSets {
                expected: 1,
                actual,
            });
        };
        Self::new(cuts, drop_last, config)
    }
}

delegate_cut_sampler!(SingleCutSampler);
