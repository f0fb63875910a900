//! Batches of aligned (source, target) cut pairs, e.g. for speech translation
//! or speech enhancement where each input cut has a paired output cut.

use super::base::{SamplerCore, delegate_cut_sampler};
use super::constraint::TimeConstraint;
use super::FromBucket;
use crate::cut_set::CutSet;
use crate::error::{Result, SamplingError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutPairsSamplerConfig {
    pub max_source_duration: Option<f64>,
    pub max_target_duration: Option<f64>,
    /// Maximum number of pairs in a batch.
    pub max_cuts: Option<usize>,
    pub shuffle: bool,
    pub seed: u64,
}

/// Samples pairs of cuts that share an id.
///
/// Both collections must list the same ids in the same order (the bucket
/// builders guarantee this). A pair is kept only if both cuts pass the
/// filters, and a batch closes as soon as either side's limit would be
/// exceeded. Remaining-duration statistics refer to the source side.
#[derive(Debug, Clone)]
pub struct CutPairsSampler {
    core: SamplerCore,
}

impl CutPairsSampler {
    /// # Errors
    ///
    /// Returns [`SamplingError::MismatchedCutIds`] if the two collections are not
    /// aligned, or [`SamplingError::InvalidConfig`] if no limit is set.
    pub fn new(
        source: CutSet,
        target: CutSet,
        drop_last: bool,
        config: &CutPairsSamplerConfig,
    ) -> Result<Self> {
        let limits = vec![
            TimeConstraint::new(config.max_source_duration, config.max_cuts),
            TimeConstraint::new(config.max_target_duration, config.max_cuts),
        ];
        let core = SamplerCore::new(
            vec![source, target],
            limits,
            drop_last,
            config.shuffle,
            config.seed,
        )?;
        Ok(Self { core })
    }
}

impl FromBucket for CutPairsSampler {
    type Config = CutPairsSamplerConfig;

    fn from_bucket(cut_sets: Vec<CutSet>, drop_last: bool, config: &Self::Config) -> Result<Self> {
        let actual = cut_sets.len();
        let Ok([source, target]) = <[CutSet; 2]>::try_from(cut_sets) else {
            return Err(SamplingError::WrongNumberOfCutSets {
                expected: 2,
                actual,
            });
        };
        Self::new(source, target, drop_last, config)
    }
}

delegate_cut_sampler!(CutPairsSampler);
