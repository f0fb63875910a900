//! Bucketing configuration.
//!
//! [`BucketingConfig`] carries the options owned by the bucketing sampler
//! itself. Options for the per-bucket samplers live in their own config types
//! ([`SingleCutSamplerConfig`](crate::SingleCutSamplerConfig),
//! [`CutPairsSamplerConfig`](crate::CutPairsSamplerConfig)) and are forwarded
//! verbatim to every bucket.
//!
//! Both kinds deserialize from JSON:
//!
//! ```
//! use asr_bucketing::{BucketMethod, BucketingConfig};
//!
//! let cfg = BucketingConfig::from_json_str(r#"{ "num_buckets": 4, "bucket_method": "equal_duration" }"#).unwrap();
//! assert_eq!(cfg.num_buckets, 4);
//! assert_eq!(cfg.bucket_method, BucketMethod::EqualDuration);
//! assert!(cfg.proportional_sampling);
//! ```

use crate::error::{Result, SamplingError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// How cuts are distributed over buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketMethod {
    /// Every bucket holds the same number of cuts (±1).
    #[default]
    EqualLen,
    /// Every bucket holds roughly the same cumulative duration.
    EqualDuration,
}

impl BucketMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EqualLen => "equal_len",
            Self::EqualDuration => "equal_duration",
        }
    }
}

impl FromStr for BucketMethod {
    type Err = SamplingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "equal_len" => Ok(Self::EqualLen),
            "equal_duration" => Ok(Self::EqualDuration),
            other => Err(SamplingError::UnknownBucketMethod(other.to_string())),
        }
    }
}

impl fmt::Display for BucketMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketingConfig {
    pub num_buckets: usize,
    pub bucket_method: BucketMethod,
    /// Drop incomplete batches, i.e. ones that depleted their bucket before
    /// reaching the batch limits.
    pub drop_last: bool,
    /// Favor buckets with more remaining duration when selecting the next batch.
    pub proportional_sampling: bool,
    /// Seed of the bucket-selection generator; each epoch uses `seed + epoch`.
    pub seed: u64,
}

impl Default for BucketingConfig {
    fn default() -> Self {
        Self {
            num_buckets: 10,
            bucket_method: BucketMethod::EqualLen,
            drop_last: false,
            proportional_sampling: true,
            seed: 0,
        }
    }
}

impl BucketingConfig {
    /// Select the bucket method by name (`"equal_len"` or `"equal_duration"`).
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::UnknownBucketMethod`] for any other name.
    pub fn with_bucket_method_name(mut self, name: &str) -> Result<Self> {
        self.bucket_method = name.parse()?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`SamplingError::InvalidConfig`] if `num_buckets` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.num_buckets == 0 {
            return Err(SamplingError::InvalidConfig(
                "num_buckets must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON, an unknown bucket method, or an
    /// invalid value.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_json::from_str(json).context("failed to parse bucketing config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content is invalid.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read bucketing config {}", path.display()))?;
        Self::from_json_str(&text)
    }
}
