//! Error type shared by the cut collections, bucket builders and samplers.
//!
//! End-of-data is never an error here: samplers signal it with `None`.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SamplingError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SamplingError {
    #[error("Unknown bucket_method: '{0}'. Use one of: 'equal_len' or 'equal_duration'.")]
    UnknownBucketMethod(String),

    #[error("Invalid sampler configuration: {0}")]
    InvalidConfig(String),

    #[error("At least one cut set is required")]
    NoCutSets,

    #[error("Expected {expected} parallel cut set(s), got {actual}")]
    WrongNumberOfCutSets { expected: usize, actual: usize },

    #[error("Cut sets are not aligned: cut '{0}' is missing from one of them")]
    MismatchedCutIds(String),

    #[error("Duplicate cut id '{0}'")]
    DuplicateCutId(String),
}
