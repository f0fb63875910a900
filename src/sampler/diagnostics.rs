//! Kept/discarded bookkeeping for samplers.
//!
//! [`SamplingDiagnostics`] is a plain counter record with an associative merge,
//! so the statistics of many per-bucket samplers can be folded into one:
//!
//! ```
//! use asr_bucketing::SamplingDiagnostics;
//!
//! let mut a = SamplingDiagnostics::default();
//! a.record_kept_batch(3, 12.0);
//! let mut b = SamplingDiagnostics::default();
//! b.record_discarded_cut(1.5);
//!
//! let total: SamplingDiagnostics = [a, b].into_iter().sum();
//! assert_eq!(total.kept_cuts, 3);
//! assert_eq!(total.discarded_cuts, 1);
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingDiagnostics {
    pub kept_cuts: u64,
    pub discarded_cuts: u64,
    pub kept_batches: u64,
    pub discarded_batches: u64,
    /// Seconds of audio yielded in batches.
    pub kept_duration: f64,
    /// Seconds of audio dropped by filters or by `drop_last`.
    pub discarded_duration: f64,
}

impl SamplingDiagnostics {
    pub fn record_kept_batch(&mut self, num_cuts: usize, duration: f64) {
        self.kept_batches += 1;
        self.kept_cuts += num_cuts as u64;
        self.kept_duration += duration;
    }

    /// A batch that was assembled and then dropped (incomplete tail under `drop_last`).
    pub fn record_discarded_batch(&mut self, num_cuts: usize, duration: f64) {
        self.discarded_batches += 1;
        self.discarded_cuts += num_cuts as u64;
        self.discarded_duration += duration;
    }

    /// A single cut rejected before it reached any batch.
    pub fn record_discarded_cut(&mut self, duration: f64) {
        self.discarded_cuts += 1;
        self.discarded_duration += duration;
    }

    #[must_use]
    pub const fn total_cuts(&self) -> u64 {
        self.kept_cuts + self.discarded_cuts
    }

    #[must_use]
    pub const fn total_batches(&self) -> u64 {
        self.kept_batches + self.discarded_batches
    }

    /// Human-readable summary of the sampling process so far.
    #[must_use]
    pub fn report(&self) -> String {
        self.to_string()
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON form to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.to_json()?.as_bytes())?;
        Ok(())
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

impl fmt::Display for SamplingDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sampling statistics:")?;
        writeln!(
            f,
            "Kept {}/{} ({:.2}%) cuts ({} cuts discarded).",
            self.kept_cuts,
            self.total_cuts(),
            percent(self.kept_cuts, self.total_cuts()),
            self.discarded_cuts
        )?;
        writeln!(
            f,
            "Kept {}/{} ({:.2}%) batches ({} batches discarded).",
            self.kept_batches,
            self.total_batches(),
            percent(self.kept_batches, self.total_batches()),
            self.discarded_batches
        )?;
        write!(
            f,
            "Overall, {:.0} seconds of supervision were discarded.",
            self.discarded_duration
        )
    }
}

impl AddAssign for SamplingDiagnostics {
    fn add_assign(&mut self, other: Self) {
        self.kept_cuts += other.kept_cuts;
        self.discarded_cuts += other.discarded_cuts;
        self.kept_batches += other.kept_batches;
        self.discarded_batches += other.discarded_batches;
        self.kept_duration += other.kept_duration;
        self.discarded_duration += other.discarded_duration;
    }
}

impl Add for SamplingDiagnostics {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl Sum for SamplingDiagnostics {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}
