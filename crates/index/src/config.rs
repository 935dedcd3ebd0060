//! Banding parameters.
//!
//! A signature of `bands * rows_per_band` slots is cut into `bands` runs of
//! `rows_per_band` consecutive slots. Two documents become candidates when
//! at least one band matches exactly, which happens with probability
//! `1 - (1 - s^r)^b` for true Jaccard similarity `s`.

use serde::{Deserialize, Serialize};

use crate::IndexError;

/// Integration steps per unit interval for the S-curve error integrals.
const INTEGRATION_STEPS: usize = 256;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LshConfig {
    pub bands: usize,
    pub rows_per_band: usize,
}

impl Default for LshConfig {
    fn default() -> Self {
        Self {
            bands: 16,
            rows_per_band: 8,
        }
    }
}

impl LshConfig {
    pub fn new(bands: usize, rows_per_band: usize) -> Self {
        Self {
            bands,
            rows_per_band,
        }
    }

    pub fn with_bands(mut self, bands: usize) -> Self {
        self.bands = bands;
        self
    }

    pub fn with_rows_per_band(mut self, rows_per_band: usize) -> Self {
        self.rows_per_band = rows_per_band;
        self
    }

    /// Pick `(bands, rows_per_band)` for a target Jaccard `threshold`.
    ///
    /// Every split with `bands * rows <= num_hashes` is scored by the
    /// probability mass of false positives below the threshold plus false
    /// negatives above it, with equal weights; the lowest score wins and
    /// ties keep the split found first (fewest bands).
    pub fn from_threshold(threshold: f64, num_hashes: usize) -> Result<Self, IndexError> {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(IndexError::InvalidThreshold(threshold));
        }
        if num_hashes == 0 {
            return Err(IndexError::InvalidConfig(
                "num_hashes must be >= 1".to_string(),
            ));
        }

        let mut best = Self::new(1, 1);
        let mut best_error = f64::INFINITY;
        for bands in 1..=num_hashes {
            for rows in 1..=(num_hashes / bands) {
                let fp = false_positive_mass(threshold, bands, rows);
                let fn_ = false_negative_mass(threshold, bands, rows);
                let error = 0.5 * fp + 0.5 * fn_;
                if error < best_error {
                    best_error = error;
                    best = Self::new(bands, rows);
                }
            }
        }
        Ok(best)
    }

    /// Number of signature slots the banding consumes.
    pub fn signature_len(&self) -> usize {
        self.bands.saturating_mul(self.rows_per_band)
    }

    /// Similarity at which the candidate probability crosses one half,
    /// approximated as `(1/b)^(1/r)`.
    pub fn approximate_threshold(&self) -> f64 {
        (1.0 / self.bands as f64).powf(1.0 / self.rows_per_band as f64)
    }

    /// Probability that two documents with Jaccard similarity `s` share at
    /// least one bucket.
    pub fn candidate_probability(&self, s: f64) -> f64 {
        collision_probability(s, self.bands, self.rows_per_band)
    }

    pub fn validate(&self) -> Result<(), IndexError> {
        if self.bands == 0 {
            return Err(IndexError::InvalidConfig(
                "bands must be >= 1".to_string(),
            ));
        }
        if self.rows_per_band == 0 {
            return Err(IndexError::InvalidConfig(
                "rows_per_band must be >= 1".to_string(),
            ));
        }
        if self.bands.checked_mul(self.rows_per_band).is_none() {
            return Err(IndexError::InvalidConfig(format!(
                "bands * rows_per_band overflows ({} * {})",
                self.bands, self.rows_per_band
            )));
        }
        Ok(())
    }
}

#[inline]
fn collision_probability(s: f64, bands: usize, rows: usize) -> f64 {
    1.0 - (1.0 - s.powi(rows as i32)).powi(bands as i32)
}

fn false_positive_mass(threshold: f64, bands: usize, rows: usize) -> f64 {
    integrate(0.0, threshold, |s| collision_probability(s, bands, rows))
}

fn false_negative_mass(threshold: f64, bands: usize, rows: usize) -> f64 {
    integrate(threshold, 1.0, |s| 1.0 - collision_probability(s, bands, rows))
}

/// Composite Simpson's rule.
fn integrate(a: f64, b: f64, f: impl Fn(f64) -> f64) -> f64 {
    let n = ((INTEGRATION_STEPS as f64 * (b - a)).ceil() as usize).max(2);
    let n = if n % 2 == 0 { n } else { n + 1 };
    let h = (b - a) / n as f64;
    let mut sum = f(a) + f(b);
    for i in 1..n {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * f(a + i as f64 * h);
    }
    sum * h / 3.0
}
