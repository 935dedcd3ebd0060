//! Configuration and error types for the fingerprinting layer.
//!
//! The configuration is free of any I/O or environment-dependent behavior so
//! that every fingerprint is a pure function of `(tokens, config)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for SimHash fingerprints and MinHash signatures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PerceptualConfig {
    /// Bumped whenever a change to the hashing scheme can alter a fingerprint.
    pub version: u32,
    /// Number of MinHash permutations, i.e. the class signature length.
    pub num_hashes: usize,
    /// Seed for token hashing and the MinHash permutation family.
    ///
    /// Fixed by configuration, never drawn per run: two configs sharing the
    /// same seed produce bit-identical outputs for identical inputs.
    pub seed: u64,
    /// Compute MinHash slots in parallel.
    pub use_parallel: bool,
}

impl PerceptualConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of MinHash permutations. Typical values: 64-256.
    /// More permutations give a tighter Jaccard estimate at linear cost.
    pub fn with_num_hashes(mut self, num_hashes: usize) -> Self {
        self.num_hashes = num_hashes;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable parallel MinHash computation.
    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Reject a zero version or an empty signature.
    pub fn validate(&self) -> Result<(), PerceptualError> {
        if self.version < 1 {
            return Err(PerceptualError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if self.num_hashes < 1 {
            return Err(PerceptualError::InvalidConfigNumHashes {
                num_hashes: self.num_hashes,
            });
        }
        Ok(())
    }
}

impl Default for PerceptualConfig {
    fn default() -> Self {
        Self {
            version: 1,
            num_hashes: 128,
            seed: 0xF00D_BAAD_F00D_BAAD,
            use_parallel: false,
        }
    }
}

/// Errors returned by the fingerprinting layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PerceptualError {
    #[error("invalid config: num_hashes must be >= 1 (got {num_hashes})")]
    InvalidConfigNumHashes { num_hashes: usize },

    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },
}
