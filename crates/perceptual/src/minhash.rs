//! MinHash signatures over sets of string items.
//!
//! Signatures are fixed-length and deterministic: every item is hashed to a
//! `u64` with seeded xxh3, and slot `j` keeps the minimum of those hashes
//! after remixing under a per-slot key derived from the seed with splitmix64.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::config::PerceptualConfig;

/// Fixed-length MinHash signature of a set.
///
/// Equal sets always produce equal signatures under the same configuration.
/// The signature of the empty set is `u64::MAX` in every slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct MinHashSignature(Vec<u64>);

impl MinHashSignature {
    /// Wrap precomputed slot values.
    pub fn from_values(values: Vec<u64>) -> Self {
        Self(values)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Estimated Jaccard similarity: the fraction of slots on which both
    /// signatures agree. Only the common prefix is compared; two empty
    /// signatures estimate to 0.0.
    pub fn jaccard(&self, other: &MinHashSignature) -> f64 {
        let len = self.0.len().min(other.0.len());
        if len == 0 {
            return 0.0;
        }
        let agreeing = self
            .0
            .iter()
            .zip(other.0.iter())
            .filter(|(a, b)| a == b)
            .count();
        agreeing as f64 / len as f64
    }
}

impl AsRef<[u64]> for MinHashSignature {
    fn as_ref(&self) -> &[u64] {
        &self.0
    }
}

/// Stable 64-bit hash of a single token.
#[inline]
pub fn hash_token(token: &str, seed: u64) -> u64 {
    xxh3_64_with_seed(token.as_bytes(), seed)
}

/// Compute a MinHash signature of `num_hashes` slots over the set of `items`
/// (parallel across slots if `cfg.use_parallel = true`).
///
/// Duplicate items are collapsed first, so the result depends only on the
/// set of items, not on their order or multiplicity.
pub fn minhash_signature<S>(items: &[S], num_hashes: usize, cfg: &PerceptualConfig) -> MinHashSignature
where
    S: AsRef<str>,
{
    let mut unique: Vec<u64> = items
        .iter()
        .map(|item| hash_token(item.as_ref(), cfg.seed))
        .collect();
    unique.sort_unstable();
    unique.dedup();

    MinHashSignature(minhash_slots(&unique, num_hashes, cfg))
}

pub(crate) fn minhash_slots(unique: &[u64], m: usize, cfg: &PerceptualConfig) -> Vec<u64> {
    if m == 0 {
        return Vec::new();
    }

    if unique.is_empty() {
        return vec![u64::MAX; m];
    }

    let mut result = Vec::with_capacity(m);

    if cfg.use_parallel {
        (0..m)
            .into_par_iter()
            .map(|j| compute_slot(unique, j, cfg.seed))
            .collect_into_vec(&mut result);
    } else {
        for j in 0..m {
            result.push(compute_slot(unique, j, cfg.seed));
        }
    }

    result
}

/// Computes a single slot of the signature.
#[inline]
pub(crate) fn compute_slot(unique: &[u64], j: usize, seed: u64) -> u64 {
    // Each slot uses its own key to simulate an independent permutation.
    let step = (j as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let key = splitmix64(seed.wrapping_add(step));
    unique
        .iter()
        .map(|&val| mix_u64(val, key))
        .min()
        .unwrap_or(u64::MAX)
}

#[inline]
pub(crate) fn mix_u64(x: u64, key: u64) -> u64 {
    let mut h = xxh3_64_with_seed(&x.to_le_bytes(), key);
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51afd7ed558ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ceb9fe1a85ec53);
    h ^ (h >> 33)
}

#[inline]
pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
