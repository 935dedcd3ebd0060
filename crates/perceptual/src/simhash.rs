//! 64-bit SimHash over a bag of tokens.
//!
//! Every token occurrence votes on all 64 bits of its seeded xxh3 hash:
//! +1 where the bit is set, -1 where it is clear. Bit `i` of the
//! fingerprint is set iff the final tally for bit `i` is strictly positive.
//! Token order is irrelevant; repetition weighs a token up.

use serde::{Deserialize, Serialize};

use crate::minhash::hash_token;

/// Number of bits in a fingerprint.
pub const SIMHASH_BITS: u32 = 64;

/// A 64-bit SimHash fingerprint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SimHashFingerprint(pub u64);

impl SimHashFingerprint {
    pub fn bits(self) -> u64 {
        self.0
    }

    /// Hamming distance, in `[0, 64]`.
    #[inline]
    pub fn distance(self, other: SimHashFingerprint) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// `1 - distance / 64`, in `[0, 1]`.
    #[inline]
    pub fn similarity(self, other: SimHashFingerprint) -> f64 {
        1.0 - f64::from(self.distance(other)) / f64::from(SIMHASH_BITS)
    }
}

impl From<u64> for SimHashFingerprint {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

/// Fingerprint a token sequence. The empty sequence maps to `0`.
pub fn simhash<S>(tokens: &[S], seed: u64) -> SimHashFingerprint
where
    S: AsRef<str>,
{
    let mut counters = [0i64; SIMHASH_BITS as usize];

    for token in tokens {
        let h = hash_token(token.as_ref(), seed);
        for (bit, counter) in counters.iter_mut().enumerate() {
            if (h >> bit) & 1 == 1 {
                *counter += 1;
            } else {
                *counter -= 1;
            }
        }
    }

    let bits = counters
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .fold(0u64, |acc, (bit, _)| acc | (1u64 << bit));

    SimHashFingerprint(bits)
}
