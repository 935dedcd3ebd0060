//! # Perceptual fingerprints for website clone detection
//!
//! This crate turns the three canonical streams of a page into compact,
//! similarity-preserving fingerprints:
//!
//! - **SimHash** (64-bit) of the `tag:depth` structure stream and of the
//!   text tokens. Near-identical streams land a few bits apart; similarity
//!   is `1 - hamming / 64`.
//! - **MinHash** of the class set. Equal sets give equal signatures and the
//!   fraction of agreeing slots estimates Jaccard similarity. The signature
//!   feeds the LSH index for candidate generation.
//!
//! ## Contract
//!
//! - Only canonical tokens are consumed; no normalization happens here.
//! - Every function is a pure function of `(tokens, config)`: no I/O, no
//!   clocks, no process-global state. The seed lives in
//!   [`PerceptualConfig`] and is never drawn per run.
//! - MinHash may run in parallel across slots; the output is bit-identical
//!   to the sequential path.
//!
//! ## Example Usage
//!
//! ```
//! use perceptual::{compute_signature, PerceptualConfig};
//!
//! let cfg = PerceptualConfig::default();
//! let a = compute_signature(&["html:1", "body:2", "div:3"], &["hero"], &["sale"], &cfg).unwrap();
//! let b = compute_signature(&["html:1", "body:2", "div:3"], &["hero"], &["sale"], &cfg).unwrap();
//!
//! assert_eq!(a.structure_fingerprint.distance(b.structure_fingerprint), 0);
//! assert_eq!(a.class_signature.len(), 128);
//! assert_eq!(a.class_signature.jaccard(&b.class_signature), 1.0);
//! ```

pub mod config;
mod minhash;
mod signature;
mod simhash;

pub use crate::config::{PerceptualConfig, PerceptualError};
pub use crate::minhash::{hash_token, minhash_signature, MinHashSignature};
#[cfg(feature = "with_canonical")]
pub use crate::signature::signature_for_document;
pub use crate::signature::{compute_signature, Signature};
pub use crate::simhash::{simhash, SimHashFingerprint, SIMHASH_BITS};

/// Current perceptual algorithm version for this crate.
pub const PERCEPTUAL_VERSION: u16 = 1;

/// Human-readable algorithm identifier.
pub const PERCEPTUAL_ALGORITHM: &str = "simhash64+minhash_v1";
