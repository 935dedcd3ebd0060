//! # MinHash LSH index
//!
//! Candidate generation for clone detection. Each document's MinHash
//! signature is cut into bands; documents landing in the same bucket of at
//! least one band become candidates for full scoring.
//!
//! ## Core Features
//!
//! - **Banding**: `bands x rows_per_band` (default 16 x 8) over the first
//!   `bands * rows_per_band` signature slots. Identical signatures collide in
//!   every band, so an exact duplicate is always a candidate.
//! - **Parameter selection**: [`LshConfig::from_threshold`] chooses the split
//!   that best separates pairs above and below a target Jaccard threshold.
//! - **Deterministic answers**: queries return ids in insertion order.
//! - **Build then freeze**: the index is built in one pass by a single
//!   writer, then only read; it is `Send + Sync` and can be shared by
//!   reference across threads.
//!
//! The index only sees `&[u64]` slices, so any MinHash representation that
//! implements `AsRef<[u64]>` can be indexed.
//!
//! ## Example Usage
//!
//! ```
//! use index::{LshConfig, LshIndex};
//!
//! let a: Vec<u64> = (0..128).collect();
//! let b: Vec<u64> = (1000..1128).collect();
//!
//! let index = LshIndex::build(LshConfig::default(), [("a.html", &a), ("b.html", &b)]).unwrap();
//!
//! assert_eq!(index.query(&a).unwrap(), vec!["a.html"]);
//! assert!(index.query_excluding(&a, "a.html").unwrap().is_empty());
//! ```

mod config;
mod lsh;

pub use crate::config::LshConfig;
pub use crate::lsh::LshIndex;

use thiserror::Error;

/// Errors raised while building or querying the index.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IndexError {
    #[error("invalid index config: {0}")]
    InvalidConfig(String),
    #[error("invalid LSH threshold {0}; expected a value in (0, 1)")]
    InvalidThreshold(f64),
    #[error("signature too short for banding: need {expected} slots, got {got}")]
    SignatureLength { expected: usize, got: usize },
    #[error("duplicate document id in index: {0}")]
    DuplicateId(String),
}
