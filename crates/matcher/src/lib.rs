//! # Similarity fusion (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` decides whether an LSH candidate is a clone of the target page.
//! It turns the two pages' signatures into per-signal similarities and fuses
//! them into one verdict:
//!
//! - **Structure** and **text**: `1 - hamming / 64` between SimHash fingerprints.
//! - **Class**: per [`ClassSimilarity`], a constant 1.0 for LSH candidates,
//!   the MinHash estimate, or the exact Jaccard of the class sets.
//! - **Visual** (optional): cosine of upstream feature vectors, used only when
//!   both pages carry vectors of the same length and `visual_weight > 0`.
//!
//! Structure and text each have a floor; a pair below either floor is rejected
//! whatever its combined score. Otherwise the weighted sum must reach
//! `combined_threshold`.
//!
//! ## Core Types
//!
//! - [`FusionConfig`]: floors, weights, thresholds and the class mode.
//! - [`DocumentView`] / [`Candidate`]: borrowed document + signature pairs.
//! - [`CandidateScore`]: per-signal similarities and the final verdict.
//! - [`Matcher`]: the stateless scoring engine.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{FusionConfig, Matcher, SignalScores};
//!
//! let matcher = Matcher::new(FusionConfig::default()).unwrap();
//!
//! // High text and class similarity cannot rescue a weak structure signal.
//! let outcome = matcher.evaluate(&SignalScores {
//!     structure_sim: 0.64,
//!     text_sim: 0.9,
//!     class_sim: 1.0,
//!     visual_sim: None,
//! });
//! assert!(outcome.gated);
//! assert!(!outcome.is_match);
//! ```

pub mod engine;
pub mod types;

pub use crate::engine::{cosine_similarity, exact_jaccard, Matcher};
pub use crate::types::{
    Candidate, CandidateScore, CandidateSource, ClassSimilarity, DocumentView, FusionConfig,
    FusionOutcome, MatchError, SignalScores, SCORE_TOLERANCE, WEIGHT_SUM_TOLERANCE,
};
