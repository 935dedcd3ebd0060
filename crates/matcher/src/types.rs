use canonical::Document;
use perceptual::Signature;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Absolute slack applied to every threshold comparison, so decimal
/// boundaries such as `0.5 + 0.2 >= 0.7` hold despite binary rounding.
pub const SCORE_TOLERANCE: f64 = 1e-9;

/// Allowed deviation of the structure, class and text weights from a sum of 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// How the class-set signal is scored for a candidate pair.
///
/// `MinHashEstimate` and `Exact` both score two empty class sets as 0.0.
/// Under `LshConstant` two classless pages that collide in the index still
/// score 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassSimilarity {
    /// Every LSH candidate scores 1.0: sharing a bucket already implies class
    /// overlap. Fallback candidates are scored with the exact Jaccard.
    #[default]
    LshConstant,
    /// Fraction of agreeing MinHash slots (0.0 when both sets are empty).
    MinHashEstimate,
    /// True Jaccard over the two class sets (0.0 when both are empty).
    Exact,
}

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Shared at least one LSH bucket with the target.
    Lsh,
    /// Offered because the LSH query found nothing besides the target itself.
    Fallback,
}

/// Weights, floors and thresholds for fusing the per-signal similarities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FusionConfig {
    /// Structure similarity floor; a pair below it is never a match.
    pub min_structure_sim: f64,
    /// Text similarity floor; a pair below it is never a match.
    pub min_text_sim: f64,
    pub structure_weight: f64,
    pub class_weight: f64,
    pub text_weight: f64,
    /// Minimum combined score for a match.
    pub combined_threshold: f64,
    pub class_similarity: ClassSimilarity,
    /// Weight of the visual cosine signal. `0.0` disables it.
    pub visual_weight: f64,
    /// Visual similarity floor, applied only when the visual signal participates.
    pub min_visual_sim: f64,
    /// Offer every earlier document as a candidate when the LSH query comes
    /// back with nothing but the target.
    pub exhaustive_fallback: bool,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            min_structure_sim: 0.65,
            min_text_sim: 0.65,
            structure_weight: 0.5,
            class_weight: 0.3,
            text_weight: 0.2,
            combined_threshold: 0.7,
            class_similarity: ClassSimilarity::default(),
            visual_weight: 0.0,
            min_visual_sim: 0.0,
            exhaustive_fallback: false,
        }
    }
}

impl FusionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_floors(mut self, min_structure_sim: f64, min_text_sim: f64) -> Self {
        self.min_structure_sim = min_structure_sim;
        self.min_text_sim = min_text_sim;
        self
    }

    pub fn with_weights(mut self, structure: f64, class: f64, text: f64) -> Self {
        self.structure_weight = structure;
        self.class_weight = class;
        self.text_weight = text;
        self
    }

    pub fn with_combined_threshold(mut self, threshold: f64) -> Self {
        self.combined_threshold = threshold;
        self
    }

    pub fn with_class_similarity(mut self, mode: ClassSimilarity) -> Self {
        self.class_similarity = mode;
        self
    }

    pub fn with_visual(mut self, weight: f64, min_visual_sim: f64) -> Self {
        self.visual_weight = weight;
        self.min_visual_sim = min_visual_sim;
        self
    }

    pub fn with_exhaustive_fallback(mut self, enabled: bool) -> Self {
        self.exhaustive_fallback = enabled;
        self
    }

    /// Validate thresholds and weights.
    pub fn validate(&self) -> Result<(), MatchError> {
        let thresholds = [
            ("min_structure_sim", self.min_structure_sim),
            ("min_text_sim", self.min_text_sim),
            ("combined_threshold", self.combined_threshold),
            ("min_visual_sim", self.min_visual_sim),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(MatchError::InvalidConfig(format!(
                    "{name} must be between 0.0 and 1.0 (got {value})"
                )));
            }
        }

        let weights = [
            ("structure_weight", self.structure_weight),
            ("class_weight", self.class_weight),
            ("text_weight", self.text_weight),
            ("visual_weight", self.visual_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchError::InvalidConfig(format!(
                    "{name} must be a finite value >= 0.0 (got {value})"
                )));
            }
        }
        // The visual weight is exempt: its term is renormalized when it participates.
        let sum = self.structure_weight + self.class_weight + self.text_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(MatchError::InvalidConfig(format!(
                "structure_weight + class_weight + text_weight must sum to 1.0 (got {sum})"
            )));
        }
        Ok(())
    }
}

/// A document together with its precomputed signature.
#[derive(Debug, Clone, Copy)]
pub struct DocumentView<'a> {
    pub document: &'a Document,
    pub signature: &'a Signature,
}

impl<'a> DocumentView<'a> {
    pub fn new(document: &'a Document, signature: &'a Signature) -> Self {
        Self {
            document,
            signature,
        }
    }

    pub fn id(&self) -> &'a str {
        &self.document.id
    }
}

/// A candidate offered to the fusion engine.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub view: DocumentView<'a>,
    pub source: CandidateSource,
}

impl<'a> Candidate<'a> {
    pub fn lsh(view: DocumentView<'a>) -> Self {
        Self {
            view,
            source: CandidateSource::Lsh,
        }
    }

    pub fn fallback(view: DocumentView<'a>) -> Self {
        Self {
            view,
            source: CandidateSource::Fallback,
        }
    }
}

/// Per-signal similarities of one pair, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SignalScores {
    pub structure_sim: f64,
    pub text_sim: f64,
    pub class_sim: f64,
    /// `None` when the visual signal does not participate for this pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_sim: Option<f64>,
}

/// Outcome of fusing one pair's signals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FusionOutcome {
    pub combined: f64,
    /// A per-signal floor rejected the pair regardless of `combined`.
    pub gated: bool,
    pub is_match: bool,
}

/// Full scoring record for one candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateScore {
    pub candidate_id: String,
    pub source: CandidateSource,
    pub signals: SignalScores,
    pub combined: f64,
    pub gated: bool,
    pub is_match: bool,
}

/// Errors produced by the fusion layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
}
