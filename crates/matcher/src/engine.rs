use std::collections::BTreeSet;

use crate::types::{
    Candidate, CandidateScore, CandidateSource, ClassSimilarity, DocumentView, FusionConfig,
    FusionOutcome, MatchError, SignalScores, SCORE_TOLERANCE,
};

#[cfg(test)]
mod tests;

/// Similarity fusion engine.
///
/// Stateless apart from its validated [`FusionConfig`]; scoring a pair has
/// no side effects, so one matcher can be shared freely.
#[derive(Debug, Clone)]
pub struct Matcher {
    cfg: FusionConfig,
}

impl Matcher {
    /// Construct a matcher, rejecting an invalid configuration up front.
    pub fn new(cfg: FusionConfig) -> Result<Self, MatchError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &FusionConfig {
        &self.cfg
    }

    /// Score every candidate against `target`, in the order given.
    ///
    /// A candidate carrying the target's own id is skipped before scoring.
    pub fn score<'a, I>(&self, target: DocumentView<'_>, candidates: I) -> Vec<CandidateScore>
    where
        I: IntoIterator<Item = Candidate<'a>>,
    {
        candidates
            .into_iter()
            .filter(|candidate| candidate.view.id() != target.id())
            .map(|candidate| self.score_pair(target, candidate))
            .collect()
    }

    /// Like [`Matcher::score`], keeping only the matches.
    pub fn matches<'a, I>(&self, target: DocumentView<'_>, candidates: I) -> Vec<CandidateScore>
    where
        I: IntoIterator<Item = Candidate<'a>>,
    {
        let mut scores = self.score(target, candidates);
        scores.retain(|score| score.is_match);
        scores
    }

    /// Score a single pair.
    pub fn score_pair(&self, target: DocumentView<'_>, candidate: Candidate<'_>) -> CandidateScore {
        let signals = self.signals(target, candidate);
        let outcome = self.evaluate(&signals);
        CandidateScore {
            candidate_id: candidate.view.id().to_string(),
            source: candidate.source,
            signals,
            combined: outcome.combined,
            gated: outcome.gated,
            is_match: outcome.is_match,
        }
    }

    /// Per-signal similarities for a pair.
    pub fn signals(&self, target: DocumentView<'_>, candidate: Candidate<'_>) -> SignalScores {
        let structure_sim = target
            .signature
            .structure_similarity(candidate.view.signature);
        let text_sim = target.signature.text_similarity(candidate.view.signature);

        let class_sim = match (self.cfg.class_similarity, candidate.source) {
            (ClassSimilarity::LshConstant, CandidateSource::Lsh) => 1.0,
            (ClassSimilarity::LshConstant, CandidateSource::Fallback) | (ClassSimilarity::Exact, _) => {
                exact_jaccard(&target.document.class_set, &candidate.view.document.class_set)
            }
            (ClassSimilarity::MinHashEstimate, _) => {
                // Empty sets hash to all-`u64::MAX` slots; score them like `Exact`.
                if target.document.class_set.is_empty() && candidate.view.document.class_set.is_empty() {
                    0.0
                } else {
                    target
                        .signature
                        .class_signature
                        .jaccard(&candidate.view.signature.class_signature)
                }
            }
        };

        let visual_sim = if self.cfg.visual_weight > 0.0 {
            match (
                target.document.visual_features.as_deref(),
                candidate.view.document.visual_features.as_deref(),
            ) {
                (Some(a), Some(b)) => cosine_similarity(a, b),
                _ => None,
            }
        } else {
            None
        };

        SignalScores {
            structure_sim,
            text_sim,
            class_sim,
            visual_sim,
        }
    }

    /// Apply floors, weights and the combined threshold to a set of signals.
    pub fn evaluate(&self, signals: &SignalScores) -> FusionOutcome {
        let cfg = &self.cfg;

        let mut weighted = cfg.structure_weight * signals.structure_sim
            + cfg.class_weight * signals.class_sim
            + cfg.text_weight * signals.text_sim;

        let mut gated = below(signals.structure_sim, cfg.min_structure_sim)
            || below(signals.text_sim, cfg.min_text_sim);

        // The visual term renormalizes by the participating weights so pairs
        // with and without visual features share one scale.
        let combined = match signals.visual_sim {
            Some(visual_sim) if cfg.visual_weight > 0.0 => {
                gated |= below(visual_sim, cfg.min_visual_sim);
                weighted += cfg.visual_weight * visual_sim;
                let total = cfg.structure_weight + cfg.class_weight + cfg.text_weight + cfg.visual_weight;
                weighted / total
            }
            _ => weighted,
        };

        let is_match = !gated && combined >= cfg.combined_threshold - SCORE_TOLERANCE;
        FusionOutcome {
            combined,
            gated,
            is_match,
        }
    }
}

#[inline]
fn below(value: f64, floor: f64) -> bool {
    value < floor - SCORE_TOLERANCE
}

/// True Jaccard of two sets; two empty sets score 0.0.
pub fn exact_jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Cosine similarity of two feature vectors, clamped to `[0, 1]`.
///
/// `None` when the dimensions differ or either vector is empty. A zero
/// vector scores 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.0);
    }
    Some((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0))
}
