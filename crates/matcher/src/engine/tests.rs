use super::*;

use canonical::Document;
use perceptual::{signature_for_document, PerceptualConfig, Signature};

use crate::types::{Candidate, ClassSimilarity, FusionConfig};

const LAYOUT: [&str; 6] = ["html:1", "head:2", "body:2", "div:3", "ul:4", "li:5"];
const COPY: [&str; 4] = ["summer", "sale", "shoe", "discount"];

fn doc(id: &str, classes: &[&str]) -> Document {
    Document::new(id)
        .with_structure_tokens(LAYOUT)
        .with_classes(classes.iter().copied())
        .with_text_tokens(COPY)
}

fn sig(doc: &Document) -> Signature {
    signature_for_document(doc, &PerceptualConfig::default()).unwrap()
}

fn signals(structure_sim: f64, text_sim: f64, class_sim: f64) -> SignalScores {
    SignalScores {
        structure_sim,
        text_sim,
        class_sim,
        visual_sim: None,
    }
}

fn default_matcher() -> Matcher {
    Matcher::new(FusionConfig::default()).unwrap()
}

// ==================== Fusion Tests ====================

#[test]
fn low_structure_similarity_is_gated_despite_high_combined() {
    let matcher = default_matcher();
    let outcome = matcher.evaluate(&signals(0.64, 0.9, 1.0));
    assert!(outcome.combined >= 0.7, "combined {}", outcome.combined);
    assert!(outcome.gated);
    assert!(!outcome.is_match);
}

#[test]
fn low_text_similarity_is_gated() {
    let outcome = default_matcher().evaluate(&signals(1.0, 0.5, 1.0));
    assert!(outcome.gated);
    assert!(!outcome.is_match);
}

#[test]
fn floors_are_inclusive() {
    let outcome = default_matcher().evaluate(&signals(0.65, 0.65, 1.0));
    assert!(!outcome.gated);
    // 0.325 + 0.3 + 0.13
    assert!((outcome.combined - 0.755).abs() < 1e-12);
    assert!(outcome.is_match);
}

#[test]
fn exact_decimal_boundary_matches() {
    // 0.5 * 1.0 + 0.3 * 0.0 + 0.2 * 1.0 == 0.7
    let outcome = default_matcher().evaluate(&signals(1.0, 1.0, 0.0));
    assert!(!outcome.gated);
    assert!(outcome.is_match);
}

#[test]
fn combined_below_threshold_is_not_a_match() {
    let outcome = default_matcher().evaluate(&signals(0.7, 0.7, 0.0));
    assert!(!outcome.gated);
    assert!((outcome.combined - 0.49).abs() < 1e-12);
    assert!(!outcome.is_match);
}

#[test]
fn visual_term_renormalizes_by_participating_weights() {
    let matcher = Matcher::new(FusionConfig::new().with_visual(1.0, 0.0)).unwrap();
    let mut s = signals(1.0, 1.0, 0.0);
    s.visual_sim = Some(0.8);
    let outcome = matcher.evaluate(&s);
    // (0.5 + 0.2 + 0.8) / 2.0
    assert!((outcome.combined - 0.75).abs() < 1e-12);
    assert!(outcome.is_match);
}

#[test]
fn absent_visual_signal_leaves_score_unchanged() {
    let plain = default_matcher().evaluate(&signals(0.9, 0.8, 1.0));
    let visual = Matcher::new(FusionConfig::new().with_visual(0.4, 0.5))
        .unwrap()
        .evaluate(&signals(0.9, 0.8, 1.0));
    assert_eq!(plain, visual);
}

#[test]
fn visual_floor_gates_only_when_participating() {
    let matcher = Matcher::new(FusionConfig::new().with_visual(0.4, 0.9)).unwrap();
    let mut s = signals(1.0, 1.0, 1.0);
    s.visual_sim = Some(0.5);
    assert!(matcher.evaluate(&s).gated);
    s.visual_sim = None;
    assert!(!matcher.evaluate(&s).gated);
}

#[test]
fn invalid_config_is_rejected_by_constructor() {
    let err = Matcher::new(FusionConfig::new().with_floors(1.5, 0.5)).unwrap_err();
    assert!(matches!(err, MatchError::InvalidConfig(msg) if msg.contains("min_structure_sim")));
}

#[test]
fn inflated_weights_are_rejected_by_constructor() {
    let err = Matcher::new(FusionConfig::new().with_weights(5.0, 5.0, 5.0)).unwrap_err();
    assert!(matches!(err, MatchError::InvalidConfig(msg) if msg.contains("sum to 1.0")));
}

// ==================== Pair Scoring Tests ====================

#[test]
fn identical_documents_match_with_full_scores() {
    let a = doc("a", &["nav", "hero"]);
    let b = doc("b", &["nav", "hero"]);
    let (sa, sb) = (sig(&a), sig(&b));

    let scores = default_matcher().score(
        DocumentView::new(&a, &sa),
        [Candidate::lsh(DocumentView::new(&b, &sb))],
    );

    assert_eq!(scores.len(), 1);
    let score = &scores[0];
    assert_eq!(score.candidate_id, "b");
    assert_eq!(score.signals.structure_sim, 1.0);
    assert_eq!(score.signals.text_sim, 1.0);
    assert_eq!(score.signals.class_sim, 1.0);
    assert!((score.combined - 1.0).abs() < 1e-12);
    assert!(score.is_match);
}

#[test]
fn self_is_skipped_before_scoring() {
    let a = doc("a", &["nav"]);
    let b = doc("b", &["nav"]);
    let (sa, sb) = (sig(&a), sig(&b));
    let target = DocumentView::new(&a, &sa);

    let scores = default_matcher().score(
        target,
        [
            Candidate::lsh(target),
            Candidate::lsh(DocumentView::new(&b, &sb)),
        ],
    );

    let ids: Vec<&str> = scores.iter().map(|s| s.candidate_id.as_str()).collect();
    assert_eq!(ids, vec!["b"]);
}

#[test]
fn scores_follow_candidate_order() {
    let docs: Vec<Document> = ["t", "c3", "c1", "c2"].iter().map(|id| doc(id, &["x"])).collect();
    let sigs: Vec<Signature> = docs.iter().map(sig).collect();
    let target = DocumentView::new(&docs[0], &sigs[0]);

    let candidates = docs[1..]
        .iter()
        .zip(&sigs[1..])
        .map(|(d, s)| Candidate::lsh(DocumentView::new(d, s)));
    let ids: Vec<String> = default_matcher()
        .score(target, candidates)
        .into_iter()
        .map(|s| s.candidate_id)
        .collect();

    assert_eq!(ids, vec!["c3", "c1", "c2"]);
}

#[test]
fn lsh_constant_scores_lsh_candidates_as_one() {
    let a = doc("a", &["x", "y"]);
    let b = doc("b", &["z"]);
    let (sa, sb) = (sig(&a), sig(&b));

    let s = default_matcher().signals(
        DocumentView::new(&a, &sa),
        Candidate::lsh(DocumentView::new(&b, &sb)),
    );
    assert_eq!(s.class_sim, 1.0);
}

#[test]
fn fallback_candidates_use_exact_jaccard_under_lsh_constant() {
    let a = doc("a", &["x", "y"]);
    let b = doc("b", &["y", "z"]);
    let (sa, sb) = (sig(&a), sig(&b));

    let score = default_matcher().score_pair(
        DocumentView::new(&a, &sa),
        Candidate::fallback(DocumentView::new(&b, &sb)),
    );
    assert_eq!(score.source, CandidateSource::Fallback);
    assert!((score.signals.class_sim - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn disjoint_classes_on_fallback_still_match_at_boundary() {
    let a = doc("a", &["alpha"]);
    let b = doc("b", &["beta"]);
    let (sa, sb) = (sig(&a), sig(&b));

    let score = default_matcher().score_pair(
        DocumentView::new(&a, &sa),
        Candidate::fallback(DocumentView::new(&b, &sb)),
    );
    assert_eq!(score.signals.class_sim, 0.0);
    assert!(score.is_match);
}

#[test]
fn exact_mode_applies_to_lsh_candidates_too() {
    let matcher = Matcher::new(FusionConfig::new().with_class_similarity(ClassSimilarity::Exact)).unwrap();
    let a = doc("a", &["x", "y"]);
    let b = doc("b", &["x"]);
    let (sa, sb) = (sig(&a), sig(&b));

    let s = matcher.signals(
        DocumentView::new(&a, &sa),
        Candidate::lsh(DocumentView::new(&b, &sb)),
    );
    assert_eq!(s.class_sim, 0.5);
}

#[test]
fn minhash_mode_uses_signature_estimate() {
    let matcher =
        Matcher::new(FusionConfig::new().with_class_similarity(ClassSimilarity::MinHashEstimate)).unwrap();
    let a = doc("a", &["x", "y"]);
    let b = doc("b", &["y", "x"]);
    let (sa, sb) = (sig(&a), sig(&b));

    let s = matcher.signals(
        DocumentView::new(&a, &sa),
        Candidate::lsh(DocumentView::new(&b, &sb)),
    );
    assert_eq!(s.class_sim, sa.class_signature.jaccard(&sb.class_signature));
    assert_eq!(s.class_sim, 1.0);
}

#[test]
fn empty_class_sets_score_zero_in_minhash_and_exact_modes() {
    let a = doc("a", &[]);
    let b = doc("b", &[]);
    let (sa, sb) = (sig(&a), sig(&b));
    assert_eq!(sa.class_signature.jaccard(&sb.class_signature), 1.0);

    for mode in [ClassSimilarity::MinHashEstimate, ClassSimilarity::Exact] {
        let matcher = Matcher::new(FusionConfig::new().with_class_similarity(mode)).unwrap();
        let s = matcher.signals(
            DocumentView::new(&a, &sa),
            Candidate::lsh(DocumentView::new(&b, &sb)),
        );
        assert_eq!(s.class_sim, 0.0, "{mode:?}");
    }
}

#[test]
fn visual_signal_requires_both_documents_and_equal_dimensions() {
    let matcher = Matcher::new(FusionConfig::new().with_visual(0.4, 0.0)).unwrap();
    let a = doc("a", &["x"]).with_visual_features(vec![1.0, 0.0]);
    let b = doc("b", &["x"]).with_visual_features(vec![1.0, 0.0]);
    let c = doc("c", &["x"]);
    let d = doc("d", &["x"]).with_visual_features(vec![1.0, 0.0, 0.0]);
    let (sa, sb, sc, sd) = (sig(&a), sig(&b), sig(&c), sig(&d));
    let target = DocumentView::new(&a, &sa);

    let with_b = matcher.signals(target, Candidate::lsh(DocumentView::new(&b, &sb)));
    let with_c = matcher.signals(target, Candidate::lsh(DocumentView::new(&c, &sc)));
    let with_d = matcher.signals(target, Candidate::lsh(DocumentView::new(&d, &sd)));

    assert_eq!(with_b.visual_sim, Some(1.0));
    assert_eq!(with_c.visual_sim, None);
    assert_eq!(with_d.visual_sim, None);
}

#[test]
fn visual_signal_ignored_when_weight_is_zero() {
    let a = doc("a", &["x"]).with_visual_features(vec![1.0, 2.0]);
    let b = doc("b", &["x"]).with_visual_features(vec![2.0, 1.0]);
    let (sa, sb) = (sig(&a), sig(&b));
    let s = default_matcher().signals(
        DocumentView::new(&a, &sa),
        Candidate::lsh(DocumentView::new(&b, &sb)),
    );
    assert_eq!(s.visual_sim, None);
}

#[test]
fn matches_filters_non_matches() {
    let a = doc("a", &["x"]);
    let b = doc("b", &["x"]);
    let c = Document::new("c")
        .with_structure_tokens(["table:3", "tr:4", "td:5"])
        .with_text_tokens(["unrelated", "content"]);
    let (sa, sb, sc) = (sig(&a), sig(&b), sig(&c));

    let matched = default_matcher().matches(
        DocumentView::new(&a, &sa),
        [
            Candidate::lsh(DocumentView::new(&c, &sc)),
            Candidate::lsh(DocumentView::new(&b, &sb)),
        ],
    );
    let ids: Vec<&str> = matched.iter().map(|s| s.candidate_id.as_str()).collect();
    assert_eq!(ids, vec!["b"]);
}

// ==================== Helper Tests ====================

#[test]
fn exact_jaccard_of_empty_sets_is_zero() {
    assert_eq!(exact_jaccard(&BTreeSet::new(), &BTreeSet::new()), 0.0);
}

#[test]
fn cosine_similarity_edge_cases() {
    assert_eq!(cosine_similarity(&[], &[]), None);
    assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), None);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), Some(0.0));
    assert_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), Some(0.0));
    let same = cosine_similarity(&[0.3, 0.4], &[0.6, 0.8]).unwrap();
    assert!((same - 1.0).abs() < 1e-9);
}
