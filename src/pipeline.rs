use std::collections::HashSet;

use canonical::Document;
use cluster::{Cluster, ClusterBuilder};
use index::LshIndex;
use matcher::{Candidate, DocumentView, Matcher};
use perceptual::{PerceptualConfig, PerceptualError, Signature, signature_for_document};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::PipelineError;
use crate::config::WebcloneConfig;

/// Counters collected over one [`cluster_documents`] run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunStats {
    /// Documents admitted into the run.
    pub documents: usize,
    /// Documents rejected at admission (invalid or duplicate id).
    pub skipped: usize,
    /// Pairs proposed by the LSH index.
    pub candidate_pairs: usize,
    /// Pairs offered through the exhaustive fallback.
    pub fallback_pairs: usize,
    pub matched_pairs: usize,
    pub clusters: usize,
    pub singletons: usize,
}

/// Final clusters plus the counters of the run that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterRun {
    pub clusters: Vec<Cluster>,
    pub stats: RunStats,
}

/// Cluster a corpus of canonical documents.
///
/// Configuration errors and index failures abort the run. Individual
/// documents that fail validation, or whose id was already seen, are logged
/// and left out. Documents are processed in input order, so the same input
/// always yields the same clusters.
pub fn cluster_documents(
    docs: Vec<Document>,
    config: &WebcloneConfig,
) -> Result<ClusterRun, PipelineError> {
    config.validate()?;
    let lsh = config.lsh_config()?;
    let matcher = Matcher::new(config.matcher.clone())?;

    let span = info_span!("cluster_documents", input = docs.len());
    let _guard = span.enter();

    let mut stats = RunStats::default();
    let docs = admit(docs, &mut stats);
    if docs.is_empty() {
        info!(skipped = stats.skipped, "no documents to cluster");
        return Ok(ClusterRun {
            clusters: Vec::new(),
            stats,
        });
    }

    let signatures = fingerprint(&docs, &config.perceptual)?;
    info!(
        documents = docs.len(),
        parallel = config.perceptual.use_parallel,
        "signatures computed"
    );

    let index = LshIndex::build(
        lsh,
        docs.iter()
            .zip(&signatures)
            .map(|(doc, sig)| (doc.id.as_str(), sig.class_signature.as_slice())),
    )?;

    let view = |pos: usize| DocumentView::new(&docs[pos], &signatures[pos]);
    let mut builder = ClusterBuilder::new(config.cluster);

    for (pos, (doc, sig)) in docs.iter().zip(&signatures).enumerate() {
        let hits: Vec<usize> = index
            .query_positions(sig.class_signature.as_slice())?
            .into_iter()
            .filter(|&hit| hit != pos)
            .collect();

        let candidates: Vec<Candidate<'_>> =
            if hits.is_empty() && matcher.config().exhaustive_fallback {
                stats.fallback_pairs += pos;
                (0..pos).map(|earlier| Candidate::fallback(view(earlier))).collect()
            } else {
                stats.candidate_pairs += hits.len();
                hits.into_iter().map(|hit| Candidate::lsh(view(hit))).collect()
            };

        let matched = matcher.matches(view(pos), candidates);
        for score in &matched {
            debug!(
                doc = %doc.id,
                candidate = %score.candidate_id,
                combined = score.combined,
                source = ?score.source,
                "clone match"
            );
        }
        stats.matched_pairs += matched.len();

        let matched_ids: Vec<&str> = matched.iter().map(|s| s.candidate_id.as_str()).collect();
        builder.assign(doc.id.as_str(), &matched_ids)?;
    }

    let clusters = builder.into_clusters();
    stats.clusters = clusters.len();
    stats.singletons = clusters.iter().filter(|c| c.len() == 1).count();

    info!(
        documents = stats.documents,
        skipped = stats.skipped,
        candidate_pairs = stats.candidate_pairs,
        fallback_pairs = stats.fallback_pairs,
        matched_pairs = stats.matched_pairs,
        clusters = stats.clusters,
        singletons = stats.singletons,
        "clustering complete"
    );

    Ok(ClusterRun { clusters, stats })
}

/// Drop invalid documents and repeated ids, keeping input order.
fn admit(docs: Vec<Document>, stats: &mut RunStats) -> Vec<Document> {
    let mut seen: HashSet<String> = HashSet::with_capacity(docs.len());
    let mut admitted = Vec::with_capacity(docs.len());

    for doc in docs {
        if let Err(err) = doc.validate() {
            warn!(doc = %doc.id, error = %err, "skipping invalid document");
            stats.skipped += 1;
            continue;
        }
        if !seen.insert(doc.id.clone()) {
            warn!(doc = %doc.id, "skipping document with duplicate id");
            stats.skipped += 1;
            continue;
        }
        admitted.push(doc);
    }

    stats.documents = admitted.len();
    admitted
}

/// Signatures in document order; each document is fingerprinted independently.
fn fingerprint(docs: &[Document], cfg: &PerceptualConfig) -> Result<Vec<Signature>, PerceptualError> {
    if cfg.use_parallel {
        docs.par_iter()
            .map(|doc| signature_for_document(doc, cfg))
            .collect()
    } else {
        docs.iter()
            .map(|doc| signature_for_document(doc, cfg))
            .collect()
    }
}
