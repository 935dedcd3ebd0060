//! Per-document signature: the three fingerprints the index and the fusion
//! engine consume.

use serde::{Deserialize, Serialize};

use crate::config::{PerceptualConfig, PerceptualError};
use crate::minhash::{minhash_signature, MinHashSignature};
use crate::simhash::{simhash, SimHashFingerprint};

/// Immutable fingerprint bundle for one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Signature {
    /// SimHash of the `tag:depth` structure stream.
    pub structure_fingerprint: SimHashFingerprint,
    /// SimHash of the normalized text tokens.
    pub text_fingerprint: SimHashFingerprint,
    /// MinHash of the class set, `num_hashes` slots long.
    pub class_signature: MinHashSignature,
}

impl Signature {
    pub fn structure_similarity(&self, other: &Signature) -> f64 {
        self.structure_fingerprint
            .similarity(other.structure_fingerprint)
    }

    pub fn text_similarity(&self, other: &Signature) -> f64 {
        self.text_fingerprint.similarity(other.text_fingerprint)
    }
}

/// Compute the [`Signature`] of one document from its raw streams.
///
/// The class items are treated as a set; the structure and text streams as
/// bags of tokens.
pub fn compute_signature<S, C, T>(
    structure_tokens: &[S],
    classes: &[C],
    text_tokens: &[T],
    cfg: &PerceptualConfig,
) -> Result<Signature, PerceptualError>
where
    S: AsRef<str>,
    C: AsRef<str>,
    T: AsRef<str>,
{
    cfg.validate()?;

    Ok(Signature {
        structure_fingerprint: simhash(structure_tokens, cfg.seed),
        text_fingerprint: simhash(text_tokens, cfg.seed),
        class_signature: minhash_signature(classes, cfg.num_hashes, cfg),
    })
}

/// Fingerprint a canonical [`canonical::Document`] directly.
#[cfg(feature = "with_canonical")]
pub fn signature_for_document(
    doc: &canonical::Document,
    cfg: &PerceptualConfig,
) -> Result<Signature, PerceptualError> {
    let classes: Vec<&str> = doc.class_set.iter().map(String::as_str).collect();
    compute_signature(&doc.structure_tokens, &classes, &doc.text_tokens, cfg)
}
