//! The canonical per-document input consumed by the fingerprinting layer.
//!
//! A [`Document`] is either produced by [`crate::extract_html`] or handed over
//! as JSON by an external feature-extraction collaborator:
//!
//! ```json
//! {
//!   "id": "clones/tier1/site-a.html",
//!   "structure_tokens": ["html:1", "head:2", "body:2", "div:3"],
//!   "class_set": ["hero", "nav"],
//!   "text_tokens": ["welcom", "shop"],
//!   "visual_features": null
//! }
//! ```
//!
//! Documents are immutable once built; every derived artifact is a pure
//! function of these fields.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// One processed HTML page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Stable identifier (usually the source path), unique within a run.
    pub id: String,
    /// One `tag:depth` token per element, in document order. May repeat.
    #[serde(default)]
    pub structure_tokens: Vec<String>,
    /// Deduplicated CSS class names.
    #[serde(default)]
    pub class_set: BTreeSet<String>,
    /// Normalized word tokens, in document order.
    #[serde(default)]
    pub text_tokens: Vec<String>,
    /// Fixed-length visual embedding, present only when an upstream visual
    /// pipeline succeeded for this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_features: Option<Vec<f32>>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            structure_tokens: Vec::new(),
            class_set: BTreeSet::new(),
            text_tokens: Vec::new(),
            visual_features: None,
        }
    }

    pub fn with_structure_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.structure_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class_set = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_text_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_visual_features(mut self, features: Vec<f32>) -> Self {
        self.visual_features = Some(features);
        self
    }

    /// Whether an upstream visual pipeline supplied features for this page.
    pub fn has_visual_features(&self) -> bool {
        self.visual_features.is_some()
    }

    /// Check the invariants a document must satisfy before fingerprinting.
    ///
    /// Rejects blank ids and empty or non-finite visual vectors. Empty token
    /// streams and empty class sets are valid.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.id.trim().is_empty() {
            return Err(CanonicalError::MissingDocId);
        }
        if let Some(features) = &self.visual_features {
            if features.is_empty() {
                return Err(CanonicalError::InvalidDocument {
                    id: self.id.clone(),
                    reason: "visual_features must not be empty when present".into(),
                });
            }
            if features.iter().any(|v| !v.is_finite()) {
                return Err(CanonicalError::InvalidDocument {
                    id: self.id.clone(),
                    reason: "visual_features contains non-finite values".into(),
                });
            }
        }
        Ok(())
    }
}
