//! Configuration types for HTML feature extraction.
//!
//! [`ExtractConfig`] controls how a raw HTML page is turned into the three
//! canonical inputs consumed by the fingerprinting layer: the structure token
//! stream, the CSS class set and the normalized text token stream.
//!
//! # Versioning
//!
//! The `version` field exists for replayability. Any change to extraction
//! behavior that can alter the produced tokens must be accompanied by a
//! version bump, otherwise fingerprints computed by different builds stop
//! being comparable.
//!
//! # Examples
//!
//! ```rust
//! use canonical::ExtractConfig;
//!
//! let config = ExtractConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(config.remove_stopwords);
//! assert!(config.stem);
//! ```
//!
//! ## Keeping raw words
//!
//! ```rust
//! use canonical::ExtractConfig;
//!
//! let config = ExtractConfig::new().with_stopwords(false).with_stemming(false);
//! assert!(!config.stem);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Configuration for the extraction pipeline.
///
/// Serializes as:
///
/// ```json
/// {
///   "version": 1,
///   "normalize_unicode": true,
///   "lowercase": true,
///   "strip_punctuation": true,
///   "remove_stopwords": true,
///   "stem": true,
///   "skip_text_tags": ["script", "style"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExtractConfig {
    /// Extraction behavior version. Must be >= 1.
    pub version: u32,

    /// Apply Unicode NFKC normalization to page text before any other
    /// transform, so composed and decomposed forms produce the same tokens.
    pub normalize_unicode: bool,

    /// Apply locale-free Unicode lowercasing to page text.
    pub lowercase: bool,

    /// Remove every character that is neither a word character
    /// (alphanumeric or `_`) nor whitespace.
    ///
    /// Removed characters do not split words:
    ///
    /// ```text
    /// "It's 100% fun." → "its 100 fun"
    /// ```
    pub strip_punctuation: bool,

    /// Drop English stop words after lowercasing.
    pub remove_stopwords: bool,

    /// Reduce every remaining word to its English stem.
    pub stem: bool,

    /// Elements whose descendant text never contributes text tokens.
    ///
    /// Structure tokens and classes of these elements are still recorded.
    pub skip_text_tags: Vec<String>,
}

impl ExtractConfig {
    /// Create a new configuration with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    pub fn with_lowercase(mut self, enabled: bool) -> Self {
        self.lowercase = enabled;
        self
    }

    pub fn with_punctuation_stripping(mut self, enabled: bool) -> Self {
        self.strip_punctuation = enabled;
        self
    }

    pub fn with_stopwords(mut self, remove: bool) -> Self {
        self.remove_stopwords = remove;
        self
    }

    pub fn with_stemming(mut self, enabled: bool) -> Self {
        self.stem = enabled;
        self
    }

    /// Replace the list of elements whose text is ignored.
    pub fn with_skip_text_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_text_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        if self.skip_text_tags.iter().any(|tag| tag.trim().is_empty()) {
            return Err(CanonicalError::InvalidConfig(
                "skip_text_tags must not contain empty tag names".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn skips_text_of(&self, tag: &str) -> bool {
        self.skip_text_tags
            .iter()
            .any(|skipped| skipped.eq_ignore_ascii_case(tag))
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            version: 1,
            normalize_unicode: true,
            lowercase: true,
            strip_punctuation: true,
            remove_stopwords: true,
            stem: true,
            skip_text_tags: vec!["script".to_string(), "style".to_string()],
        }
    }
}
