use std::borrow::Cow;

use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::ExtractConfig;
use crate::document::Document;
use crate::error::CanonicalError;
use crate::html::walk_page;
use crate::stopwords::is_stopword;

/// Main entry point. Parses an HTML page and returns its canonical
/// [`Document`] (structure tokens, class set, normalized text tokens).
pub fn extract_html(
    id: impl Into<String>,
    html: &str,
    cfg: &ExtractConfig,
) -> Result<Document, CanonicalError> {
    cfg.validate()?;

    // A document id is required for traceability.
    let id: String = id.into();
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(CanonicalError::MissingDocId);
    }
    let id = if id.len() == trimmed.len() {
        id
    } else {
        trimmed.to_string()
    };

    if html.trim().is_empty() {
        return Err(CanonicalError::EmptyDocument(id));
    }

    let page = walk_page(html, cfg);
    let text_tokens = normalize_text(&page.text, cfg);

    Ok(Document {
        id,
        structure_tokens: page.structure_tokens,
        class_set: page.class_set,
        text_tokens,
        visual_features: None,
    })
}

/// Normalize free text into word tokens: NFKC, lowercase, punctuation
/// removal, whitespace split, stop-word removal and stemming, each step
/// gated by `cfg`.
pub fn normalize_text(text: &str, cfg: &ExtractConfig) -> Vec<String> {
    let normalized: Cow<str> = if cfg.normalize_unicode {
        Cow::Owned(text.nfkc().collect::<String>())
    } else {
        Cow::Borrowed(text)
    };

    let mut words: Vec<String> = Vec::with_capacity((normalized.len() / 6).saturating_add(1));
    let mut current = String::new();

    // Grapheme iteration keeps multi-codepoint characters intact; lowercasing
    // can expand one character into several.
    for grapheme in normalized.graphemes(true) {
        if cfg.lowercase {
            for ch in grapheme.to_lowercase().chars() {
                dispatch_char(ch, cfg, &mut current, &mut words);
            }
        } else {
            for ch in grapheme.chars() {
                dispatch_char(ch, cfg, &mut current, &mut words);
            }
        }
    }
    finalize_word(&mut current, &mut words);

    let stemmer = cfg.stem.then(|| Stemmer::create(Algorithm::English));
    words
        .into_iter()
        .filter(|word| !(cfg.remove_stopwords && is_stopword(word)))
        .map(|word| match &stemmer {
            Some(stemmer) => stemmer.stem(&word).into_owned(),
            None => word,
        })
        .collect()
}

/// Decides whether a character extends the current word, ends it, or is dropped.
fn dispatch_char(ch: char, cfg: &ExtractConfig, current: &mut String, words: &mut Vec<String>) {
    if ch.is_whitespace() {
        finalize_word(current, words);
    } else if cfg.strip_punctuation && !is_word_char(ch) {
        // Dropped without splitting: "it's" becomes "its".
    } else {
        current.push(ch);
    }
}

fn finalize_word(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

#[inline]
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
