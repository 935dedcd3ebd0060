//! Canonical document layer for website clone detection.
//!
//! This crate turns a raw HTML page into the three deterministic inputs the
//! fingerprinting layer works on, and defines the [`Document`] type that
//! external feature-extraction collaborators can hand over directly.
//!
//! ## What we do
//!
//! - Structure stream: one `tag:depth` token per element, in document order
//! - Class set: every CSS class name used on the page, deduplicated
//! - Text stream: visible text (minus `script`/`style`), NFKC-normalized,
//!   lowercased, punctuation-stripped, stop-word-filtered and stemmed
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence. The same page and the same
//! [`ExtractConfig`] produce the same [`Document`] on any machine.
//!
//! ```
//! use canonical::{extract_html, ExtractConfig};
//!
//! let html = r#"<html><body><div class="hero"><p>Shopping carts</p></div></body></html>"#;
//! let doc = extract_html("shop.html", html, &ExtractConfig::default()).unwrap();
//!
//! assert_eq!(doc.structure_tokens[0], "html:1");
//! assert!(doc.class_set.contains("hero"));
//! assert_eq!(doc.text_tokens, vec!["shop", "cart"]);
//! ```

mod config;
mod document;
mod error;
mod html;
mod pipeline;
mod stopwords;

pub use crate::config::ExtractConfig;
pub use crate::document::Document;
pub use crate::error::CanonicalError;
pub use crate::pipeline::{extract_html, normalize_text};
