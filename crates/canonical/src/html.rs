//! DOM walk over a parsed HTML page.
//!
//! Depth is the number of ancestors of an element including the document
//! node itself, so the root `<html>` element sits at depth 1. The parser
//! is error tolerant and synthesizes missing `html`/`head`/`body` elements,
//! which therefore always appear in the structure stream.

use std::collections::BTreeSet;

use scraper::{Html, Node};

use crate::config::ExtractConfig;

/// Raw features collected from one page, before text normalization.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct PageFeatures {
    pub structure_tokens: Vec<String>,
    pub class_set: BTreeSet<String>,
    pub text: String,
}

pub(crate) fn walk_page(html: &str, cfg: &ExtractConfig) -> PageFeatures {
    let page = Html::parse_document(html);
    let mut features = PageFeatures::default();

    for node in page.tree.root().descendants() {
        match node.value() {
            Node::Element(element) => {
                let depth = node.ancestors().count();
                features
                    .structure_tokens
                    .push(format!("{}:{}", element.name(), depth));
                features
                    .class_set
                    .extend(element.classes().map(str::to_owned));
            }
            Node::Text(text) => {
                let skipped = node
                    .ancestors()
                    .filter_map(|ancestor| ancestor.value().as_element())
                    .any(|element| cfg.skips_text_of(element.name()));
                if skipped {
                    continue;
                }
                // Adjacent text nodes must not glue words together.
                if !features.text.is_empty() {
                    features.text.push(' ');
                }
                features.text.push_str(text);
            }
            _ => {}
        }
    }

    features
}
