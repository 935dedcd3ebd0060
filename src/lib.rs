//! Website clone detection.
//!
//! This crate stitches the pipeline stages together so callers can go from a
//! directory of HTML pages to a list of clone clusters with one call:
//!
//! ```text
//! canonical -> perceptual (SimHash, MinHash) -> index (LSH) -> matcher -> cluster -> report
//! ```
//!
//! - [`load_html_dir`] / [`load_documents_json`] build the corpus,
//!   tolerating per-document failures.
//! - [`cluster_documents`] fingerprints every document in parallel, builds
//!   the LSH index, then runs one ordered pass of query, fusion and
//!   assignment before merging and freezing the clusters.
//! - [`write_report`] renders one text file per cluster.
//!
//! All stage configuration is carried by [`WebcloneConfig`], loadable from
//! YAML. The library installs no global state; logging goes through
//! `tracing` and is only wired to an output by the binary.
//!
//! ```
//! use webclone::{cluster_documents, Document, WebcloneConfig};
//!
//! let page = |id: &str| {
//!     Document::new(id)
//!         .with_structure_tokens(["html:1", "head:2", "body:2", "div:3", "p:4"])
//!         .with_classes(["hero", "cta"])
//!         .with_text_tokens(["summer", "sale", "shoe"])
//! };
//! let docs = vec![page("a.html"), page("b.html")];
//!
//! let run = cluster_documents(docs, &WebcloneConfig::default()).unwrap();
//! assert_eq!(run.clusters.len(), 1);
//! assert_eq!(run.clusters[0].members(), ["a.html", "b.html"]);
//! ```

pub mod config;
mod corpus;
mod pipeline;
mod report;

use std::path::PathBuf;

use thiserror::Error;

pub use canonical::{CanonicalError, Document, ExtractConfig, extract_html, normalize_text};
pub use cluster::{Cluster, ClusterConfig, ClusterError, merge_overlapping};
pub use index::{IndexError, LshConfig};
pub use matcher::{ClassSimilarity, FusionConfig, MatchError};
pub use perceptual::{PerceptualConfig, PerceptualError, Signature};

pub use crate::config::{ConfigLoadError, WebcloneConfig};
pub use crate::corpus::{Corpus, LoadFailure, attach_visual_features, load_documents_json, load_html_dir};
pub use crate::pipeline::{ClusterRun, RunStats, cluster_documents};
pub use crate::report::{render_cluster, write_report, write_summary_json};

/// Errors that can abort a pipeline run.
///
/// Per-document problems never surface here; they are logged and the
/// document is left out of the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigLoadError),

    #[error("extraction failure: {0}")]
    Canonical(#[from] CanonicalError),

    #[error("fingerprinting failure: {0}")]
    Perceptual(#[from] PerceptualError),

    #[error("index failure: {0}")]
    Index(#[from] IndexError),

    #[error("fusion failure: {0}")]
    Match(#[from] MatchError),

    #[error("clustering failure: {0}")]
    Cluster(#[from] ClusterError),

    #[error("input directory not found: {0:?}")]
    MissingInput(PathBuf),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
