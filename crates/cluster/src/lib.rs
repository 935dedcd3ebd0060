//! # Clone cluster builder
//!
//! Groups documents into clusters of mutual clones from the match lists the
//! fusion engine produces. Similarity is not transitive, so clustering is a
//! greedy chaining pass followed by a merge:
//!
//! 1. **Assign** each document once, in input order: it joins the earliest
//!    cluster containing any of its matches, or opens a new cluster.
//! 2. **Merge** clusters sharing a document id, transitively, with a
//!    union-find over cluster indices.
//! 3. **Dedup** repeated ids inside each cluster, first occurrence wins.
//! 4. **Freeze** the result.
//!
//! Every assigned id ends up in exactly one cluster, and the output depends
//! only on the order of assignment.
//!
//! ```
//! use cluster::{ClusterBuilder, ClusterConfig};
//!
//! let none: [&str; 0] = [];
//! let mut builder = ClusterBuilder::new(ClusterConfig::default());
//! builder.assign("a.html", &none).unwrap();
//! builder.assign("b.html", &["a.html"]).unwrap();
//! builder.assign("c.html", &none).unwrap();
//!
//! let clusters = builder.into_clusters();
//! assert_eq!(clusters.len(), 2);
//! assert_eq!(clusters[0].members(), ["a.html", "b.html"]);
//! ```

mod builder;
mod union_find;

pub use crate::builder::{merge_overlapping, Assignment, Cluster, ClusterBuilder, ClusterConfig, Phase};
pub use crate::union_find::DisjointSet;

use thiserror::Error;

/// Errors raised by the cluster builder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClusterError {
    #[error("document already assigned: {0}")]
    AlreadyAssigned(String),
    #[error("cannot {operation} while the builder is {phase}")]
    Phase {
        operation: &'static str,
        phase: Phase,
    },
}
