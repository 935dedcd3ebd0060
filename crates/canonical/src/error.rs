use thiserror::Error;

/// Errors that can occur while building a [`crate::Document`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("document requires a non-empty id")]
    MissingDocId,
    #[error("document `{0}` contains no markup")]
    EmptyDocument(String),
    #[error("document `{id}` is invalid: {reason}")]
    InvalidDocument { id: String, reason: String },
}
