//! Error types for the diff crate.

use snapdiff_types::{DocumentKind, TypeError};

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// An input could not be represented as a document.
    #[error("malformed document: {0}")]
    Malformed(#[from] TypeError),

    /// Reconstruction tried to descend through a node that cannot hold the
    /// next path segment (a scalar, or a container of the other kind). This
    /// means the entry and the source document disagree about shape.
    #[error("cannot descend into {kind} at `{path}`")]
    UnsupportedPath { path: String, kind: DocumentKind },

    /// Comparison or reconstruction would nest deeper than the configured bound.
    #[error("path `{path}` exceeds the depth limit of {max_depth}")]
    DepthLimitExceeded { path: String, max_depth: usize },

    /// The old side of an entry was requested but the entry carries none.
    #[error("entry at `{0}` has no old value")]
    MissingOldValue(String),
}

/// Convenience alias for diff operations.
pub type Result<T> = std::result::Result<T, DiffError>;
