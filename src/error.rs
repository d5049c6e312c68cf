//! Run-level errors.
//!
//! Only failures that stop a whole review or chat cycle live here. A
//! comment that cannot be placed is a [`SkippedItem`](crate::annotate::SkippedItem),
//! never an error.

use thiserror::Error;

/// Errors that abort a review, apply or chat run before it does any work.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The document could not be read at all.
    #[error("Document unavailable: {0}")]
    DocumentUnavailable(String),

    /// The document has no reviewable text.
    #[error("Document is empty. Please write your RCA content first.")]
    EmptyDocument,

    /// A chat message or thread reply was blank.
    #[error("{0} is empty")]
    EmptyMessage(&'static str),

    /// The analysis service failed or answered with an error.
    #[error("Analysis service failed: {0}")]
    Upstream(String),

    /// Per-document state could not be read or written.
    #[error("Issue store error: {0}")]
    Store(String),

    /// A reply referenced an issue that was never applied.
    #[error("Unknown issue: {0}")]
    UnknownIssue(String),

    /// Configuration could not be loaded.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for run-level operations.
pub type Result<T> = std::result::Result<T, ReviewError>;
