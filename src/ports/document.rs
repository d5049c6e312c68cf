//! Document platform port: the live, mutable document being reviewed.

use std::future::Future;
use std::pin::Pin;

use super::PortError;
use crate::model::{Comment, TextRange};

/// Boxed future type alias used by [`DocumentPlatform`] to keep the trait dyn-compatible.
pub type DocumentFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PortError>> + Send + 'a>>;

/// The host document that annotations are attached to.
///
/// The text may change between any two calls, including as a result of
/// [`create_annotation`](Self::create_annotation) itself, so callers read it
/// fresh before every match.
pub trait DocumentPlatform: Send + Sync {
    /// Returns the full current text of the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read at all.
    fn read_full_text(&self) -> DocumentFuture<'_, String>;

    /// Highlights `range` and attaches `comment` to it.
    ///
    /// `range` indexes the text returned by the most recent
    /// [`read_full_text`](Self::read_full_text).
    ///
    /// # Errors
    ///
    /// Returns an error on any platform-level rejection (rate limit,
    /// transient API failure, stale range).
    fn create_annotation<'a>(
        &'a self,
        range: TextRange,
        comment: &'a Comment,
    ) -> DocumentFuture<'a, ()>;

    /// Returns a detached copy of the current document.
    ///
    /// The copy annotates the way this document does, so a plan applied to
    /// it sees the same text changes, but nothing reaches the original.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    fn snapshot(&self) -> DocumentFuture<'_, Box<dyn DocumentPlatform>>;
}
