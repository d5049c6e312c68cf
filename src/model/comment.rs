//! Reviewer comments and the records kept for applied ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reviewer comment produced by the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Stable identifier, unique within one document's issue set.
    pub issue_id: String,
    /// Category label such as `"Causality gap"`. Display only.
    #[serde(default)]
    pub issue_type: String,
    /// The quoted snippet of the document this comment refers to.
    #[serde(default)]
    pub anchor_text: String,
    /// Human-readable feedback.
    #[serde(default)]
    pub comment_body: String,
    /// Resolved comments are never (re-)applied.
    #[serde(default)]
    pub resolved: bool,
}

impl Comment {
    /// Convenience constructor for an open comment.
    #[must_use]
    pub fn new(
        issue_id: impl Into<String>,
        issue_type: impl Into<String>,
        anchor_text: impl Into<String>,
        comment_body: impl Into<String>,
    ) -> Self {
        Self {
            issue_id: issue_id.into(),
            issue_type: issue_type.into(),
            anchor_text: anchor_text.into(),
            comment_body: comment_body.into(),
            resolved: false,
        }
    }
}

/// Persisted snapshot of a comment that was applied to the document.
///
/// A record says the annotation was created once. It does not say the
/// annotation is still visible: the document may have been edited since.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// The comment as it was when applied.
    pub comment: Comment,
    /// When the annotation was created.
    pub applied_at: DateTime<Utc>,
}

impl IssueRecord {
    /// Returns `true` when `comment` would produce the same annotation again.
    #[must_use]
    pub fn covers(&self, comment: &Comment) -> bool {
        self.comment.comment_body == comment.comment_body
            && self.comment.anchor_text == comment.anchor_text
    }
}

/// Half-open byte range `[start, end)` into a document's full text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    /// Byte offset of the first matched byte.
    pub start: usize,
    /// Byte offset one past the last matched byte.
    pub end: usize,
}

impl TextRange {
    /// Length of the range in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for a zero-length range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
