//! Analysis service port: review, chat and comment-thread replies.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::PortError;
use crate::model::{Analysis, Comment};

/// Boxed future type alias used by [`AnalysisService`] to keep the trait dyn-compatible.
pub type AnalysisFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PortError>> + Send + 'a>>;

/// A request to review a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// The full document text.
    pub document_text: String,
    /// Comments from the previous run, so the service can keep issue ids stable.
    pub existing_issues: Vec<Comment>,
}

/// A free-form chat message about the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// Current document text, sent as context.
    pub document_context: String,
    /// Session to continue, or `None` to start one.
    pub session_id: Option<String>,
}

/// The service's answer to a [`ChatRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant reply text.
    pub reply: String,
    /// Session the exchange was recorded under.
    pub session_id: String,
}

/// A user's reply inside an inline comment thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyRequest {
    /// The text the thread is anchored to.
    pub thread_context: String,
    /// What the user wrote.
    pub user_reply: String,
    /// Category of the original comment.
    pub issue_type: String,
    /// Body of the original comment.
    pub original_comment: String,
}

/// The service's answer to a [`ReplyRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyResponse {
    /// Reviewer response text.
    pub reply: String,
}

/// The external text-analysis service.
pub trait AnalysisService: Send + Sync {
    /// Reviews a document and returns scored, anchored comments.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable, rejects the request,
    /// or answers with a malformed or error-shaped body.
    fn analyze(&self, request: &AnalysisRequest) -> AnalysisFuture<'_, Analysis>;

    /// Continues (or starts) a chat session about the document.
    ///
    /// # Errors
    ///
    /// Same conditions as [`analyze`](Self::analyze).
    fn chat(&self, request: &ChatRequest) -> AnalysisFuture<'_, ChatReply>;

    /// Responds to a user reply in an inline comment thread.
    ///
    /// # Errors
    ///
    /// Same conditions as [`analyze`](Self::analyze).
    fn process_reply(&self, request: &ReplyRequest) -> AnalysisFuture<'_, ReplyResponse>;
}
