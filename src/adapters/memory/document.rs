//! In-memory document.
//!
//! Annotations are recorded beside the text rather than written into it,
//! the way a hosted editor keeps comments out of the body. Tests can edit
//! the text, make it unreadable, or make individual annotations fail.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::EventLog;
use crate::model::{Comment, TextRange};
use crate::ports::{DocumentFuture, DocumentPlatform, PortError};

/// An annotation created on an [`InMemoryDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAnnotation {
    /// Issue the annotation belongs to.
    pub issue_id: String,
    /// Highlighted range.
    pub range: TextRange,
    /// The text under the range when the annotation was created.
    pub quoted: String,
    /// Comment body attached to the range.
    pub body: String,
}

#[derive(Debug, Default)]
struct DocumentState {
    text: Option<String>,
    annotations: Vec<RecordedAnnotation>,
    failures: HashMap<String, String>,
    edits: HashMap<String, String>,
    reads: usize,
    log: Option<EventLog>,
}

/// Document held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocument {
    state: Arc<Mutex<DocumentState>>,
}

impl InMemoryDocument {
    /// Creates a readable document with the given text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let doc = Self::default();
        doc.set_text(text);
        doc
    }

    /// Creates a document whose every read fails.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Also appends `read` and `create:<issue_id>` to `log` on every call.
    #[must_use]
    pub fn with_log(self, log: EventLog) -> Self {
        self.lock().log = Some(log);
        self
    }

    /// Replaces the text, as if the author edited the document.
    pub fn set_text(&self, text: impl Into<String>) {
        self.lock().text = Some(text.into());
    }

    /// Replaces the text with `text` right after the annotation for
    /// `issue_id` is created, as if the author typed while comments were
    /// being placed.
    pub fn edit_after(&self, issue_id: impl Into<String>, text: impl Into<String>) {
        self.lock().edits.insert(issue_id.into(), text.into());
    }

    /// Makes every annotation for `issue_id` fail with `message`.
    pub fn fail_issue(&self, issue_id: impl Into<String>, message: impl Into<String>) {
        self.lock().failures.insert(issue_id.into(), message.into());
    }

    /// Annotations created so far, in creation order.
    #[must_use]
    pub fn annotations(&self) -> Vec<RecordedAnnotation> {
        self.lock().annotations.clone()
    }

    /// Number of full-text reads so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.lock().reads
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DocumentState> {
        self.state.lock().expect("document lock poisoned")
    }
}

impl DocumentPlatform for InMemoryDocument {
    fn read_full_text(&self) -> DocumentFuture<'_, String> {
        let result = {
            let mut state = self.lock();
            state.reads += 1;
            if let Some(log) = &state.log {
                log.push("read");
            }
            state
                .text
                .clone()
                .ok_or_else(|| PortError::from("document is not readable"))
        };
        Box::pin(async move { result })
    }

    fn create_annotation<'a>(
        &'a self,
        range: TextRange,
        comment: &'a Comment,
    ) -> DocumentFuture<'a, ()> {
        let result = {
            let mut state = self.lock();
            if let Some(log) = &state.log {
                log.push(format!("create:{}", comment.issue_id));
            }
            annotate(&mut state, range, comment)
        };
        Box::pin(async move { result })
    }

    fn snapshot(&self) -> DocumentFuture<'_, Box<dyn DocumentPlatform>> {
        let result = self
            .lock()
            .text
            .clone()
            .map(|text| -> Box<dyn DocumentPlatform> { Box::new(Self::new(text)) })
            .ok_or_else(|| PortError::from("document is not readable"));
        Box::pin(async move { result })
    }
}

fn annotate(
    state: &mut DocumentState,
    range: TextRange,
    comment: &Comment,
) -> Result<(), PortError> {
    if let Some(message) = state.failures.get(&comment.issue_id) {
        return Err(message.clone().into());
    }
    let text = state.text.as_deref().ok_or("document is not readable")?;
    let quoted = text
        .get(range.start..range.end)
        .ok_or_else(|| {
            format!(
                "range {}..{} is outside the document",
                range.start, range.end
            )
        })?
        .to_string();
    state.annotations.push(RecordedAnnotation {
        issue_id: comment.issue_id.clone(),
        range,
        quoted,
        body: comment.comment_body.clone(),
    });
    if let Some(edited) = state.edits.remove(&comment.issue_id) {
        state.text = Some(edited);
    }
    Ok(())
}
