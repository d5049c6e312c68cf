//! Live document adapter: a Markdown file on disk.
//!
//! An annotation wraps the anchored range in `==highlight==` markers followed
//! by a footnote reference, and appends the comment as a footnote definition
//! below a marker line at the end of the file:
//!
//! ```text
//! This caused ==connection pool exhaustion==[^a1] under load.
//!
//! <!-- rca-reviewer comments -->
//! [^a1]: **Weak root cause** Why was the pool limit 100?
//! ```
//!
//! The full text handed to the matcher stops at the marker line, so anchors
//! are never found inside earlier comments.

use std::path::PathBuf;
use std::sync::Mutex;

use super::replace_file;
use crate::model::{Comment, TextRange};
use crate::ports::{DocumentFuture, DocumentPlatform, PortError};

/// Line separating the document body from appended comments.
pub const COMMENTS_MARKER: &str = "<!-- rca-reviewer comments -->";

/// A Markdown file used as the host document.
pub struct MarkdownDocument {
    path: PathBuf,
}

impl MarkdownDocument {
    /// Creates an adapter for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<String, PortError> {
        std::fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read {}: {e}", self.path.display()).into())
    }
}

impl DocumentPlatform for MarkdownDocument {
    fn read_full_text(&self) -> DocumentFuture<'_, String> {
        Box::pin(async move {
            let contents = self.read()?;
            Ok(body_of(&contents).to_string())
        })
    }

    fn create_annotation<'a>(
        &'a self,
        range: TextRange,
        comment: &'a Comment,
    ) -> DocumentFuture<'a, ()> {
        Box::pin(async move {
            let contents = self.read()?;
            let annotated = annotate(&contents, range, comment)?;
            replace_file(&self.path, &annotated)
                .map_err(|e| format!("Failed to write {}: {e}", self.path.display()))?;
            Ok(())
        })
    }

    fn snapshot(&self) -> DocumentFuture<'_, Box<dyn DocumentPlatform>> {
        Box::pin(async move {
            let contents = self.read()?;
            Ok(Box::new(MarkdownBuffer::new(contents)) as Box<dyn DocumentPlatform>)
        })
    }
}

/// Markdown contents held in memory and annotated exactly like a
/// [`MarkdownDocument`]. Used to predict what a plan would do to a file.
pub struct MarkdownBuffer {
    contents: Mutex<String>,
}

impl MarkdownBuffer {
    /// Creates a buffer holding `contents`.
    #[must_use]
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(contents.into()),
        }
    }

    /// The full contents, footnotes included.
    #[must_use]
    pub fn contents(&self) -> String {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, String> {
        self.contents.lock().expect("buffer lock poisoned")
    }
}

impl DocumentPlatform for MarkdownBuffer {
    fn read_full_text(&self) -> DocumentFuture<'_, String> {
        let text = body_of(&self.lock()).to_string();
        Box::pin(async move { Ok(text) })
    }

    fn create_annotation<'a>(
        &'a self,
        range: TextRange,
        comment: &'a Comment,
    ) -> DocumentFuture<'a, ()> {
        let result = {
            let mut contents = self.lock();
            annotate(&contents, range, comment).map(|annotated| *contents = annotated)
        };
        Box::pin(async move { result })
    }

    fn snapshot(&self) -> DocumentFuture<'_, Box<dyn DocumentPlatform>> {
        let copy: Box<dyn DocumentPlatform> = Box::new(Self::new(self.contents()));
        Box::pin(async move { Ok(copy) })
    }
}

/// The part of `contents` above the comments marker, without trailing newlines.
fn body_of(contents: &str) -> &str {
    let body = match contents.find(COMMENTS_MARKER) {
        Some(at) => &contents[..at],
        None => contents,
    };
    body.trim_end_matches('\n')
}

fn annotate(contents: &str, range: TextRange, comment: &Comment) -> Result<String, PortError> {
    let body = body_of(contents);
    if range.is_empty() {
        return Err("cannot annotate an empty range".into());
    }
    let quoted = body.get(range.start..range.end).ok_or_else(|| {
        format!(
            "range {}..{} no longer fits the document",
            range.start, range.end
        )
    })?;

    let label = footnote_label(&comment.issue_id);
    let mut out = String::with_capacity(contents.len() + comment.comment_body.len() + 64);
    out.push_str(&body[..range.start]);
    out.push_str("==");
    out.push_str(quoted);
    out.push_str("==[^");
    out.push_str(&label);
    out.push(']');
    out.push_str(&body[range.end..]);
    out.push_str("\n\n");

    match contents.find(COMMENTS_MARKER) {
        Some(at) => out.push_str(contents[at..].trim_end_matches('\n')),
        None => out.push_str(COMMENTS_MARKER),
    }

    out.push_str(&format!(
        "\n[^{label}]: **{}** {}\n",
        comment.issue_type.trim(),
        fold_lines(&comment.comment_body)
    ));
    Ok(out)
}

/// Footnote labels may not contain whitespace or brackets.
fn footnote_label(issue_id: &str) -> String {
    let label: String = issue_id
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if label.is_empty() {
        "issue".to_string()
    } else {
        label
    }
}

fn fold_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
