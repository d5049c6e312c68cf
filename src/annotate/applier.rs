//! Executing an annotation plan against the live document.
//!
//! Items run strictly one after another. A comment that cannot be placed
//! becomes a [`SkippedItem`] and the run carries on. A placed comment whose
//! record cannot be saved still counts as created and is reported as an
//! [`UnrecordedItem`]. Only an unreadable document ends a run early.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::matcher::{MatchOutcome, TextMatcher};
use super::planner::{AnnotationPlan, PlannedAnnotation};
use crate::context::ServiceContext;
use crate::error::{Result, ReviewError};
use crate::model::IssueRecord;
use crate::store::IssueStore;

/// Why a planned annotation was not created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The anchor could not be found, even after prefix fallback.
    NoMatch,
    /// The document platform rejected the annotation.
    Platform(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch => f.write_str("no match"),
            Self::Platform(detail) => f.write_str(detail),
        }
    }
}

/// A planned annotation that was not created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    /// Issue the annotation belonged to.
    pub issue_id: String,
    /// Category of the comment, for display.
    pub issue_type: String,
    /// What went wrong.
    pub reason: SkipReason,
}

impl fmt::Display for SkippedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.issue_type, self.reason)
    }
}

/// An annotation that was created but whose issue record was not saved.
///
/// A later run will plan it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecordedItem {
    /// Issue the annotation belongs to.
    pub issue_id: String,
    /// Category of the comment, for display.
    pub issue_type: String,
    /// The store's error.
    pub detail: String,
}

impl fmt::Display for UnrecordedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: record not saved: {}", self.issue_type, self.detail)
    }
}

/// Outcome of applying one plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyResult {
    /// Annotations created.
    pub created_count: usize,
    /// Size of the plan.
    pub total_count: usize,
    /// Items not created, in plan order.
    pub skipped: Vec<SkippedItem>,
    /// Created items without a saved record, in plan order.
    pub unrecorded: Vec<UnrecordedItem>,
}

impl ApplyResult {
    /// Converts to the caller-facing report.
    #[must_use]
    pub fn report(&self) -> ApplyReport {
        let skipped = self.skipped.iter().map(ToString::to_string);
        let unrecorded = self.unrecorded.iter().map(ToString::to_string);
        ApplyReport {
            created: self.created_count,
            total: self.total_count,
            errors: skipped.chain(unrecorded).collect(),
        }
    }
}

/// Caller-facing summary of an apply run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    /// Annotations created.
    pub created: usize,
    /// Annotations attempted.
    pub total: usize,
    /// One `"<issue type>: <reason>"` line per skipped or unrecorded item.
    pub errors: Vec<String>,
}

impl ApplyReport {
    /// `"N of T comments applied, M skipped"`. Partial success is success.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{} of {} comments applied, {} skipped",
            self.created,
            self.total,
            self.total.saturating_sub(self.created)
        )
    }
}

/// Creates the annotations of a plan on the context's document.
pub struct AnnotationApplier<'a> {
    ctx: &'a ServiceContext,
    matcher: TextMatcher,
}

impl<'a> AnnotationApplier<'a> {
    /// Creates an applier using the default matcher bounds.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            matcher: TextMatcher::default(),
        }
    }

    /// Applies every item of `plan` in order.
    ///
    /// Before each item the document text is read again, since earlier
    /// annotations or the author may have changed it. After each created
    /// annotation that is followed by another item, the applier waits
    /// `ctx.comment_delay` so the platform's comment index can catch up.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::DocumentUnavailable`] if the document cannot be
    /// read. Per-item failures are reported in the [`ApplyResult`] instead.
    pub async fn apply(&self, plan: &AnnotationPlan) -> Result<ApplyResult> {
        let store = IssueStore::new(self.ctx);
        let total_count = plan.len();
        let mut result = ApplyResult {
            total_count,
            ..ApplyResult::default()
        };

        for (index, item) in plan.items().iter().enumerate() {
            let comment = &item.comment;
            if let Some(reason) = self.apply_one(item).await? {
                warn!(
                    issue_id = %comment.issue_id,
                    issue_type = %comment.issue_type,
                    %reason,
                    "annotation skipped"
                );
                result.skipped.push(SkippedItem {
                    issue_id: comment.issue_id.clone(),
                    issue_type: comment.issue_type.clone(),
                    reason,
                });
                continue;
            }

            result.created_count += 1;
            let record = IssueRecord {
                comment: comment.clone(),
                applied_at: self.ctx.clock.now(),
            };
            if let Err(e) = store.put(&comment.issue_id, record) {
                warn!(
                    issue_id = %comment.issue_id,
                    error = %e,
                    "annotation created but not recorded"
                );
                result.unrecorded.push(UnrecordedItem {
                    issue_id: comment.issue_id.clone(),
                    issue_type: comment.issue_type.clone(),
                    detail: e.to_string(),
                });
            }

            if index + 1 < total_count && !self.ctx.comment_delay.is_zero() {
                self.ctx.sleeper.sleep(self.ctx.comment_delay).await;
            }
        }

        info!(
            created = result.created_count,
            total = result.total_count,
            skipped = result.skipped.len(),
            unrecorded = result.unrecorded.len(),
            "annotation plan applied"
        );
        Ok(result)
    }

    /// Returns `None` when the annotation was created.
    async fn apply_one(&self, item: &PlannedAnnotation) -> Result<Option<SkipReason>> {
        let text = self
            .ctx
            .document
            .read_full_text()
            .await
            .map_err(|e| ReviewError::DocumentUnavailable(e.to_string()))?;

        let issue_id = &item.comment.issue_id;
        let range = match self.matcher.locate(&text, &item.anchor) {
            MatchOutcome::Exact(range) => range,
            MatchOutcome::Prefix { range, tokens } => {
                debug!(%issue_id, tokens, "anchor matched by prefix");
                range
            }
            MatchOutcome::NoMatch => return Ok(Some(SkipReason::NoMatch)),
        };

        let document = &self.ctx.document;
        match document.create_annotation(range, &item.comment).await {
            Ok(()) => {
                debug!(%issue_id, start = range.start, end = range.end, "annotation created");
                Ok(None)
            }
            Err(e) => Ok(Some(SkipReason::Platform(e.to_string()))),
        }
    }
}
