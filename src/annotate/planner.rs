//! Turning a review's comments into the list of annotations to create.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::model::{Comment, IssueRecord};

/// One annotation the applier should attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAnnotation {
    /// The comment to attach.
    pub comment: Comment,
    /// The trimmed anchor text to search for.
    pub anchor: String,
}

/// Ordered, de-duplicated annotations for one apply cycle.
///
/// A plan is derived once per cycle and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationPlan {
    items: Vec<PlannedAnnotation>,
}

impl AnnotationPlan {
    /// Planned annotations in application order.
    #[must_use]
    pub fn items(&self) -> &[PlannedAnnotation] {
        &self.items
    }

    /// Number of planned annotations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when there is nothing to apply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Issue ids in plan order.
    #[must_use]
    pub fn issue_ids(&self) -> Vec<&str> {
        self.items
            .iter()
            .map(|item| item.comment.issue_id.as_str())
            .collect()
    }
}

/// Builds the annotation plan for `comments` given the already-applied `records`.
///
/// A comment is planned only if it is not resolved, has a non-blank anchor,
/// and is not already recorded with the same body and anchor. When the same
/// `issue_id` appears more than once, only its first occurrence is kept.
/// Input order is preserved.
#[must_use]
pub fn build_plan(comments: &[Comment], records: &BTreeMap<String, IssueRecord>) -> AnnotationPlan {
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for comment in comments {
        if comment.resolved {
            debug!(issue_id = %comment.issue_id, "skipping resolved comment");
            continue;
        }

        let anchor = comment.anchor_text.trim();
        if anchor.is_empty() {
            debug!(issue_id = %comment.issue_id, "skipping comment without anchor");
            continue;
        }

        if !seen.insert(comment.issue_id.as_str()) {
            debug!(issue_id = %comment.issue_id, "skipping duplicate issue id");
            continue;
        }

        if records
            .get(&comment.issue_id)
            .is_some_and(|record| record.covers(comment))
        {
            debug!(issue_id = %comment.issue_id, "comment already applied");
            continue;
        }

        items.push(PlannedAnnotation {
            comment: comment.clone(),
            anchor: anchor.to_string(),
        });
    }

    AnnotationPlan { items }
}
