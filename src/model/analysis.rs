//! Analysis results returned by the review service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::comment::Comment;

/// Score and rationale for one evaluation dimension.
///
/// Scores are numbers as the service sends them; fractional values are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    /// Score from 0 to 5.
    #[serde(default)]
    pub score: f64,
    /// Why the score was given.
    #[serde(default)]
    pub rationale: String,
}

/// Leadership-facing summary of a review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    /// One-line interpretation of the overall score.
    #[serde(default)]
    pub overall_interpretation: String,
    /// Bullets for a leadership audience.
    #[serde(default)]
    pub leadership_bullets: Vec<String>,
    /// The most important gaps found.
    #[serde(default)]
    pub key_gaps: Vec<String>,
    /// `Low`, `Medium` or `High`.
    #[serde(default)]
    pub recurrence_risk: String,
    /// One-line reason for the recurrence risk.
    #[serde(default)]
    pub recurrence_rationale: String,
    /// Critique of the action items.
    #[serde(default)]
    pub action_critique: String,
    /// Next improvements for the author.
    #[serde(default)]
    pub improvements: Vec<String>,
}

/// A full review of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Identifier assigned by the service.
    #[serde(default)]
    pub analysis_id: String,
    /// Per-dimension scores keyed by dimension name.
    #[serde(default)]
    pub score: BTreeMap<String, DimensionScore>,
    /// Sum of the dimension scores, out of 30.
    #[serde(default)]
    pub total_score: f64,
    /// Inline comments, in document order.
    pub comments: Vec<Comment>,
    /// Leadership summary.
    #[serde(default)]
    pub executive_summary: ExecutiveSummary,
    /// RFC 3339 timestamp assigned by the service.
    #[serde(default)]
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_payload() {
        let payload = r#"{
            "analysis_id": "an-1",
            "score": {
                "timeline_completeness": {"score": 3, "rationale": "ok"},
                "root_cause_depth": {"score": 2, "rationale": "shallow"}
            },
            "total_score": 5,
            "comments": [
                {"issue_id": "a1", "issue_type": "Weak root cause",
                 "anchor_text": "connection pool exhaustion",
                 "comment_body": "Why was the pool undersized?", "resolved": false}
            ],
            "executive_summary": {"recurrence_risk": "High", "key_gaps": ["no load test"]},
            "timestamp": "2026-01-15T14:02:00+00:00"
        }"#;

        let analysis: Analysis = serde_json::from_str(payload).unwrap();
        assert!((analysis.total_score - 5.0).abs() < f64::EPSILON);
        assert!((analysis.score["root_cause_depth"].score - 2.0).abs() < f64::EPSILON);
        assert_eq!(analysis.comments.len(), 1);
        assert_eq!(analysis.executive_summary.recurrence_risk, "High");
        assert!(analysis.executive_summary.leadership_bullets.is_empty());
    }

    #[test]
    fn fractional_scores_are_accepted() {
        let payload = r#"{
            "score": {"root_cause_depth": {"score": 2.5, "rationale": "partial"}},
            "total_score": 17.5,
            "comments": []
        }"#;

        let analysis: Analysis = serde_json::from_str(payload).unwrap();
        assert!((analysis.total_score - 17.5).abs() < f64::EPSILON);
        assert!((analysis.score["root_cause_depth"].score - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn comments_field_is_required() {
        let result = serde_json::from_str::<Analysis>(r#"{"total_score": 3}"#);
        assert!(result.is_err());
    }
}
