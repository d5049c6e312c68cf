//! The review cycle: analyze, plan, apply, remember.
//!
//! One cycle runs strictly in sequence against one document. Callers must
//! not start a second cycle on the same document while one is running.

pub mod summary;

use std::time::Duration;

use tracing::{info, info_span, warn, Instrument};

use crate::annotate::{build_plan, AnnotationApplier, AnnotationPlan, ApplyReport, ApplyResult};
use crate::context::ServiceContext;
use crate::error::{Result, ReviewError};
use crate::model::{Analysis, Comment};
use crate::ports::AnalysisRequest;
use crate::store::IssueStore;

pub use summary::{render_summary, ScoreBand};

/// Knobs for [`run_review`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewOptions {
    /// Predict the apply report against a copy of the document instead of
    /// annotating it. Nothing is persisted.
    pub dry_run: bool,
}

/// Everything a review cycle produced.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// Identifier of this cycle, also attached to its log span.
    pub run_id: String,
    /// The service's analysis.
    pub analysis: Analysis,
    /// Annotations planned after filtering and de-duplication.
    pub plan: AnnotationPlan,
    /// What happened when the plan was applied (or simulated).
    pub result: ApplyResult,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

/// Runs a full review cycle on the context's document.
///
/// # Errors
///
/// Returns an error, with nothing applied, if the document cannot be read
/// or is blank, if the analysis service fails, or if stored state cannot be
/// read. Per-comment failures are reported in [`ReviewOutcome::result`].
pub async fn run_review(ctx: &ServiceContext, options: ReviewOptions) -> Result<ReviewOutcome> {
    let run_id = ctx.id_gen.generate_id();
    let span = info_span!("review", run_id = %run_id, dry_run = options.dry_run);

    async move {
        let text = read_document(ctx).await?;
        let store = IssueStore::new(ctx);

        let request = AnalysisRequest {
            document_text: text,
            existing_issues: store.last_comments()?,
        };
        info!(
            existing = request.existing_issues.len(),
            "requesting analysis"
        );
        let analysis = ctx
            .analysis
            .analyze(&request)
            .await
            .map_err(|e| ReviewError::Upstream(e.to_string()))?;
        info!(
            comments = analysis.comments.len(),
            total_score = analysis.total_score,
            "analysis received"
        );

        let plan = build_plan(&analysis.comments, &store.get()?);
        let result = if options.dry_run {
            simulate(ctx, &plan).await?
        } else {
            let result = AnnotationApplier::new(ctx).apply(&plan).await?;
            remember(&store, &analysis);
            result
        };

        Ok(ReviewOutcome {
            run_id,
            analysis,
            plan,
            result,
            dry_run: options.dry_run,
        })
    }
    .instrument(span)
    .await
}

/// Applies already-produced comments to the context's document.
///
/// # Errors
///
/// Returns an error if the document cannot be read or is blank, or if the
/// issue store cannot be read.
pub async fn apply_comments(ctx: &ServiceContext, comments: &[Comment]) -> Result<ApplyReport> {
    read_document(ctx).await?;
    let plan = build_plan(comments, &IssueStore::new(ctx).get()?);
    let result = AnnotationApplier::new(ctx).apply(&plan).await?;
    Ok(result.report())
}

async fn read_document(ctx: &ServiceContext) -> Result<String> {
    let text = ctx
        .document
        .read_full_text()
        .await
        .map_err(|e| ReviewError::DocumentUnavailable(e.to_string()))?;
    if text.trim().is_empty() {
        return Err(ReviewError::EmptyDocument);
    }
    Ok(text)
}

/// Keeps the review's comments and analysis for the next run.
///
/// The annotations are already placed at this point, so a failure only
/// costs the next review its `existing_issues` and is logged.
fn remember(store: &IssueStore<'_>, analysis: &Analysis) {
    if let Err(e) = store.save_last_comments(&analysis.comments) {
        warn!(error = %e, "review comments not saved");
    }
    if let Err(e) = store.save_analysis(analysis) {
        warn!(error = %e, "analysis not saved");
    }
}

/// Runs `plan` with no delay against a detached copy of the document that
/// annotates the same way the document does.
async fn simulate(ctx: &ServiceContext, plan: &AnnotationPlan) -> Result<ApplyResult> {
    let mut sandbox = ServiceContext::in_memory("");
    sandbox.document = ctx
        .document
        .snapshot()
        .await
        .map_err(|e| ReviewError::DocumentUnavailable(e.to_string()))?;
    sandbox.comment_delay = Duration::ZERO;
    AnnotationApplier::new(&sandbox).apply(plan).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::MarkdownBuffer;
    use crate::adapters::memory::{InMemoryDocument, InMemoryStore, ScriptedAnalysisService};

    const DOC: &str =
        "Root Cause\nThis quickly exhausted the connection pool limit of 100 connections.";

    fn analysis_with(comments: Vec<Comment>) -> Analysis {
        Analysis {
            total_score: 17.0,
            comments,
            ..Analysis::default()
        }
    }

    fn context(text: &str) -> (ServiceContext, InMemoryDocument, ScriptedAnalysisService) {
        let doc = InMemoryDocument::new(text);
        let service = ScriptedAnalysisService::new();
        let mut ctx = ServiceContext::in_memory(text);
        ctx.document = Box::new(doc.clone());
        ctx.analysis = Box::new(service.clone());
        (ctx, doc, service)
    }

    fn pool_comment() -> Comment {
        Comment::new(
            "a1",
            "Weak root cause",
            "connection pool limit of 100",
            "Why was 100 chosen?",
        )
    }

    #[tokio::test]
    async fn review_applies_and_remembers_comments() {
        let (ctx, doc, service) = context(DOC);
        service.push_analysis(Ok(analysis_with(vec![pool_comment()])));

        let outcome = run_review(&ctx, ReviewOptions::default()).await.unwrap();

        assert_eq!(outcome.run_id, "run-1");
        assert_eq!(
            outcome.result.report().summary_line(),
            "1 of 1 comments applied, 0 skipped"
        );
        assert_eq!(doc.annotations().len(), 1);

        let store = IssueStore::new(&ctx);
        assert_eq!(store.last_comments().unwrap(), vec![pool_comment()]);
        let total = store.last_analysis().unwrap().unwrap().total_score;
        assert!((total - 17.0).abs() < f64::EPSILON);
        assert!(store.get().unwrap().contains_key("a1"));
    }

    #[tokio::test]
    async fn second_review_sends_existing_issues_and_applies_nothing_new() {
        let (ctx, doc, service) = context(DOC);
        service.push_analysis(Ok(analysis_with(vec![pool_comment()])));
        service.push_analysis(Ok(analysis_with(vec![pool_comment()])));

        run_review(&ctx, ReviewOptions::default()).await.unwrap();
        let second = run_review(&ctx, ReviewOptions::default()).await.unwrap();

        assert!(second.plan.is_empty());
        assert_eq!(second.result.total_count, 0);
        assert_eq!(doc.annotations().len(), 1);

        let requests = service.analysis_requests();
        assert!(requests[0].existing_issues.is_empty());
        assert_eq!(requests[1].existing_issues, vec![pool_comment()]);
    }

    #[tokio::test]
    async fn blank_document_never_reaches_the_service() {
        let (ctx, _doc, service) = context("  \n\t");

        let err = run_review(&ctx, ReviewOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::EmptyDocument));
        assert!(service.analysis_requests().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_applies_nothing() {
        let (ctx, doc, service) = context(DOC);
        service.push_analysis(Err("LLM analysis failed: timeout".into()));

        let err = run_review(&ctx, ReviewOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::Upstream(ref msg) if msg.contains("timeout")));
        assert!(doc.annotations().is_empty());
        assert!(IssueStore::new(&ctx).last_comments().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unwritable_state_still_returns_the_outcome() {
        let (mut ctx, doc, service) = context(DOC);
        let state = InMemoryStore::new();
        state.fail_writes("read-only file system");
        ctx.state = Box::new(state);
        service.push_analysis(Ok(analysis_with(vec![pool_comment()])));

        let outcome = run_review(&ctx, ReviewOptions::default()).await.unwrap();

        assert_eq!(outcome.result.created_count, 1);
        assert_eq!(outcome.result.unrecorded.len(), 1);
        assert_eq!(doc.annotations().len(), 1);
    }

    #[tokio::test]
    async fn dry_run_predicts_without_touching_document_or_state() {
        let (ctx, doc, service) = context(DOC);
        let missing = Comment::new(
            "a2",
            "Missing detection",
            "no alarm fired at all",
            "Add one",
        );
        service.push_analysis(Ok(analysis_with(vec![pool_comment(), missing])));

        let outcome = run_review(&ctx, ReviewOptions { dry_run: true })
            .await
            .unwrap();

        assert!(outcome.dry_run);
        assert_eq!(outcome.result.created_count, 1);
        assert_eq!(
            outcome.result.report().errors,
            vec!["Missing detection: no match"]
        );
        assert!(doc.annotations().is_empty());
        let store = IssueStore::new(&ctx);
        assert!(store.get().unwrap().is_empty());
        assert!(store.last_analysis().unwrap().is_none());
    }

    #[tokio::test]
    async fn dry_run_sees_text_shift_from_earlier_annotations() {
        let text = "Root Cause\nA migration caused connection pool exhaustion in payments.";
        let comments = vec![
            Comment::new("a1", "Weak root cause", "pool exhaustion in", "Why?"),
            Comment::new(
                "a2",
                "Causality gap",
                "connection pool exhaustion",
                "Link it.",
            ),
        ];
        let service = ScriptedAnalysisService::new();
        service.push_analysis(Ok(analysis_with(comments.clone())));
        service.push_analysis(Ok(analysis_with(comments)));
        let mut ctx = ServiceContext::in_memory("");
        ctx.document = Box::new(MarkdownBuffer::new(text));
        ctx.analysis = Box::new(service);

        let predicted = run_review(&ctx, ReviewOptions { dry_run: true })
            .await
            .unwrap();
        let applied = run_review(&ctx, ReviewOptions::default()).await.unwrap();

        assert_eq!(predicted.result.report(), applied.result.report());
        assert_eq!(
            applied.result.report().errors,
            vec!["Causality gap: no match"]
        );
    }

    #[tokio::test]
    async fn apply_comments_reports_created_total_and_errors() {
        let (ctx, _doc, _service) = context(DOC);
        let comments = vec![
            pool_comment(),
            Comment::new(
                "a2",
                "Timeline gap",
                "14:15 UTC complaints",
                "When was the alarm?",
            ),
        ];

        let report = apply_comments(&ctx, &comments).await.unwrap();

        assert_eq!(
            report,
            ApplyReport {
                created: 1,
                total: 2,
                errors: vec!["Timeline gap: no match".into()],
            }
        );
    }

    #[tokio::test]
    async fn apply_comments_on_unreadable_document_is_fatal() {
        let mut ctx = ServiceContext::in_memory("");
        ctx.document = Box::new(InMemoryDocument::unavailable());

        let err = apply_comments(&ctx, &[pool_comment()]).await.unwrap_err();
        assert!(matches!(err, ReviewError::DocumentUnavailable(_)));
    }
}
