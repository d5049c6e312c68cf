//! Anchor resolution and comment placement.
//!
//! A review yields comments quoting snippets of the document. This module
//! decides which of them still need annotating ([`planner`]), finds where
//! each quote lives in the current text ([`matcher`]) and creates the
//! annotations one at a time ([`applier`]).

pub mod applier;
pub mod matcher;
pub mod planner;

pub use applier::{
    AnnotationApplier, ApplyReport, ApplyResult, SkipReason, SkippedItem, UnrecordedItem,
};
pub use matcher::{MatchOutcome, TextMatcher};
pub use planner::{build_plan, AnnotationPlan, PlannedAnnotation};
