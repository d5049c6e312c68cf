//! Domain types shared by the annotation core and the ports.

pub mod analysis;
pub mod comment;

pub use analysis::{Analysis, DimensionScore, ExecutiveSummary};
pub use comment::{Comment, IssueRecord, TextRange};
