//! `rca-reviewer apply` command.

use std::path::Path;

use serde::Deserialize;

use crate::config::Config;
use crate::model::Comment;
use crate::review::apply_comments;

/// Accepted shapes of a comments file. A saved analysis also fits the
/// second shape.
#[derive(Deserialize)]
#[serde(untagged)]
enum CommentsFile {
    List(Vec<Comment>),
    Wrapped { comments: Vec<Comment> },
}

/// Execute the `apply` command.
///
/// # Errors
///
/// Returns an error string if the comments file cannot be read or parsed,
/// or if applying fails before any comment is attempted.
pub fn run(config: &Config, document: &Path, comments_path: &Path) -> Result<(), String> {
    let raw = std::fs::read_to_string(comments_path)
        .map_err(|e| format!("Failed to read {}: {e}", comments_path.display()))?;
    let comments = parse_comments(&raw)
        .map_err(|e| format!("Invalid comments in {}: {e}", comments_path.display()))?;

    let ctx = super::live_context(config, document)?;
    let report = super::block_on(apply_comments(&ctx, &comments))?
        .map_err(|e| e.to_string())?;

    println!("{}", report.summary_line());
    for error in &report.errors {
        println!("  {error}");
    }
    Ok(())
}

fn parse_comments(raw: &str) -> Result<Vec<Comment>, serde_json::Error> {
    serde_json::from_str::<CommentsFile>(raw).map(|file| match file {
        CommentsFile::List(comments) | CommentsFile::Wrapped { comments } => comments,
    })
}
