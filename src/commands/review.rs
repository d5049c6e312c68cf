//! `rca-reviewer review` command.

use std::fmt::Write as _;
use std::path::Path;

use crate::config::Config;
use crate::review::{render_summary, run_review, ReviewOptions, ReviewOutcome};

/// Execute the `review` command.
///
/// Prints the executive summary followed by the apply report. With
/// `summary_out`, the summary is also written to that file.
///
/// # Errors
///
/// Returns an error string if the review cycle fails or the summary file
/// cannot be written.
pub fn run(
    config: &Config,
    document: &Path,
    dry_run: bool,
    summary_out: Option<&Path>,
) -> Result<(), String> {
    let ctx = super::live_context(config, document)?;
    let outcome = super::block_on(run_review(&ctx, ReviewOptions { dry_run }))?
        .map_err(|e| e.to_string())?;

    let summary = render_summary(&outcome.analysis, ctx.clock.now());
    print!("{summary}");
    if let Some(path) = summary_out {
        std::fs::write(path, &summary)
            .map_err(|e| format!("Failed to write summary to {}: {e}", path.display()))?;
    }

    println!();
    print!("{}", format_outcome(&outcome));
    Ok(())
}

fn format_outcome(outcome: &ReviewOutcome) -> String {
    let report = outcome.result.report();
    let mut out = String::new();
    if outcome.dry_run {
        let _ = writeln!(out, "Dry run: {}", report.summary_line());
    } else {
        let _ = writeln!(out, "{}", report.summary_line());
    }
    for error in &report.errors {
        let _ = writeln!(out, "  {error}");
    }
    out
}
