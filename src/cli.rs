//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `rca-reviewer`.
#[derive(Debug, Parser)]
#[command(
    name = "rca-reviewer",
    version,
    about = "Review RCA documents and anchor comments to their text"
)]
pub struct Cli {
    /// Settings that override the environment.
    #[command(flatten)]
    pub overrides: Overrides,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Per-invocation overrides of environment configuration.
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// Analysis service base URL.
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
    /// Delay after each created comment, in milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    pub delay_ms: Option<u64>,
    /// Directory holding per-document state.
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a document and anchor the resulting comments in it.
    Review {
        /// Markdown document to review.
        document: PathBuf,
        /// Report what would be applied without changing the document.
        #[arg(long)]
        dry_run: bool,
        /// Also write the executive summary to this file.
        #[arg(long, value_name = "FILE")]
        summary_out: Option<PathBuf>,
    },
    /// Anchor comments from a JSON file without calling the service.
    Apply {
        /// Markdown document to annotate.
        document: PathBuf,
        /// JSON array of comments, or an object with a `comments` array.
        #[arg(long, value_name = "JSON")]
        comments: PathBuf,
    },
    /// Ask a question about the document.
    Chat {
        /// Markdown document used as context.
        document: PathBuf,
        /// The message to send.
        message: String,
    },
    /// Reply in the thread of an applied comment.
    Reply {
        /// Markdown document the comment lives in.
        document: PathBuf,
        /// Issue identifier of the comment.
        #[arg(long = "issue", value_name = "ID")]
        issue_id: String,
        /// The reply text.
        reply: String,
    },
    /// List comments already applied to a document.
    Issues {
        /// Markdown document to inspect.
        document: PathBuf,
    },
    /// Check that the analysis service is reachable.
    Health,
}
