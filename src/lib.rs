//! Core library for the `rca-reviewer` CLI.
//!
//! Reviews root cause analysis documents through an external analysis
//! service and anchors each returned comment to the passage it refers to.

pub mod adapters;
pub mod annotate;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod ports;
pub mod review;
pub mod store;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_lists_issues_of_unreviewed_document() {
        let dir = tempfile::tempdir().unwrap();
        let state_dir = dir.path().join("state");
        let result = run([
            "rca-reviewer",
            "--state-dir",
            state_dir.to_str().unwrap(),
            "issues",
            "incident.md",
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["rca-reviewer", "unknown"]);
        assert!(result.is_err());
    }
}
