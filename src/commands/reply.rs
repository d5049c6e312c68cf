//! `rca-reviewer reply` command.

use std::path::Path;

use crate::chat;
use crate::config::Config;

/// Execute the `reply` command and print the service's answer.
///
/// # Errors
///
/// Returns an error string if the reply is blank, the issue is unknown,
/// or the service fails.
pub fn run(
    config: &Config,
    document: &Path,
    issue_id: &str,
    user_reply: &str,
) -> Result<(), String> {
    let ctx = super::live_context(config, document)?;
    let answer = super::block_on(chat::reply(&ctx, issue_id, user_reply))?
        .map_err(|e| e.to_string())?;
    println!("{}", answer.trim_end());
    Ok(())
}
