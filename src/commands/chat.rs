//! `rca-reviewer chat` command.

use std::path::Path;

use crate::chat::send;
use crate::config::Config;

/// Execute the `chat` command and print the reply.
///
/// # Errors
///
/// Returns an error string if the message is blank or the exchange fails.
pub fn run(config: &Config, document: &Path, message: &str) -> Result<(), String> {
    let ctx = super::live_context(config, document)?;
    let reply = super::block_on(send(&ctx, message))?.map_err(|e| e.to_string())?;
    println!("{}", reply.reply.trim_end());
    Ok(())
}
