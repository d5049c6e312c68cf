//! Command dispatch and handlers.

pub mod apply;
pub mod chat;
pub mod health;
pub mod issues;
pub mod reply;
pub mod review;

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use crate::cli::{Cli, Command, Overrides};
use crate::config::Config;
use crate::context::ServiceContext;

/// Dispatch a parsed command line to its handler.
///
/// Configuration is read from the environment, then CLI overrides are
/// applied on top.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let config = Config::from_env().map_err(|e| e.to_string())?;
    let config = with_overrides(config, &cli.overrides);

    match &cli.command {
        Command::Review {
            document,
            dry_run,
            summary_out,
        } => review::run(&config, document, *dry_run, summary_out.as_deref()),
        Command::Apply { document, comments } => apply::run(&config, document, comments),
        Command::Chat { document, message } => chat::run(&config, document, message),
        Command::Reply {
            document,
            issue_id,
            reply,
        } => reply::run(&config, document, issue_id, reply),
        Command::Issues { document } => issues::run(&config, document),
        Command::Health => health::run(&config),
    }
}

fn with_overrides(mut config: Config, overrides: &Overrides) -> Config {
    if let Some(url) = &overrides.api_url {
        config.api_url = url.trim_end_matches('/').to_string();
    }
    if let Some(ms) = overrides.delay_ms {
        config.comment_delay = Duration::from_millis(ms);
    }
    if let Some(dir) = &overrides.state_dir {
        config.state_dir.clone_from(dir);
    }
    config
}

/// Builds the live context for `document`.
fn live_context(config: &Config, document: &Path) -> Result<ServiceContext, String> {
    ServiceContext::live(config, document).map_err(|e| e.to_string())
}

/// Drives `future` to completion on a single-threaded runtime.
fn block_on<F: Future>(future: F) -> Result<F::Output, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    Ok(runtime.block_on(future))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn overrides_replace_only_what_they_set() {
        let overrides = Overrides {
            delay_ms: Some(0),
            ..Overrides::default()
        };
        let config = with_overrides(Config::default(), &overrides);

        assert_eq!(config.comment_delay, Duration::ZERO);
        assert_eq!(config.api_url, Config::default().api_url);
        assert_eq!(config.state_dir, Config::default().state_dir);
    }

    #[test]
    fn api_url_override_drops_trailing_slash() {
        let overrides = Overrides {
            api_url: Some("http://svc:9000/".into()),
            state_dir: Some(PathBuf::from("/tmp/rca")),
            ..Overrides::default()
        };
        let config = with_overrides(Config::default(), &overrides);

        assert_eq!(config.api_url, "http://svc:9000");
        assert_eq!(config.state_dir, PathBuf::from("/tmp/rca"));
    }

    #[test]
    fn block_on_runs_the_future() {
        assert_eq!(block_on(async { 2 + 2 }).unwrap(), 4);
    }
}
