//! Runtime configuration.
//!
//! Values come from the environment (after `.env` is loaded by the binary)
//! and can be overridden per invocation by CLI flags.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use uuid::Uuid;

use crate::error::{Result, ReviewError};

/// Base URL of the analysis service.
pub const API_URL_VAR: &str = "RCA_REVIEWER_API_URL";
/// Delay after each created annotation, in milliseconds.
pub const COMMENT_DELAY_VAR: &str = "RCA_REVIEWER_COMMENT_DELAY_MS";
/// Timeout for each analysis service request, in seconds.
pub const REQUEST_TIMEOUT_VAR: &str = "RCA_REVIEWER_REQUEST_TIMEOUT_SECS";
/// Directory holding per-document state files.
pub const STATE_DIR_VAR: &str = "RCA_REVIEWER_STATE_DIR";

const DEFAULT_API_URL: &str = "http://localhost:8001";
const DEFAULT_COMMENT_DELAY_MS: u64 = 1500;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_STATE_DIR: &str = ".rca-reviewer";

/// Settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Analysis service base URL, without a trailing slash.
    pub api_url: String,
    /// Wait after each successful annotation before creating the next.
    ///
    /// The host platform indexes comments behind content changes; creating
    /// annotations faster than it syncs drops or misplaces them. Raise this
    /// when annotations go missing, lower it only for platforms that sync
    /// synchronously.
    pub comment_delay: Duration,
    /// Timeout for each analysis service request.
    pub request_timeout: Duration,
    /// Directory holding per-document state files.
    pub state_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            comment_delay: Duration::from_millis(DEFAULT_COMMENT_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
        }
    }
}

impl Config {
    /// Loads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Config`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for unset keys.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Config`] if a numeric value does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup(API_URL_VAR)
            .map_or(defaults.api_url, |url| url.trim_end_matches('/').to_owned());
        let comment_delay = parse_u64(&lookup, COMMENT_DELAY_VAR)?
            .map_or(defaults.comment_delay, Duration::from_millis);
        let request_timeout = parse_u64(&lookup, REQUEST_TIMEOUT_VAR)?
            .map_or(defaults.request_timeout, Duration::from_secs);
        let state_dir = lookup(STATE_DIR_VAR).map_or(defaults.state_dir, PathBuf::from);

        Ok(Self {
            api_url,
            comment_delay,
            request_timeout,
            state_dir,
        })
    }

    /// State file for `document`: `<state_dir>/<file name>-<key>.state.json`.
    ///
    /// The key is derived from the document's absolute path, so documents
    /// sharing a file name in different directories never share state.
    #[must_use]
    pub fn state_path_for(&self, document: &Path) -> PathBuf {
        let name = document
            .file_name()
            .map_or_else(|| "document".into(), |n| n.to_string_lossy().into_owned());
        let location = absolute(document);
        let key = Uuid::new_v5(
            &Uuid::NAMESPACE_URL,
            location.to_string_lossy().as_bytes(),
        )
        .simple()
        .to_string();
        self.state_dir.join(format!("{name}-{}.state.json", &key[..16]))
    }
}

/// `path` made absolute. Symlinks are resolved when the file exists.
fn absolute(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
}

fn parse_u64<F>(lookup: &F, key: &str) -> Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| ReviewError::Config(format!("{key}={raw:?} is not a number: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_variables_use_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.comment_delay, Duration::from_millis(1500));
    }

    #[test]
    fn variables_override_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            (API_URL_VAR, "https://review.example.com/"),
            (COMMENT_DELAY_VAR, "250"),
            (REQUEST_TIMEOUT_VAR, "30"),
            (STATE_DIR_VAR, "/var/lib/rca"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://review.example.com");
        assert_eq!(config.comment_delay, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.state_dir, PathBuf::from("/var/lib/rca"));
    }

    #[test]
    fn invalid_number_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[(COMMENT_DELAY_VAR, "soon")])).unwrap_err();
        assert!(matches!(err, ReviewError::Config(_)));
        assert!(err.to_string().contains(COMMENT_DELAY_VAR));
    }

    fn state_config() -> Config {
        Config {
            state_dir: PathBuf::from("/state"),
            ..Config::default()
        }
    }

    #[test]
    fn state_path_keeps_document_file_name() {
        let path = state_config().state_path_for(Path::new("/docs/outage-2026-01-15.md"));

        assert_eq!(path.parent(), Some(Path::new("/state")));
        let file = path.file_name().unwrap().to_str().unwrap();
        assert!(file.starts_with("outage-2026-01-15.md-"), "{file}");
        assert!(file.ends_with(".state.json"), "{file}");
    }

    #[test]
    fn same_named_documents_get_separate_state() {
        let config = state_config();
        let payments = config.state_path_for(Path::new("/teams/payments/incident.md"));
        let search = config.state_path_for(Path::new("/teams/search/incident.md"));

        assert_ne!(payments, search);
    }

    #[test]
    fn state_path_is_stable_for_one_document() {
        let config = state_config();
        let doc = Path::new("/teams/payments/incident.md");
        assert_eq!(config.state_path_for(doc), config.state_path_for(doc));
    }

    #[test]
    fn relative_and_absolute_paths_share_state() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("incident.md");
        std::fs::write(&doc, "Root Cause").unwrap();
        let config = state_config();

        let dotted = dir.path().join(".").join("incident.md");
        assert_eq!(config.state_path_for(&doc), config.state_path_for(&dotted));
    }
}
