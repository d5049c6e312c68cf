//! Per-document persistence of review state.
//!
//! All state lives in the document's [`KeyValueStore`] under three keys:
//!
//! ```text
//! comment_map    issue_id -> IssueRecord, one entry per applied annotation
//! rca_issues     comments returned by the most recent review
//! last_analysis  the most recent full analysis
//! ```
//!
//! Records are never deleted here. Removing one is an explicit external
//! action.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::context::ServiceContext;
use crate::error::{Result, ReviewError};
use crate::model::{Analysis, Comment, IssueRecord};
use crate::ports::KeyValueStore;

/// Key holding the applied-issue records.
pub const ISSUES_KEY: &str = "comment_map";
/// Key holding the comments of the latest review.
pub const LAST_COMMENTS_KEY: &str = "rca_issues";
/// Key holding the latest analysis.
pub const LAST_ANALYSIS_KEY: &str = "last_analysis";

/// Persistence layer for issue records and review history.
///
/// All I/O goes through `ctx.state` so that the store works with any
/// key-value adapter.
pub struct IssueStore<'a> {
    kv: &'a dyn KeyValueStore,
}

impl<'a> IssueStore<'a> {
    /// Creates a store over the context's per-document state.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            kv: ctx.state.as_ref(),
        }
    }

    /// Returns every applied-issue record keyed by issue id.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be read or parsed.
    pub fn get(&self) -> Result<BTreeMap<String, IssueRecord>> {
        Ok(self.load(ISSUES_KEY)?.unwrap_or_default())
    }

    /// Inserts or replaces the record for `issue_id`. Last write wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be read, parsed or written.
    pub fn put(&self, issue_id: &str, record: IssueRecord) -> Result<()> {
        let mut records = self.get()?;
        records.insert(issue_id.to_string(), record);
        self.save(ISSUES_KEY, &records)
    }

    /// Comments returned by the previous review, sent back as `existing_issues`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be read or parsed.
    pub fn last_comments(&self) -> Result<Vec<Comment>> {
        Ok(self.load(LAST_COMMENTS_KEY)?.unwrap_or_default())
    }

    /// Replaces the stored comments of the latest review.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be written.
    pub fn save_last_comments(&self, comments: &[Comment]) -> Result<()> {
        self.save(LAST_COMMENTS_KEY, &comments)
    }

    /// The most recent analysis, if a review has completed before.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be read or parsed.
    pub fn last_analysis(&self) -> Result<Option<Analysis>> {
        self.load(LAST_ANALYSIS_KEY)
    }

    /// Stores `analysis` as the most recent one.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be written.
    pub fn save_analysis(&self, analysis: &Analysis) -> Result<()> {
        self.save(LAST_ANALYSIS_KEY, analysis)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self
            .kv
            .get(key)
            .map_err(|e| ReviewError::Store(format!("Failed to read {key}: {e}")))?
        else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| ReviewError::Store(format!("Failed to parse {key}: {e}")))
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| ReviewError::Store(format!("Failed to serialize {key}: {e}")))?;
        self.kv
            .set(key, &json)
            .map_err(|e| ReviewError::Store(format!("Failed to write {key}: {e}")))
    }
}
