//! Service context bundling all port trait objects.

use std::path::Path;
use std::time::Duration;

use crate::adapters::live::{
    HttpAnalysisService, JsonFileStore, LiveClock, LiveIdGenerator, MarkdownDocument, TokioSleeper,
};
use crate::adapters::memory::{
    InMemoryDocument, InMemoryStore, RecordingSleeper, ScriptedAnalysisService, SequentialIds,
};
use crate::config::Config;
use crate::error::Result;
use crate::ports::{AnalysisService, Clock, DocumentPlatform, IdGenerator, KeyValueStore, Sleeper};

/// Bundles all port trait objects for one document into a single context.
///
/// Each field provides access to one external boundary. Constructors wire
/// up live or in-memory adapters; tests swap individual fields.
pub struct ServiceContext {
    /// The document under review.
    pub document: Box<dyn DocumentPlatform>,
    /// The external review, chat and reply service.
    pub analysis: Box<dyn AnalysisService>,
    /// Per-document persistent state.
    pub state: Box<dyn KeyValueStore>,
    /// Clock for stamping issue records.
    pub clock: Box<dyn Clock>,
    /// Waits out the post-annotation sync delay.
    pub sleeper: Box<dyn Sleeper>,
    /// Review run identifiers.
    pub id_gen: Box<dyn IdGenerator>,
    /// Delay after each successful annotation.
    pub comment_delay: Duration,
}

impl ServiceContext {
    /// Creates a live context for the Markdown document at `document`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn live(config: &Config, document: &Path) -> Result<Self> {
        Ok(Self {
            document: Box::new(MarkdownDocument::new(document)),
            analysis: Box::new(HttpAnalysisService::new(&config.api_url, config.request_timeout)?),
            state: Box::new(JsonFileStore::new(config.state_path_for(document))),
            clock: Box::new(LiveClock),
            sleeper: Box::new(TokioSleeper),
            id_gen: Box::new(LiveIdGenerator::new()),
            comment_delay: config.comment_delay,
        })
    }

    /// Creates a context over in-memory adapters holding `text`.
    ///
    /// The analysis service has nothing queued and the sleeper returns
    /// immediately. Replace fields to script a scenario.
    #[must_use]
    pub fn in_memory(text: &str) -> Self {
        Self {
            document: Box::new(InMemoryDocument::new(text)),
            analysis: Box::new(ScriptedAnalysisService::new()),
            state: Box::new(InMemoryStore::new()),
            clock: Box::new(LiveClock),
            sleeper: Box::new(RecordingSleeper::new()),
            id_gen: Box::new(SequentialIds::default()),
            comment_delay: Config::default().comment_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_context_uses_configured_delay() {
        let config = Config {
            comment_delay: Duration::from_millis(40),
            ..Config::default()
        };
        let ctx = ServiceContext::live(&config, Path::new("incident.md")).unwrap();
        assert_eq!(ctx.comment_delay, Duration::from_millis(40));
    }

    #[tokio::test]
    async fn in_memory_context_reads_given_text() {
        let ctx = ServiceContext::in_memory("Root Cause\npool exhaustion");
        let text = ctx.document.read_full_text().await.unwrap();
        assert_eq!(text, "Root Cause\npool exhaustion");
        assert_eq!(ctx.comment_delay, Duration::from_millis(1500));
    }
}
