//! In-memory adapters for every port.
//!
//! Each adapter is a cheap `Clone` handle over shared state, so a test can
//! box one copy into a [`ServiceContext`](crate::context::ServiceContext)
//! and keep another to inspect what happened.

pub mod analysis;
pub mod clock;
pub mod document;
pub mod id_gen;
pub mod sleeper;
pub mod store;

use std::sync::{Arc, Mutex};

pub use analysis::ScriptedAnalysisService;
pub use clock::FixedClock;
pub use document::{InMemoryDocument, RecordedAnnotation};
pub use id_gen::SequentialIds;
pub use sleeper::RecordingSleeper;
pub use store::InMemoryStore;

/// Shared, ordered log of port calls across several adapters.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn push(&self, event: impl Into<String>) {
        self.events
            .lock()
            .expect("event log lock poisoned")
            .push(event.into());
    }

    /// Returns a snapshot of all events so far.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("event log lock poisoned").clone()
    }
}
