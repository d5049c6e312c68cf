//! Sleeper that records requested delays instead of waiting.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::EventLog;
use crate::ports::{SleepFuture, Sleeper};

/// Records every requested delay and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
    log: Option<EventLog>,
}

impl RecordingSleeper {
    /// Creates a sleeper with no shared log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also appends `sleep:<millis>` to `log` on every call.
    #[must_use]
    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Delays requested so far, in call order.
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().expect("sleeper lock poisoned").clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        self.sleeps
            .lock()
            .expect("sleeper lock poisoned")
            .push(duration);
        if let Some(log) = &self.log {
            log.push(format!("sleep:{}", duration.as_millis()));
        }
        Box::pin(async {})
    }
}
