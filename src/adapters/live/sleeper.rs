//! Live sleeper backed by the tokio timer.

use std::time::Duration;

use crate::ports::{SleepFuture, Sleeper};

/// Sleeps on the tokio runtime's timer.
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        Box::pin(tokio::time::sleep(duration))
    }
}
