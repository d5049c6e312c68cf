//! Sleeper port used for the post-annotation sync delay.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future returned by [`Sleeper::sleep`].
pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Suspends the current task for a while.
///
/// The applier never waits any other way, so tests can observe every
/// delay without spending real time.
pub trait Sleeper: Send + Sync {
    /// Completes once `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> SleepFuture<'_>;
}
