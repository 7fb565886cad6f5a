//! Time abstraction for the polling engine.
//!
//! Polling sessions never read the system clock directly. They go through
//! the [`TimeSource`] trait, which keeps the engine testable: production
//! code runs on [`TokioTime`], and tests can drive virtual time with
//! `tokio::time::pause` or supply their own implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use async_expectations::clock::{TimeSource, TokioTime};
//! use std::time::Duration;
//!
//! let clock = TokioTime::new();
//! let before = clock.now();
//! clock.sleep(Duration::from_millis(50)).await;
//! assert!(clock.now() >= before + Duration::from_millis(50));
//! ```

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

mod tokio;

pub use self::tokio::TokioTime;

/// A source of time for async operations.
///
/// This trait abstracts over different time implementations, allowing
/// polling sessions to work with both real time and virtual time.
pub trait TimeSource: Send + Sync {
    /// Get the current time as a duration since an arbitrary epoch.
    ///
    /// The returned value is monotonic: it never decreases across calls
    /// on the same source.
    fn now(&self) -> Duration;

    /// Create a future that completes after the given duration.
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;

    /// Create a future that completes once `now()` reaches `deadline`.
    ///
    /// A deadline that has already passed completes immediately.
    fn sleep_until(&self, deadline: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let now = self.now();
        if deadline <= now {
            Box::pin(std::future::ready(()))
        } else {
            self.sleep(deadline - now)
        }
    }
}
