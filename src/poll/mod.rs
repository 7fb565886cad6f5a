//! The bounded, cancellable polling engine.
//!
//! A polling session repeatedly evaluates an async predicate until it
//! reports true, faults, or the overall deadline passes. Each attempt runs
//! on its own task and is raced against a per-attempt budget; an attempt
//! still running when its budget expires is aborted, so a stuck predicate
//! can never wedge the session past its deadline.
//!
//! Attempts within a session are strictly sequential. Between attempts the
//! session pauses for the configured poll interval.
//!
//! # Example
//!
//! ```rust,ignore
//! use async_expectations::poll::{PollConfig, Poller, Verdict};
//!
//! let poller = Poller::default();
//! let verdict = poller.poll(|| async { Ok(server.is_ready()) }).await;
//! assert!(verdict.is_fulfilled());
//! ```

mod config;

pub use config::{PollConfig, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT};

use std::future::Future;

use crate::clock::{TimeSource, TokioTime};
use crate::error::{BoxError, Error};
use crate::sync::ConcurrentBox;

/// Outcome of a single evaluation attempt.
#[derive(Debug)]
pub(crate) enum AttemptOutcome {
    /// The predicate reported true.
    Fulfilled,
    /// The predicate reported false.
    NotFulfilled,
    /// The predicate faulted; the session must stop.
    Failed(BoxError),
    /// The attempt was aborted before publishing an outcome.
    Cancelled,
}

/// Final verdict of a polling session.
///
/// Every session resolves to exactly one verdict.
#[derive(Debug)]
pub enum Verdict {
    /// An attempt observed the condition as true.
    Fulfilled,
    /// The overall deadline passed without a fulfilling attempt.
    TimedOut,
    /// An attempt faulted and evaluation stopped immediately.
    Failed(Error),
}

impl Verdict {
    /// Returns `true` if the condition was observed as true.
    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled)
    }

    /// Returns `true` if the session exhausted its deadline.
    #[must_use]
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

/// Drives polling sessions against an injectable clock.
///
/// `poll` must be called from within a tokio runtime; attempts are spawned
/// as tasks so they can be aborted when their budget expires.
#[derive(Debug)]
pub struct Poller<C: TimeSource = TokioTime> {
    pub(crate) config: PollConfig,
    pub(crate) clock: C,
}

impl<C: TimeSource> Poller<C> {
    /// Create a poller from a configuration and a clock.
    #[must_use]
    pub fn new(config: PollConfig, clock: C) -> Self {
        Self { config, clock }
    }

    /// Run one polling session to its verdict.
    ///
    /// The predicate is invoked once per attempt and must produce a fresh
    /// future each time. `Ok(true)` fulfills the session, `Ok(false)` and
    /// cancelled attempts are retried at the poll cadence, and `Err`
    /// stops the session immediately without further attempts.
    ///
    /// At least one attempt always runs, even with a zero overall timeout,
    /// so an already-true condition is fulfilled rather than timed out.
    pub async fn poll<F, Fut>(&self, mut predicate: F) -> Verdict
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<bool, BoxError>> + Send + 'static,
    {
        let deadline = self.clock.now() + self.config.overall_timeout;

        loop {
            match self.attempt(predicate()).await {
                AttemptOutcome::Fulfilled => return Verdict::Fulfilled,
                AttemptOutcome::Failed(source) => {
                    return Verdict::Failed(Error::Predicate(source));
                }
                AttemptOutcome::NotFulfilled | AttemptOutcome::Cancelled => {}
            }

            if self.clock.now() >= deadline {
                return Verdict::TimedOut;
            }
            self.clock.sleep(self.config.poll_interval).await;
            if self.clock.now() >= deadline {
                return Verdict::TimedOut;
            }
        }
    }

    /// Run a single attempt, racing it against the attempt budget.
    ///
    /// The attempt future runs on its own task and publishes its outcome
    /// through a session-local cell. On budget expiry the task is aborted
    /// and then awaited, so no attempt outlives its session. An attempt
    /// that was aborted before publishing reads back as `Cancelled`.
    pub(crate) async fn attempt<Fut>(&self, future: Fut) -> AttemptOutcome
    where
        Fut: Future<Output = std::result::Result<bool, BoxError>> + Send + 'static,
    {
        let outcome: ConcurrentBox<Option<AttemptOutcome>> = ConcurrentBox::new(None);
        let publish = outcome.clone();

        let mut handle = tokio::spawn(async move {
            let result = match future.await {
                Ok(true) => AttemptOutcome::Fulfilled,
                Ok(false) => AttemptOutcome::NotFulfilled,
                Err(source) => AttemptOutcome::Failed(source),
            };
            publish.set(Some(result));
        });

        tokio::select! {
            joined = &mut handle => {
                if let Err(join_err) = joined {
                    if join_err.is_panic() {
                        std::panic::resume_unwind(join_err.into_panic());
                    }
                }
            }
            () = self.clock.sleep(self.config.attempt_budget()) => {
                handle.abort();
                if let Err(join_err) = (&mut handle).await {
                    if join_err.is_panic() {
                        std::panic::resume_unwind(join_err.into_panic());
                    }
                }
            }
        }

        outcome.take().unwrap_or(AttemptOutcome::Cancelled)
    }
}

impl Default for Poller<TokioTime> {
    fn default() -> Self {
        Self::new(PollConfig::default(), TokioTime::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn poller(config: PollConfig) -> Poller<TokioTime> {
        Poller::new(config, TokioTime::new())
    }

    #[tokio::test(start_paused = true)]
    async fn test_fulfilled_after_several_attempts() {
        let poller = poller(PollConfig::new().poll_interval(Duration::from_millis(100)));
        let clock = TokioTime::new();
        let calls = Arc::new(AtomicU32::new(0));

        let counted = calls.clone();
        let verdict = poller
            .poll(move || {
                let n = counted.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Ok(n >= 3) }
            })
            .await;

        assert!(verdict.is_fulfilled());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(clock.now(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_true_times_out_on_schedule() {
        let poller = poller(
            PollConfig::new()
                .overall_timeout(Duration::from_secs(1))
                .poll_interval(Duration::from_millis(100)),
        );
        let clock = TokioTime::new();
        let calls = Arc::new(AtomicU32::new(0));

        let counted = calls.clone();
        let verdict = poller
            .poll(move || {
                counted.fetch_add(1, Ordering::SeqCst);
                async { Ok(false) }
            })
            .await;

        assert!(verdict.is_timed_out());
        assert_eq!(calls.load(Ordering::SeqCst), 10);
        assert_eq!(clock.now(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fault_stops_the_session_immediately() {
        let poller = poller(PollConfig::new().poll_interval(Duration::from_millis(100)));
        let calls = Arc::new(AtomicU32::new(0));

        let counted = calls.clone();
        let verdict = poller
            .poll(move || {
                let n = counted.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n == 2 {
                        Err("boom".into())
                    } else {
                        Ok(false)
                    }
                }
            })
            .await;

        assert!(matches!(verdict, Verdict::Failed(Error::Predicate(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_attempt_is_cancelled_at_budget() {
        let poller = poller(
            PollConfig::new()
                .overall_timeout(Duration::from_millis(500))
                .poll_interval(Duration::from_millis(100))
                .attempt_timeout(Duration::from_millis(200)),
        );
        let clock = TokioTime::new();
        let finished = Arc::new(AtomicBool::new(false));

        let observed = finished.clone();
        let verdict = poller
            .poll(move || {
                let observed = observed.clone();
                async move {
                    ::tokio::time::sleep(Duration::from_secs(10)).await;
                    observed.store(true, Ordering::SeqCst);
                    Ok(true)
                }
            })
            .await;

        // The predicate would eventually report true, but every attempt is
        // aborted at the 200ms budget before reaching that point.
        assert!(verdict.is_timed_out());
        assert!(!finished.load(Ordering::SeqCst));
        assert_eq!(clock.now(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_attempt_is_retried() {
        let poller = poller(
            PollConfig::new()
                .overall_timeout(Duration::from_secs(1))
                .poll_interval(Duration::from_millis(50))
                .attempt_timeout(Duration::from_millis(100)),
        );
        let calls = Arc::new(AtomicU32::new(0));

        let counted = calls.clone();
        let verdict = poller
            .poll(move || {
                let n = counted.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n == 1 {
                        ::tokio::time::sleep(Duration::from_secs(10)).await;
                    }
                    Ok(true)
                }
            })
            .await;

        assert!(verdict.is_fulfilled());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_true_fulfills_with_zero_timeout() {
        let poller = poller(PollConfig::new().overall_timeout(Duration::ZERO));
        let clock = TokioTime::new();
        let calls = Arc::new(AtomicU32::new(0));

        let counted = calls.clone();
        let verdict = poller
            .poll(move || {
                counted.fetch_add(1, Ordering::SeqCst);
                async { Ok(true) }
            })
            .await;

        assert!(verdict.is_fulfilled());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_still_runs_one_attempt() {
        let poller = poller(PollConfig::new().overall_timeout(Duration::ZERO));
        let calls = Arc::new(AtomicU32::new(0));

        let counted = calls.clone();
        let verdict = poller
            .poll(move || {
                counted.fetch_add(1, Ordering::SeqCst);
                async { Ok(false) }
            })
            .await;

        assert!(verdict.is_timed_out());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    #[should_panic(expected = "predicate exploded")]
    async fn test_panicking_predicate_resumes_on_caller() {
        let poller = Poller::default();
        let _ = poller
            .poll(|| async { panic!("predicate exploded") })
            .await;
    }
}
