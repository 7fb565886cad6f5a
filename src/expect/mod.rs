//! Polled assertions over async conditions.
//!
//! An [`Expectation`] describes a condition that should eventually hold;
//! an [`Expector`] drives it through the polling engine and routes the
//! outcome to a [`FailureSink`]. The free functions [`expect()`] and
//! [`expect_all()`] run with the default configuration: one second overall,
//! attempts every 100ms, failures reported by panicking.
//!
//! # Example
//!
//! ```rust,ignore
//! use async_expectations::{expect, Expectation};
//!
//! let queue = queue.clone();
//! expect(Expectation::truthy(move || {
//!     let queue = queue.clone();
//!     async move { queue.is_drained().await }
//! }))
//! .await?;
//! ```

mod expectation;
mod sink;

pub use expectation::Expectation;
pub use sink::{CapturingSink, FailureReport, FailureSink, PanicSink};

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::clock::{TimeSource, TokioTime};
use crate::error::{Error, Result};
use crate::poll::{AttemptOutcome, PollConfig, Poller, Verdict};

/// Drives expectations to a verdict and reports failures.
///
/// Builder methods configure the wait window and cadence; `check` and
/// `check_all` run sessions. The sink is called at most once per
/// expectation, and only when it was never fulfilled.
pub struct Expector<C: TimeSource = TokioTime> {
    pub(crate) poller: Poller<C>,
    pub(crate) sink: Arc<dyn FailureSink>,
}

impl Expector<TokioTime> {
    /// Create an expector with the default configuration, the tokio
    /// clock, and the panicking sink.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(TokioTime::new())
    }
}

impl Default for Expector<TokioTime> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: TimeSource> Expector<C> {
    /// Create an expector running on the given clock.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            poller: Poller::new(PollConfig::default(), clock),
            sink: Arc::new(PanicSink),
        }
    }

    /// Set the overall wait window.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.poller.config = self.poller.config.overall_timeout(timeout);
        self
    }

    /// Set the pause between attempts.
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poller.config = self.poller.config.poll_interval(interval);
        self
    }

    /// Cap the duration of a single attempt.
    #[must_use]
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.poller.config = self.poller.config.attempt_timeout(timeout);
        self
    }

    /// Swap in a different clock, keeping configuration and sink.
    #[must_use]
    pub fn clock<D: TimeSource>(self, clock: D) -> Expector<D> {
        Expector {
            poller: Poller::new(self.poller.config, clock),
            sink: self.sink,
        }
    }

    /// Route failure reports to `sink` instead of panicking.
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Poll one expectation to its verdict.
    ///
    /// Fulfilled resolves to `Ok(())` without touching the sink. An
    /// exhausted wait window reports the failure once and also resolves
    /// to `Ok(())`; the sink decides severity. A predicate fault is
    /// returned as `Err` and never reported to the sink.
    pub async fn check(&self, mut expectation: Expectation) -> Result<()> {
        let verdict = self.poller.poll(|| expectation.evaluate()).await;
        match verdict {
            Verdict::Fulfilled => Ok(()),
            Verdict::TimedOut => {
                self.sink
                    .report_failure(&expectation.failure_reason(), expectation.location());
                Ok(())
            }
            Verdict::Failed(err) => Err(err),
        }
    }

    /// Poll several expectations against one shared wait window.
    ///
    /// Runs in rounds at the poll cadence. Within a round every
    /// still-unfulfilled expectation is evaluated concurrently, each
    /// attempt capped by the attempt budget. Fulfillment is sticky: once
    /// an expectation holds it is never re-evaluated. The result keeps
    /// input order and is only returned once every expectation is
    /// fulfilled or the window is exhausted; a predicate fault anywhere
    /// aborts the whole aggregate with `Err`.
    pub async fn await_all(
        &self,
        expectations: Vec<Expectation>,
    ) -> Result<Vec<(Expectation, bool)>> {
        let deadline = self.poller.clock.now() + self.poller.config.overall_timeout;
        let mut entries: Vec<(Expectation, bool)> = expectations
            .into_iter()
            .map(|expectation| (expectation, false))
            .collect();

        loop {
            let round = entries.iter_mut().filter(|entry| !entry.1).map(|entry| {
                let (expectation, fulfilled) = entry;
                let attempt = expectation.evaluate();
                async move { (fulfilled, self.poller.attempt(attempt).await) }
            });

            for (fulfilled, outcome) in join_all(round).await {
                match outcome {
                    AttemptOutcome::Fulfilled => *fulfilled = true,
                    AttemptOutcome::Failed(source) => return Err(Error::Predicate(source)),
                    AttemptOutcome::NotFulfilled | AttemptOutcome::Cancelled => {}
                }
            }

            if entries.iter().all(|entry| entry.1) {
                return Ok(entries);
            }
            if self.poller.clock.now() >= deadline {
                return Ok(entries);
            }
            self.poller.clock.sleep(self.poller.config.poll_interval).await;
            if self.poller.clock.now() >= deadline {
                return Ok(entries);
            }
        }
    }

    /// Poll several expectations and report every unfulfilled one.
    ///
    /// Reports go to the sink in input order, one per unfulfilled
    /// expectation.
    pub async fn check_all(&self, expectations: Vec<Expectation>) -> Result<()> {
        for (expectation, fulfilled) in self.await_all(expectations).await? {
            if !fulfilled {
                self.sink
                    .report_failure(&expectation.failure_reason(), expectation.location());
            }
        }
        Ok(())
    }
}

/// Poll one expectation with the default configuration.
///
/// One second overall, attempts every 100ms, failures panic.
pub async fn expect(expectation: Expectation) -> Result<()> {
    Expector::new().check(expectation).await
}

/// Poll several expectations against one shared default wait window.
pub async fn expect_all(expectations: Vec<Expectation>) -> Result<()> {
    Expector::new().check_all(expectations).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::ready;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn capturing() -> (Arc<CapturingSink>, Expector<TokioTime>) {
        let sink = Arc::new(CapturingSink::new());
        let expector = Expector::new()
            .timeout(Duration::from_millis(300))
            .poll_interval(Duration::from_millis(100))
            .sink(sink.clone());
        (sink, expector)
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_fulfilled_leaves_sink_untouched() {
        let (sink, expector) = capturing();

        expector
            .check(Expectation::truthy(|| ready(true)))
            .await
            .unwrap();

        assert!(sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_reports_timeout_exactly_once() {
        let (sink, expector) = capturing();

        expector
            .check(Expectation::truthy(|| ready(false)))
            .await
            .unwrap();

        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].message, "expected condition to become true");
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_propagates_faults_without_reporting() {
        let (sink, expector) = capturing();

        let err = expector
            .check(Expectation::try_truthy(|| {
                ready(Err::<bool, _>("socket closed"))
            }))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Predicate(_)));
        assert!(sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_await_all_keeps_input_order_and_never_fast_fails() {
        let (_, expector) = capturing();

        let results = expector
            .await_all(vec![
                Expectation::truthy(|| ready(true)),
                Expectation::truthy(|| ready(false)),
                Expectation::truthy(|| ready(true)),
            ])
            .await
            .unwrap();

        let verdicts: Vec<bool> = results.iter().map(|entry| entry.1).collect();
        assert_eq!(verdicts, vec![true, false, true]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_await_all_fulfillment_is_sticky() {
        let (_, expector) = capturing();
        let calls = Arc::new(AtomicU32::new(0));

        let counted = calls.clone();
        let flickering = Expectation::truthy(move || {
            // True on the first attempt only; stickiness must preserve it.
            let n = counted.fetch_add(1, Ordering::SeqCst);
            ready(n == 0)
        });

        let results = expector
            .await_all(vec![flickering, Expectation::truthy(|| ready(false))])
            .await
            .unwrap();

        assert!(results[0].1);
        assert!(!results[1].1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_await_all_returns_early_when_everything_holds() {
        let (_, expector) = capturing();
        let clock = TokioTime::new();

        let results = expector
            .await_all(vec![
                Expectation::truthy(|| ready(true)),
                Expectation::truthy(|| ready(true)),
            ])
            .await
            .unwrap();

        assert!(results.iter().all(|entry| entry.1));
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_await_all_fault_aborts_the_aggregate() {
        let (_, expector) = capturing();

        let err = expector
            .await_all(vec![
                Expectation::truthy(|| ready(false)),
                Expectation::try_truthy(|| ready(Err::<bool, _>("db gone"))),
            ])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Predicate(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_await_all_with_no_expectations_resolves() {
        let (_, expector) = capturing();
        let results = expector.await_all(Vec::new()).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_all_reports_each_unfulfilled_in_order() {
        let (sink, expector) = capturing();

        expector
            .check_all(vec![
                Expectation::equal(|| ready(1), || ready(2)),
                Expectation::truthy(|| ready(true)),
                Expectation::is_none(|| ready(Some("leftover"))),
            ])
            .await
            .unwrap();

        let reports = sink.reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].message, "expected 1 to be equal to 2");
        assert_eq!(
            reports[1].message,
            "expected None, last saw Some(\"leftover\")"
        );
    }

    #[tokio::test(start_paused = true)]
    #[should_panic(expected = "expected condition to become true")]
    async fn test_default_sink_panics_on_timeout() {
        let expector = Expector::new().timeout(Duration::from_millis(100));
        let _ = expector.check(Expectation::truthy(|| ready(false))).await;
    }
}
