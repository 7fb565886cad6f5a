//! Failure reporting seam.
//!
//! The host test framework owns what a failed assertion means; the
//! library only promises to call [`FailureSink::report_failure`] at most
//! once per unfulfilled expectation, with the lazily built message and
//! the caller's source location. [`PanicSink`] is the default and behaves
//! like a failed `assert!`; [`CapturingSink`] records reports so the
//! library's own behavior can be tested.

use parking_lot::Mutex;
use std::panic::Location;

/// Receives failure reports for unfulfilled expectations.
pub trait FailureSink: Send + Sync {
    /// Record one failed expectation.
    ///
    /// Called at most once per expectation, and only when the expectation
    /// was never fulfilled within its wait window.
    fn report_failure(&self, message: &str, location: &'static Location<'static>);
}

/// Default sink: panics with the message and call site.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicSink;

impl FailureSink for PanicSink {
    fn report_failure(&self, message: &str, location: &'static Location<'static>) {
        panic!(
            "{message}, at {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        );
    }
}

/// One recorded failure report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    /// The failure message built from the last attempt.
    pub message: String,
    /// Source file of the expectation's call site.
    pub file: String,
    /// Source line of the expectation's call site.
    pub line: u32,
}

/// Sink that records reports instead of failing.
#[derive(Debug, Default)]
pub struct CapturingSink {
    reports: Mutex<Vec<FailureReport>>,
}

impl CapturingSink {
    /// Create an empty capturing sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports recorded so far, in arrival order.
    #[must_use]
    pub fn reports(&self) -> Vec<FailureReport> {
        self.reports.lock().clone()
    }

    /// Number of recorded reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    /// Returns `true` if nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }
}

impl FailureSink for CapturingSink {
    fn report_failure(&self, message: &str, location: &'static Location<'static>) {
        self.reports.lock().push(FailureReport {
            message: message.to_owned(),
            file: location.file().to_owned(),
            line: location.line(),
        });
    }
}
