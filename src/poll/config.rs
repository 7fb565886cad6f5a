//! Polling session configuration.

use std::time::Duration;

/// Default overall deadline for a polling session.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default pause between evaluation attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for a polling session.
///
/// # Example
///
/// ```rust
/// use async_expectations::poll::PollConfig;
/// use std::time::Duration;
///
/// let config = PollConfig::new()
///     .overall_timeout(Duration::from_secs(5))
///     .poll_interval(Duration::from_millis(50));
/// ```
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Total wait budget for the session.
    pub(crate) overall_timeout: Duration,
    /// Pause between the end of one attempt and the start of the next.
    pub(crate) poll_interval: Duration,
    /// Cap on a single attempt; `None` falls back to the overall timeout.
    pub(crate) attempt_timeout: Option<Duration>,
}

impl PollConfig {
    /// Create a configuration with the default timeout and cadence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total wait budget for the session.
    #[must_use]
    pub fn overall_timeout(mut self, timeout: Duration) -> Self {
        self.overall_timeout = timeout;
        self
    }

    /// Set the pause between evaluation attempts.
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Cap the duration of a single evaluation attempt.
    ///
    /// An attempt still running when the cap expires is cancelled and
    /// counts as unfulfilled. Unset, the cap equals the overall timeout.
    #[must_use]
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// The effective per-attempt budget.
    #[must_use]
    pub fn attempt_budget(&self) -> Duration {
        self.attempt_timeout.unwrap_or(self.overall_timeout)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            overall_timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            attempt_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PollConfig::default();

        assert_eq!(config.overall_timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(config.attempt_budget(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_config_builder() {
        let config = PollConfig::new()
            .overall_timeout(Duration::from_secs(3))
            .poll_interval(Duration::from_millis(20))
            .attempt_timeout(Duration::from_millis(500));

        assert_eq!(config.overall_timeout, Duration::from_secs(3));
        assert_eq!(config.poll_interval, Duration::from_millis(20));
        assert_eq!(config.attempt_budget(), Duration::from_millis(500));
    }

    #[test]
    fn test_attempt_budget_tracks_overall_until_set() {
        let config = PollConfig::new().overall_timeout(Duration::from_secs(7));
        assert_eq!(config.attempt_budget(), Duration::from_secs(7));
    }
}
