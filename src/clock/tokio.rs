//! Tokio-backed time source.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use super::TimeSource;

/// Time source backed by `tokio::time`.
///
/// Built on [`tokio::time::Instant`], so it follows the runtime's clock:
/// under `#[tokio::test(start_paused = true)]` the reported time is
/// virtual and sleeps resolve as the test runtime advances it.
#[derive(Debug, Clone)]
pub struct TokioTime {
    /// Epoch for `now()` readings.
    start: ::tokio::time::Instant,
}

impl TokioTime {
    /// Create a new time source with its epoch at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: ::tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for TokioTime {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(::tokio::time::sleep(duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_now_follows_virtual_time() {
        let clock = TokioTime::new();
        assert_eq!(clock.now(), Duration::ZERO);

        ::tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(clock.now(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_resolves_on_advance() {
        let clock = TokioTime::new();
        clock.sleep(Duration::from_millis(250)).await;
        assert_eq!(clock.now(), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_until_past_deadline_is_immediate() {
        let clock = TokioTime::new();
        ::tokio::time::advance(Duration::from_secs(10)).await;

        clock.sleep_until(Duration::from_secs(3)).await;
        assert_eq!(clock.now(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_until_future_deadline() {
        let clock = TokioTime::new();
        clock.sleep_until(Duration::from_secs(2)).await;
        assert_eq!(clock.now(), Duration::from_secs(2));
    }
}
