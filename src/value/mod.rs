//! Awaiting values instead of conditions.
//!
//! Sometimes a test does not want to assert a condition, it wants the
//! value an async expression eventually produces: the row once it is
//! inserted, the first message on a stream. These operations poll with
//! the same engine as the assertions and hand the value back, caching it
//! in a session-local cell so the producing expression is never invoked
//! again after it succeeds.
//!
//! # Example
//!
//! ```rust,ignore
//! use async_expectations::expect_some;
//!
//! let store = store.clone();
//! let row = expect_some(move || {
//!     let store = store.clone();
//!     async move { store.find(42).await }
//! })
//! .await?;
//! ```

mod first;

pub use first::FirstValue;

use futures_core::Stream;
use std::future::Future;

use crate::clock::TimeSource;
use crate::error::{Error, Result};
use crate::expect::Expector;
use crate::poll::Verdict;
use crate::sync::ConcurrentBox;

impl<C: TimeSource> Expector<C> {
    /// Poll until the expression produces `Some`, returning the value.
    ///
    /// The value observed by the fulfilling attempt is returned as-is;
    /// the expression is not invoked again to extract it. An exhausted
    /// wait window yields [`Error::ValueNotProduced`].
    pub async fn some_value<F, Fut, T>(&self, mut produce: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<T>> + Send + 'static,
        T: Send + 'static,
    {
        let slot: ConcurrentBox<Option<T>> = ConcurrentBox::new(None);
        let verdict = self
            .poller
            .poll(|| {
                let publish = slot.clone();
                let fut = produce();
                async move {
                    match fut.await {
                        Some(value) => {
                            publish.set(Some(value));
                            Ok(true)
                        }
                        None => Ok(false),
                    }
                }
            })
            .await;

        self.resolve(verdict, slot)
    }

    /// Poll until the expression succeeds, returning the `Ok` value.
    ///
    /// Intermediate `Err` results are treated as not-yet and retried;
    /// only the wait window failing yields an error, as
    /// [`Error::ValueNotProduced`].
    pub async fn value<F, Fut, T, E>(&self, mut produce: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Send + 'static,
    {
        let slot: ConcurrentBox<Option<T>> = ConcurrentBox::new(None);
        let verdict = self
            .poller
            .poll(|| {
                let publish = slot.clone();
                let fut = produce();
                async move {
                    match fut.await {
                        Ok(value) => {
                            publish.set(Some(value));
                            Ok(true)
                        }
                        Err(_) => Ok(false),
                    }
                }
            })
            .await;

        self.resolve(verdict, slot)
    }

    /// Wait for the first item of a stream, bounded by the wait window.
    ///
    /// The stream is dropped on every exit path, so the subscription
    /// never outlives the call. A stream that ends without an item, or a
    /// window that expires first, yields [`Error::ValueNotProduced`].
    pub async fn first_value<S>(&self, stream: S) -> Result<S::Item>
    where
        S: Stream,
    {
        let timeout = self.poller.config.overall_timeout;
        let first = FirstValue::new(stream);
        tokio::pin!(first);

        tokio::select! {
            item = &mut first => item.ok_or(Error::ValueNotProduced(timeout)),
            () = self.poller.clock.sleep(timeout) => Err(Error::ValueNotProduced(timeout)),
        }
    }

    fn resolve<T>(&self, verdict: Verdict, slot: ConcurrentBox<Option<T>>) -> Result<T> {
        let timeout = self.poller.config.overall_timeout;
        match verdict {
            Verdict::Fulfilled => slot.take().ok_or(Error::ValueNotProduced(timeout)),
            Verdict::TimedOut => Err(Error::ValueNotProduced(timeout)),
            Verdict::Failed(err) => Err(err),
        }
    }
}

/// Wait for an expression to produce `Some`, with the default window.
pub async fn expect_some<F, Fut, T>(produce: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>> + Send + 'static,
    T: Send + 'static,
{
    Expector::new().some_value(produce).await
}

/// Wait for an expression to succeed, with the default window.
pub async fn expect_value<F, Fut, T, E>(produce: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    T: Send + 'static,
{
    Expector::new().value(produce).await
}

/// Wait for the first item of a stream, with the default window.
pub async fn expect_first<S>(stream: S) -> Result<S::Item>
where
    S: Stream,
{
    Expector::new().first_value(stream).await
}
