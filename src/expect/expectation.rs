//! The matcher family: typed constructors over one predicate shape.
//!
//! Every matcher reduces to the same thing: a re-invocable async predicate
//! returning `Result<bool, BoxError>`, a lazy failure message, and the
//! source location of the call site. The typed constructors here exist so
//! the caller states intent (`equal`, `is_some`, `throws`) and gets a
//! useful message for free.
//!
//! Two-operand matchers record the `Debug` rendering of the operands seen
//! by the most recent attempt; the failure message formats from that
//! record, so building a message never re-evaluates user expressions.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::fmt::{Debug, Display};
use std::future::Future;
use std::panic::Location;

use crate::error::BoxError;
use crate::sync::ConcurrentBox;

type Predicate = Box<dyn FnMut() -> BoxFuture<'static, Result<bool, BoxError>> + Send>;
type Reason = Box<dyn Fn() -> String + Send + Sync>;

/// A condition to be polled until it holds, plus how to describe it
/// when it never does.
///
/// Construct one with the typed constructors and hand it to
/// [`expect`](crate::expect()) or an [`Expector`](crate::Expector).
/// Sub-expressions are never evaluated at construction time; only polling
/// attempts run them.
///
/// # Example
///
/// ```rust,ignore
/// use async_expectations::{expect, Expectation};
///
/// expect(Expectation::equal(
///     move || async { store.len().await },
///     move || std::future::ready(3),
/// ))
/// .await?;
/// ```
pub struct Expectation {
    predicate: Predicate,
    reason: Reason,
    location: &'static Location<'static>,
}

impl Expectation {
    #[track_caller]
    fn from_parts(predicate: Predicate, reason: Reason) -> Self {
        Self {
            predicate,
            reason,
            location: Location::caller(),
        }
    }

    /// Expect an async boolean expression to become true.
    #[track_caller]
    pub fn truthy<F, Fut>(mut condition: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Self::from_parts(
            Box::new(move || {
                let fut = condition();
                async move { Ok(fut.await) }.boxed()
            }),
            Box::new(|| String::from("expected condition to become true")),
        )
    }

    /// Expect an async boolean expression to become false.
    #[track_caller]
    pub fn falsy<F, Fut>(mut condition: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Self::from_parts(
            Box::new(move || {
                let fut = condition();
                async move { Ok(!fut.await) }.boxed()
            }),
            Box::new(|| String::from("expected condition to become false")),
        )
    }

    /// Expect a fallible boolean expression to become true.
    ///
    /// Unlike [`throws`](Self::throws), an `Err` here is a predicate
    /// fault: it stops the session immediately instead of being retried.
    #[track_caller]
    pub fn try_truthy<F, Fut, E>(mut condition: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<bool, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        Self::from_parts(
            Box::new(move || {
                let fut = condition();
                async move { fut.await.map_err(Into::into) }.boxed()
            }),
            Box::new(|| String::from("expected condition to become true")),
        )
    }

    /// Expect two async expressions to produce equal values.
    #[track_caller]
    pub fn equal<F, G, FutL, FutR, T>(left: F, right: G) -> Self
    where
        F: FnMut() -> FutL + Send + 'static,
        G: FnMut() -> FutR + Send + 'static,
        FutL: Future<Output = T> + Send + 'static,
        FutR: Future<Output = T> + Send + 'static,
        T: PartialEq + Debug + Send + 'static,
    {
        Self::comparing(left, right, "equal to", |l, r| l == r)
    }

    /// Expect two async expressions to produce different values.
    #[track_caller]
    pub fn not_equal<F, G, FutL, FutR, T>(left: F, right: G) -> Self
    where
        F: FnMut() -> FutL + Send + 'static,
        G: FnMut() -> FutR + Send + 'static,
        FutL: Future<Output = T> + Send + 'static,
        FutR: Future<Output = T> + Send + 'static,
        T: PartialEq + Debug + Send + 'static,
    {
        Self::comparing(left, right, "different from", |l, r| l != r)
    }

    /// Expect the left expression to become strictly less than the right.
    #[track_caller]
    pub fn less_than<F, G, FutL, FutR, T>(left: F, right: G) -> Self
    where
        F: FnMut() -> FutL + Send + 'static,
        G: FnMut() -> FutR + Send + 'static,
        FutL: Future<Output = T> + Send + 'static,
        FutR: Future<Output = T> + Send + 'static,
        T: PartialOrd + Debug + Send + 'static,
    {
        Self::comparing(left, right, "less than", |l, r| l < r)
    }

    /// Expect the left expression to become less than or equal to the right.
    #[track_caller]
    pub fn less_or_equal<F, G, FutL, FutR, T>(left: F, right: G) -> Self
    where
        F: FnMut() -> FutL + Send + 'static,
        G: FnMut() -> FutR + Send + 'static,
        FutL: Future<Output = T> + Send + 'static,
        FutR: Future<Output = T> + Send + 'static,
        T: PartialOrd + Debug + Send + 'static,
    {
        Self::comparing(left, right, "at most", |l, r| l <= r)
    }

    /// Expect the left expression to become strictly greater than the right.
    #[track_caller]
    pub fn greater_than<F, G, FutL, FutR, T>(left: F, right: G) -> Self
    where
        F: FnMut() -> FutL + Send + 'static,
        G: FnMut() -> FutR + Send + 'static,
        FutL: Future<Output = T> + Send + 'static,
        FutR: Future<Output = T> + Send + 'static,
        T: PartialOrd + Debug + Send + 'static,
    {
        Self::comparing(left, right, "greater than", |l, r| l > r)
    }

    /// Expect the left expression to become greater than or equal to the right.
    #[track_caller]
    pub fn greater_or_equal<F, G, FutL, FutR, T>(left: F, right: G) -> Self
    where
        F: FnMut() -> FutL + Send + 'static,
        G: FnMut() -> FutR + Send + 'static,
        FutL: Future<Output = T> + Send + 'static,
        FutR: Future<Output = T> + Send + 'static,
        T: PartialOrd + Debug + Send + 'static,
    {
        Self::comparing(left, right, "at least", |l, r| l >= r)
    }

    #[track_caller]
    fn comparing<F, G, FutL, FutR, T>(
        mut left: F,
        mut right: G,
        relation: &'static str,
        holds: fn(&T, &T) -> bool,
    ) -> Self
    where
        F: FnMut() -> FutL + Send + 'static,
        G: FnMut() -> FutR + Send + 'static,
        FutL: Future<Output = T> + Send + 'static,
        FutR: Future<Output = T> + Send + 'static,
        T: Debug + Send + 'static,
    {
        let seen: ConcurrentBox<Option<(String, String)>> = ConcurrentBox::new(None);
        let observed = seen.clone();

        Self::from_parts(
            Box::new(move || {
                let fut_left = left();
                let fut_right = right();
                let seen = seen.clone();
                async move {
                    let l = fut_left.await;
                    let r = fut_right.await;
                    let verdict = holds(&l, &r);
                    seen.set(Some((format!("{l:?}"), format!("{r:?}"))));
                    Ok(verdict)
                }
                .boxed()
            }),
            Box::new(move || match observed.get() {
                Some((l, r)) => format!("expected {l} to be {relation} {r}"),
                None => format!("expected operands to compare {relation}, but no attempt completed"),
            }),
        )
    }

    /// Expect an async expression to produce `None`.
    #[track_caller]
    pub fn is_none<F, Fut, T>(mut produce: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Option<T>> + Send + 'static,
        T: Debug + Send + 'static,
    {
        let seen: ConcurrentBox<Option<String>> = ConcurrentBox::new(None);
        let observed = seen.clone();

        Self::from_parts(
            Box::new(move || {
                let fut = produce();
                let seen = seen.clone();
                async move {
                    let value = fut.await;
                    let verdict = value.is_none();
                    seen.set(Some(format!("{value:?}")));
                    Ok(verdict)
                }
                .boxed()
            }),
            Box::new(move || match observed.get() {
                Some(value) => format!("expected None, last saw {value}"),
                None => String::from("expected None, but no attempt completed"),
            }),
        )
    }

    /// Expect an async expression to produce `Some` value.
    #[track_caller]
    pub fn is_some<F, Fut, T>(mut produce: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Option<T>> + Send + 'static,
        T: Debug + Send + 'static,
    {
        let seen: ConcurrentBox<Option<String>> = ConcurrentBox::new(None);
        let observed = seen.clone();

        Self::from_parts(
            Box::new(move || {
                let fut = produce();
                let seen = seen.clone();
                async move {
                    let value = fut.await;
                    let verdict = value.is_some();
                    seen.set(Some(format!("{value:?}")));
                    Ok(verdict)
                }
                .boxed()
            }),
            Box::new(move || match observed.get() {
                Some(value) => format!("expected a value, last saw {value}"),
                None => String::from("expected a value, but no attempt completed"),
            }),
        )
    }

    /// Expect a fallible async operation to fail.
    ///
    /// The inner `Err` is the observed outcome under test, never a
    /// predicate fault; an `Ok` result is retried until the deadline.
    #[track_caller]
    pub fn throws<F, Fut, T, E>(mut operation: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Debug + Send + 'static,
        E: Display + Send + 'static,
    {
        let seen: ConcurrentBox<Option<String>> = ConcurrentBox::new(None);
        let observed = seen.clone();

        Self::from_parts(
            Box::new(move || {
                let fut = operation();
                let seen = seen.clone();
                async move {
                    match fut.await {
                        Ok(value) => {
                            seen.set(Some(format!("Ok({value:?})")));
                            Ok(false)
                        }
                        Err(err) => {
                            seen.set(Some(format!("Err({err})")));
                            Ok(true)
                        }
                    }
                }
                .boxed()
            }),
            Box::new(move || match observed.get() {
                Some(outcome) => format!("expected the operation to fail, last saw {outcome}"),
                None => String::from("expected the operation to fail, but no attempt completed"),
            }),
        )
    }

    /// Expect a fallible async operation to succeed.
    #[track_caller]
    pub fn does_not_throw<F, Fut, T, E>(mut operation: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Debug + Send + 'static,
        E: Display + Send + 'static,
    {
        let seen: ConcurrentBox<Option<String>> = ConcurrentBox::new(None);
        let observed = seen.clone();

        Self::from_parts(
            Box::new(move || {
                let fut = operation();
                let seen = seen.clone();
                async move {
                    match fut.await {
                        Ok(value) => {
                            seen.set(Some(format!("Ok({value:?})")));
                            Ok(true)
                        }
                        Err(err) => {
                            seen.set(Some(format!("Err({err})")));
                            Ok(false)
                        }
                    }
                }
                .boxed()
            }),
            Box::new(move || match observed.get() {
                Some(outcome) => format!("expected the operation to succeed, last saw {outcome}"),
                None => String::from("expected the operation to succeed, but no attempt completed"),
            }),
        )
    }

    /// Build the failure message from the most recent attempt.
    #[must_use]
    pub fn failure_reason(&self) -> String {
        (self.reason)()
    }

    /// The call site where this expectation was constructed.
    #[must_use]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Produce the future for one evaluation attempt.
    pub(crate) fn evaluate(&mut self) -> BoxFuture<'static, Result<bool, BoxError>> {
        (self.predicate)()
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectation")
            .field(
                "location",
                &format_args!("{}:{}", self.location.file(), self.location.line()),
            )
            .finish_non_exhaustive()
    }
}
