//! Assertion sugar over the typed constructors.
//!
//! Each macro wraps a plain expression in a closure so it is re-evaluated
//! on every polling attempt, builds the matching
//! [`Expectation`](crate::Expectation), and hands it to
//! [`expect()`](crate::expect()). The expansion is a future; `.await` it.

/// Poll a boolean expression until it becomes true.
///
/// The expression is re-evaluated on every attempt, so reads of shared
/// state observe progress made by other tasks.
///
/// # Example
///
/// ```rust,ignore
/// let counter = counter.clone();
/// async_expectations::expect!(counter.get() >= 3).await?;
/// ```
#[macro_export]
macro_rules! expect {
    ($cond:expr $(,)?) => {
        $crate::expect($crate::Expectation::truthy(move || {
            ::std::future::ready($cond)
        }))
    };
}

/// Poll two expressions until they compare equal.
///
/// # Example
///
/// ```rust,ignore
/// async_expectations::expect_eq!(registry.len(), 2).await?;
/// ```
#[macro_export]
macro_rules! expect_eq {
    ($left:expr, $right:expr $(,)?) => {
        $crate::expect($crate::Expectation::equal(
            move || ::std::future::ready($left),
            move || ::std::future::ready($right),
        ))
    };
}

/// Poll two expressions until they compare unequal.
#[macro_export]
macro_rules! expect_ne {
    ($left:expr, $right:expr $(,)?) => {
        $crate::expect($crate::Expectation::not_equal(
            move || ::std::future::ready($left),
            move || ::std::future::ready($right),
        ))
    };
}

/// Poll an `Option` expression until it is `Some`.
#[macro_export]
macro_rules! expect_some {
    ($option:expr $(,)?) => {
        $crate::expect($crate::Expectation::is_some(move || {
            ::std::future::ready($option)
        }))
    };
}

/// Poll an `Option` expression until it is `None`.
#[macro_export]
macro_rules! expect_none {
    ($option:expr $(,)?) => {
        $crate::expect($crate::Expectation::is_none(move || {
            ::std::future::ready($option)
        }))
    };
}
