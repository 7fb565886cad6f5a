//! # async-expectations
//!
//! > Bounded, cancellable condition polling for async tests
//!
//! **async-expectations** lets async test code assert that a condition
//! eventually holds, within a bounded wait window, without hand-written
//! polling loops or sleeps.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use async_expectations::prelude::*;
//!
//! #[tokio::test]
//! async fn worker_drains_the_queue() {
//!     let queue = spawn_worker().await;
//!
//!     let queue2 = queue.clone();
//!     expect(Expectation::truthy(move || {
//!         let queue = queue2.clone();
//!         async move { queue.is_empty().await }
//!     }))
//!     .await
//!     .unwrap();
//! }
//! ```
//!
//! ## Features
//!
//! - **Polled assertions** - re-evaluate a predicate until it holds or the
//!   window closes, with per-attempt cancellation
//! - **Typed matchers** - equality, ordering, option and result shapes
//!   with failure messages built from the last observed values
//! - **Value awaiting** - wait for `Some`, for `Ok`, or for the first
//!   stream item, and get the value back
//! - **Injectable clock and sink** - virtual-time tests and pluggable
//!   failure reporting

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod error;
pub mod expect;
pub mod poll;
pub mod sync;
pub mod value;

mod macros;

/// Prelude for convenient imports
///
/// ```rust
/// use async_expectations::prelude::*;
/// ```
pub mod prelude {
    pub use crate::clock::{TimeSource, TokioTime};
    pub use crate::error::{Error, Result};
    pub use crate::expect::{expect, expect_all, Expectation, Expector};
    pub use crate::value::{expect_first, expect_some, expect_value};
}

// Re-exports
pub use clock::{TimeSource, TokioTime};
pub use error::{BoxError, Error, Result};
pub use expect::{
    expect, expect_all, CapturingSink, Expectation, Expector, FailureReport, FailureSink, PanicSink,
};
pub use poll::{PollConfig, Poller, Verdict};
pub use sync::ConcurrentBox;
pub use value::{expect_first, expect_some, expect_value, FirstValue};
