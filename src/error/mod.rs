//! Error definitions
//!
//! This module provides error types for async-expectations.

use std::time::Duration;
use thiserror::Error;

/// Type-erased error carried out of a failing predicate.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for async-expectations
#[derive(Error, Debug)]
pub enum Error {
    /// No value was produced before the overall deadline
    #[error("no value was produced within {0:?}")]
    ValueNotProduced(Duration),

    /// A predicate faulted during evaluation
    #[error("predicate failed: {0}")]
    Predicate(#[source] BoxError),
}

impl Error {
    /// Create a predicate fault from any error type.
    #[must_use]
    pub fn predicate(source: impl Into<BoxError>) -> Self {
        Self::Predicate(source.into())
    }

    /// Returns `true` if this error reports an exhausted wait window.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ValueNotProduced(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
