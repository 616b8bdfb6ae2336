//! Error types for wait operations
//!
//! Every terminal condition of a wait maps to exactly one variant. The
//! transient class (client-side fetch timeouts) never surfaces here unless
//! the overall deadline later expires.

use std::time::Duration;

use thiserror::Error;

use crate::action::ActionId;
use crate::remote::FetchError;

/// Main error type for wait operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The wall-clock budget expired while the condition was still pending
    #[error("timed out after {timeout:?} waiting for {description}")]
    Timeout {
        /// What was being waited on (e.g. "action 42")
        description: String,
        /// The configured deadline that elapsed
        timeout: Duration,
    },

    /// The caller cancelled the wait; displays the cancellation reason as-is
    #[error("{reason}")]
    Cancelled {
        /// Reason supplied by whoever cancelled
        reason: String,
    },

    /// The remote reported 404 while something was still expected to exist
    #[error("{what} not found")]
    NotFound {
        /// Kind of thing that disappeared ("resource", "action")
        what: String,
    },

    /// The remote action reached its errored terminal state
    #[error("action {id} errored")]
    ActionErrored {
        /// ID of the failed action
        id: ActionId,
    },

    /// A non-transient fetch failure
    #[error("fetch failed [{context}]: {source}")]
    Fetch {
        /// What was being fetched when the failure occurred
        context: String,
        /// The underlying fetch error
        #[source]
        source: FetchError,
    },

    /// Wait parameters could not be parsed
    #[error("invalid wait parameters: {0}")]
    InvalidParams(String),
}

impl Error {
    /// Create a timeout error naming the elapsed deadline
    pub fn timeout(description: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            description: description.into(),
            timeout,
        }
    }

    /// Create a cancellation error carrying the given reason
    pub fn cancelled(reason: impl Into<String>) -> Self {
        Self::Cancelled {
            reason: reason.into(),
        }
    }

    /// Create a not-found error for the given kind of object
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Wrap a fetch failure with context
    pub fn fetch(context: impl Into<String>, source: FetchError) -> Self {
        Self::Fetch {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid-parameters error
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    /// True if the deadline elapsed
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// True if the wait was cancelled by the caller
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// True if the awaited object unexpectedly disappeared
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
