//! The error side of the fetch contract
//!
//! Fetch closures are supplied by callers and wrap whatever remote client
//! they use. They report failures as [`FetchError`] so the waiters can tell
//! transient client timeouts and 404s apart from everything else.

use std::fmt;

use thiserror::Error;

/// HTTP status code the remote uses for a missing object
pub const STATUS_NOT_FOUND: u16 = 404;

/// Status metadata returned alongside a remote response
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemoteStatus {
    /// HTTP-like status code
    pub code: u16,
}

impl RemoteStatus {
    /// Create status metadata for the given code
    pub fn new(code: u16) -> Self {
        Self { code }
    }

    /// Status for a missing object
    pub fn not_found() -> Self {
        Self::new(STATUS_NOT_FOUND)
    }

    /// True if the remote reported the object as missing
    pub fn is_not_found(&self) -> bool {
        self.code == STATUS_NOT_FOUND
    }
}

impl fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Failure reported by a fetch closure
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The remote call itself timed out on the client side
    #[error("request timed out: {message}")]
    Timeout {
        /// Description from the client
        message: String,
    },

    /// The remote answered with an error status
    #[error("remote returned status {status}: {message}")]
    Status {
        /// Status metadata of the response
        status: RemoteStatus,
        /// Error body or description
        message: String,
    },

    /// Any other failure (connection refused, decode error, ...)
    #[error("{message}")]
    Transport {
        /// Description of what failed
        message: String,
    },
}

impl FetchError {
    /// Create a client-side timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout {
            message: msg.into(),
        }
    }

    /// Create an error for a response with the given status
    pub fn status(status: RemoteStatus, msg: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: msg.into(),
        }
    }

    /// Shorthand for a 404 response
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::status(RemoteStatus::not_found(), msg)
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
        }
    }

    /// Status metadata, if the remote answered at all
    pub fn remote_status(&self) -> Option<RemoteStatus> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Timeout { .. } | Self::Transport { .. } => None,
        }
    }

    /// True for the transient client-timeout class
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// True if the remote reported 404
    pub fn is_not_found(&self) -> bool {
        self.remote_status()
            .is_some_and(|status| status.is_not_found())
    }
}
