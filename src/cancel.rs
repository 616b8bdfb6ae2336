//! Cooperative cancellation with a reason
//!
//! Wraps a [`CancellationToken`] so that whoever cancels can say why, and
//! the waiter can hand that reason back to its caller unchanged.

use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

use crate::Error;

/// Reason reported when cancellation fires without an explicit one
pub const DEFAULT_CANCEL_REASON: &str = "wait cancelled";

/// Cloneable cancellation handle shared between a waiter and its canceller
///
/// Clones observe the same token. The first reason recorded wins.
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    token: CancellationToken,
    reason: Arc<OnceLock<String>>,
}

impl Cancellation {
    /// Create a handle that has not been cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel with the default reason
    pub fn cancel(&self) {
        self.cancel_with(DEFAULT_CANCEL_REASON);
    }

    /// Cancel with the given reason
    pub fn cancel_with(&self, reason: impl Into<String>) {
        // Ignored when a reason was already recorded.
        let _ = self.reason.set(reason.into());
        self.token.cancel();
    }

    /// True once cancellation has fired
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes when cancellation fires
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// The recorded reason, if cancelled
    pub fn reason(&self) -> Option<String> {
        if !self.is_cancelled() {
            return None;
        }
        Some(
            self.reason
                .get()
                .cloned()
                .unwrap_or_else(|| DEFAULT_CANCEL_REASON.to_string()),
        )
    }

    /// The error a waiter returns after observing cancellation
    pub fn error(&self) -> Error {
        Error::cancelled(
            self.reason()
                .unwrap_or_else(|| DEFAULT_CANCEL_REASON.to_string()),
        )
    }

    /// The underlying token, for use with other tokio-util consumers
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// Adopt an existing token, e.g. a server's shutdown token
impl From<CancellationToken> for Cancellation {
    fn from(token: CancellationToken) -> Self {
        Self {
            token,
            reason: Arc::default(),
        }
    }
}
