//! Waiting on arbitrary remote resources
//!
//! [`wait_for_resource`] fetches a resource on every poll attempt and
//! applies a caller predicate. Without a predicate it confirms deletion
//! instead: a 404 is success.
//!
//! Fetch outcomes map onto the loop as follows:
//! - client-side timeout: try again next tick
//! - 404 without a predicate: done, the resource is gone
//! - 404 with a predicate: fail, the resource vanished while expected
//! - any other error: fail
//! - resource returned: done if the predicate holds, otherwise try again

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::trace;

use crate::poller::{poll, CheckOutcome, WaitSpec};
use crate::remote::FetchError;
use crate::Error;

/// Caller-supplied test over a fetched snapshot
///
/// Must not panic on partially populated resources, e.g. right after
/// creation.
pub type Predicate<'a, T> = dyn Fn(&T) -> bool + Send + Sync + 'a;

/// Failure of a wait, with the last snapshot observed before it
///
/// Displays and chains like the inner [`Error`]; use `?` to convert.
#[derive(Debug)]
pub struct WaitError<T> {
    error: Error,
    last_observed: Option<T>,
}

impl<T> WaitError<T> {
    /// Wrap an error with the last observed snapshot
    pub fn new(error: Error, last_observed: Option<T>) -> Self {
        Self {
            error,
            last_observed,
        }
    }

    /// The terminal error
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// The most recent snapshot fetched before the failure
    pub fn last_observed(&self) -> Option<&T> {
        self.last_observed.as_ref()
    }

    /// Split into the error and the last snapshot
    pub fn into_parts(self) -> (Error, Option<T>) {
        (self.error, self.last_observed)
    }

    /// Discard the snapshot
    pub fn into_error(self) -> Error {
        self.error
    }
}

impl<T> fmt::Display for WaitError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<T: fmt::Debug> std::error::Error for WaitError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}

impl<T> From<WaitError<T>> for Error {
    fn from(err: WaitError<T>) -> Self {
        err.error
    }
}

/// Wait until `predicate` holds for the fetched resource, or, with no
/// predicate, until the resource is gone.
///
/// # Returns
/// * `Ok(Some(resource))` - the snapshot that satisfied the predicate
/// * `Ok(None)` - deletion confirmed (predicate was `None`)
/// * `Err(WaitError)` - terminal failure, timeout, or cancellation, with the
///   last snapshot fetched
pub async fn wait_for_resource<T, F, Fut>(
    spec: &WaitSpec,
    mut fetch: F,
    predicate: Option<&Predicate<'_, T>>,
) -> Result<Option<T>, WaitError<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let spec = spec.labelled_or(if predicate.is_some() {
        "resource"
    } else {
        "resource deletion"
    });
    let last_observed: Mutex<Option<T>> = Mutex::new(None);
    let gone = AtomicBool::new(false);

    let result = {
        let last_observed = &last_observed;
        let gone = &gone;
        poll(&spec, || {
            let attempt = fetch();
            let label = spec.label().unwrap_or("resource");
            async move {
                match attempt.await {
                    Err(e) if e.is_timeout() => {
                        trace!(label = %label, error = %e, "Fetch timed out, retrying");
                        CheckOutcome::Continue
                    }
                    Err(e) if e.is_not_found() => match predicate {
                        None => {
                            gone.store(true, Ordering::SeqCst);
                            CheckOutcome::Done
                        }
                        Some(_) => CheckOutcome::Failed(Error::not_found("resource")),
                    },
                    Err(e) => CheckOutcome::Failed(Error::fetch(label, e)),
                    Ok(resource) => {
                        let matched = predicate.is_some_and(|p| p(&resource));
                        *last_observed.lock() = Some(resource);
                        if matched {
                            CheckOutcome::Done
                        } else {
                            CheckOutcome::Continue
                        }
                    }
                }
            }
        })
        .await
    };

    let last_observed = last_observed.into_inner();
    match result {
        Ok(()) if gone.into_inner() => Ok(None),
        Ok(()) => Ok(last_observed),
        Err(e) => Err(WaitError::new(e, last_observed)),
    }
}

/// Wait until `predicate` holds, returning the matching snapshot.
pub async fn wait_until<T, F, Fut, P>(
    spec: &WaitSpec,
    fetch: F,
    predicate: P,
) -> Result<T, WaitError<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
    P: Fn(&T) -> bool + Send + Sync,
{
    let predicate: &Predicate<'_, T> = &predicate;
    match wait_for_resource(spec, fetch, Some(predicate)).await? {
        Some(resource) => Ok(resource),
        None => Err(WaitError::new(Error::not_found("resource"), None)),
    }
}

/// Wait until the fetch reports 404.
pub async fn wait_for_deletion<T, F, Fut>(spec: &WaitSpec, fetch: F) -> Result<(), WaitError<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    wait_for_resource(spec, fetch, None).await.map(|_| ())
}
