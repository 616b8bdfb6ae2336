//! Core polling loop
//!
//! [`poll`] drives a caller-supplied check on a fixed interval until it
//! reports completion or failure, the deadline expires, or the caller
//! cancels. Every specialization in this crate is a check function handed
//! to this loop.
//!
//! # Example
//!
//! ```ignore
//! use cloudwait::poller::{poll, CheckOutcome, WaitSpec};
//!
//! let spec = WaitSpec::default().with_label("load balancer ip");
//! poll(&spec, || async {
//!     match lb_client.ip().await {
//!         Some(_) => CheckOutcome::Done,
//!         None => CheckOutcome::Continue,
//!     }
//! })
//! .await?;
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

use crate::cancel::Cancellation;
use crate::{Error, DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT};

/// Label used in logs and timeout messages when the spec carries none
const DEFAULT_LABEL: &str = "condition";

/// Stand-in deadline for timeouts too large to add to the current instant
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// Result of a single poll attempt
#[derive(Debug)]
pub enum CheckOutcome {
    /// Not there yet, try again on the next tick
    Continue,
    /// The awaited condition holds
    Done,
    /// Terminal failure, stop without retrying
    Failed(Error),
}

/// Configuration for one wait call
///
/// Interval and timeout are optional; `None` resolves to
/// [`DEFAULT_POLL_INTERVAL`] and [`DEFAULT_WAIT_TIMEOUT`]. Builders taking a
/// raw [`Duration`] treat `Duration::ZERO` as "use the default".
#[derive(Clone, Debug, Default)]
pub struct WaitSpec {
    interval: Option<Duration>,
    timeout: Option<Duration>,
    cancellation: Cancellation,
    label: Option<String>,
}

impl WaitSpec {
    /// Create a spec from raw durations (zero = default)
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self::default().with_interval(interval).with_timeout(timeout)
    }

    /// Set the delay between poll attempts (zero = default)
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = non_zero(interval);
        self
    }

    /// Set the overall deadline (zero = default)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = non_zero(timeout);
        self
    }

    /// Attach a cancellation handle
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Name the awaited thing for logs and timeout messages
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Resolved delay between poll attempts
    pub fn interval(&self) -> Duration {
        self.interval.unwrap_or(DEFAULT_POLL_INTERVAL)
    }

    /// Resolved overall deadline
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_WAIT_TIMEOUT)
    }

    /// The cancellation handle observed by the loop
    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    /// The label, if one was set
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Copy of this spec labelled `label` unless it already has one
    pub(crate) fn labelled_or(&self, label: impl Into<String>) -> Self {
        let mut spec = self.clone();
        if spec.label.is_none() {
            spec.label = Some(label.into());
        }
        spec
    }
}

fn non_zero(duration: Duration) -> Option<Duration> {
    (!duration.is_zero()).then_some(duration)
}

/// Poll `check` until it completes, fails, times out, or is cancelled.
///
/// The first check runs immediately. After each `Continue` the loop
/// suspends until the next interval tick, the deadline, or cancellation,
/// whichever comes first; cancellation wins ties, then the deadline, so no
/// further check runs once either has been observed. The deadline is
/// measured from the start of the call.
///
/// # Returns
/// * `Ok(())` - `check` returned `Done`
/// * `Err(e)` - `check` returned `Failed(e)`, or [`Error::Timeout`], or
///   [`Error::Cancelled`] with the canceller's reason
pub async fn poll<F, Fut>(spec: &WaitSpec, mut check: F) -> Result<(), Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CheckOutcome>,
{
    let interval = spec.interval();
    let timeout = spec.timeout();
    let label = spec.label().unwrap_or(DEFAULT_LABEL);
    let cancellation = spec.cancellation();

    let start = Instant::now();
    let deadline = start
        .checked_add(timeout)
        .unwrap_or_else(|| start + FAR_FUTURE);
    let expiry = time::sleep_until(deadline);
    tokio::pin!(expiry);

    let first_tick = start.checked_add(interval).unwrap_or(deadline);
    let mut ticker = time::interval_at(first_tick, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut attempt = 0u32;

    loop {
        attempt += 1;

        match check().await {
            CheckOutcome::Done => {
                debug!(
                    label = %label,
                    attempt = attempt,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Wait condition met"
                );
                return Ok(());
            }
            CheckOutcome::Failed(e) => {
                debug!(
                    label = %label,
                    attempt = attempt,
                    error = %e,
                    "Wait failed"
                );
                return Err(e);
            }
            CheckOutcome::Continue => {
                trace!(label = %label, attempt = attempt, "Wait condition not met yet");
            }
        }

        tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                let err = cancellation.error();
                debug!(label = %label, attempt = attempt, reason = %err, "Wait cancelled");
                return Err(err);
            }
            _ = &mut expiry => {
                warn!(
                    label = %label,
                    attempt = attempt,
                    timeout_ms = timeout.as_millis() as u64,
                    "Wait deadline exceeded"
                );
                return Err(Error::timeout(label, timeout));
            }
            _ = ticker.tick() => {}
        }
    }
}
