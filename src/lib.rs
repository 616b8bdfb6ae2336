//! cloudwait - bounded, cancellable waiting on eventually-consistent remote state
//!
//! Remote APIs acknowledge requests long before the work is done: a droplet
//! is "new" for a while before it is "active", an action is "in-progress"
//! before it is "completed", a deleted volume lingers before it 404s. This
//! crate turns those transitions into single awaitable calls with a hard
//! deadline.
//!
//! # Modules
//!
//! - [`poller`] - The core polling loop and [`WaitSpec`]
//! - [`resource`] - Waiting for a predicate on any resource, or for its deletion
//! - [`action`] - Waiting for remote actions to complete, singly or in batches
//! - [`cancel`] - Cancellation handles carrying a reason
//! - [`remote`] - The error side of the fetch contract
//! - [`config`] - Wait parameters as deserialized from tool arguments
//! - [`telemetry`] - Logging setup for host processes
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```ignore
//! use cloudwait::{wait_until, WaitSpec};
//!
//! let droplet = wait_until(
//!     &WaitSpec::default().with_label(format!("droplet {}", id)),
//!     || client.get_droplet(id),
//!     |d| d.status == "active",
//! )
//! .await?;
//! ```

#![deny(missing_docs)]

use std::time::Duration;

pub mod action;
pub mod cancel;
pub mod config;
pub mod error;
pub mod poller;
pub mod remote;
pub mod resource;
pub mod telemetry;

pub use action::{
    wait_for_action, wait_for_action_id, wait_for_actions, Action, ActionId, ActionSource,
    ActionStatus,
};
pub use cancel::Cancellation;
pub use config::WaitParams;
pub use error::Error;
pub use poller::{poll, CheckOutcome, WaitSpec};
pub use remote::{FetchError, RemoteStatus};
pub use resource::{wait_for_deletion, wait_for_resource, wait_until, WaitError};

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Default Wait Parameters
// =============================================================================
// Substituted whenever a caller leaves interval or timeout unset. Not
// configurable at call time.

/// Default delay between poll attempts
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default overall deadline for a wait (5 minutes)
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(300);
