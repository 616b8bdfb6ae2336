//! Waiting on asynchronous remote actions
//!
//! An action is a long-running remote operation (power on, resize,
//! snapshot, ...) whose status moves from some pending value to either
//! `completed` or `errored`. The remote owns it; we only read snapshots.
//!
//! Unlike resources, actions never disappear benignly, so a 404 is always
//! a failure here.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::poller::{poll, CheckOutcome, WaitSpec};
use crate::remote::FetchError;
use crate::resource::WaitError;
use crate::Error;

/// Identifier of a remote action
pub type ActionId = u64;

/// Wire value of the completed terminal status
pub const STATUS_COMPLETED: &str = "completed";
/// Wire value of the errored terminal status
pub const STATUS_ERRORED: &str = "errored";

/// Lifecycle state of an action
///
/// Serialized as the remote's plain status string. Anything other than
/// the two terminal values is pending, and its raw value is kept.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionStatus {
    /// Finished successfully
    Completed,
    /// Finished with an error
    Errored,
    /// Still running ("in-progress", "new", ...)
    Pending(String),
}

impl ActionStatus {
    /// True for `Completed` and `Errored`
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending(_))
    }

    /// The wire representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Completed => STATUS_COMPLETED,
            Self::Errored => STATUS_ERRORED,
            Self::Pending(raw) => raw,
        }
    }
}

impl From<String> for ActionStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            STATUS_COMPLETED => Self::Completed,
            STATUS_ERRORED => Self::Errored,
            _ => Self::Pending(raw),
        }
    }
}

impl From<&str> for ActionStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<ActionStatus> for String {
    fn from(status: ActionStatus) -> Self {
        match status {
            ActionStatus::Pending(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a remote action
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Action identifier
    pub id: ActionId,
    /// Current status
    pub status: ActionStatus,
    /// Operation type, e.g. "power_on"
    #[serde(rename = "type", default)]
    pub kind: String,
    /// ID of the resource the action operates on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<u64>,
    /// Type of that resource, e.g. "droplet"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

/// Remote lookup of actions by ID
///
/// This trait abstracts the API client for testability.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ActionSource: Send + Sync {
    /// Fetch the current snapshot of an action
    async fn get_action(&self, id: ActionId) -> Result<Action, FetchError>;
}

/// Wait until the fetched action completes.
///
/// `completed` ends the wait successfully, `errored` and 404 end it with an
/// error, any other status keeps polling. Client-side fetch timeouts are
/// retried like a pending status.
pub async fn wait_for_action<F, Fut>(
    spec: &WaitSpec,
    mut fetch: F,
) -> Result<Action, WaitError<Action>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Action, FetchError>>,
{
    let spec = spec.labelled_or("action");
    let last_observed: Mutex<Option<Action>> = Mutex::new(None);

    let result = {
        let last_observed = &last_observed;
        poll(&spec, || {
            let attempt = fetch();
            let label = spec.label().unwrap_or("action");
            async move {
                match attempt.await {
                    Err(e) if e.is_timeout() => {
                        trace!(label = %label, error = %e, "Fetch timed out, retrying");
                        CheckOutcome::Continue
                    }
                    Err(e) if e.is_not_found() => CheckOutcome::Failed(Error::not_found("action")),
                    Err(e) => CheckOutcome::Failed(Error::fetch(label, e)),
                    Ok(action) => {
                        let outcome = match &action.status {
                            ActionStatus::Completed => CheckOutcome::Done,
                            ActionStatus::Errored => {
                                CheckOutcome::Failed(Error::ActionErrored { id: action.id })
                            }
                            ActionStatus::Pending(status) => {
                                trace!(action_id = action.id, status = %status, "Action still pending");
                                CheckOutcome::Continue
                            }
                        };
                        *last_observed.lock() = Some(action);
                        outcome
                    }
                }
            }
        })
        .await
    };

    let last_observed = last_observed.into_inner();
    match (result, last_observed) {
        (Ok(()), Some(action)) => Ok(action),
        // Done is only reported after a snapshot was stored
        (Ok(()), None) => Err(WaitError::new(Error::not_found("action"), None)),
        (Err(e), last) => Err(WaitError::new(e, last)),
    }
}

/// Wait for the action with the given ID, fetched through `source`.
pub async fn wait_for_action_id<S>(
    spec: &WaitSpec,
    source: &S,
    id: ActionId,
) -> Result<Action, WaitError<Action>>
where
    S: ActionSource + ?Sized,
{
    let spec = spec.labelled_or(format!("action {}", id));
    wait_for_action(&spec, || source.get_action(id)).await
}

/// Wait for each action in order, stopping at the first failure.
///
/// Each action gets the full timeout of `spec`. On failure no partial
/// results are returned; the error names the action that failed.
///
/// # Returns
/// One completed [`Action`] per ID, in input order
pub async fn wait_for_actions<S>(
    spec: &WaitSpec,
    source: &S,
    ids: &[ActionId],
) -> Result<Vec<Action>, Error>
where
    S: ActionSource + ?Sized,
{
    let mut actions = Vec::with_capacity(ids.len());

    for (index, &id) in ids.iter().enumerate() {
        match wait_for_action_id(spec, source, id).await {
            Ok(action) => actions.push(action),
            Err(e) => {
                debug!(
                    action_id = id,
                    position = index,
                    remaining = ids.len() - index - 1,
                    error = %e,
                    "Action batch aborted"
                );
                return Err(e.into_error());
            }
        }
    }

    if !actions.is_empty() {
        info!(count = actions.len(), "All actions completed");
    }
    Ok(actions)
}
