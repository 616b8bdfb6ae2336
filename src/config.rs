//! Wait parameters as they arrive from a tool-argument layer
//!
//! Callers expose only two knobs, both in whole seconds and both optional.
//! Absent or zero means the crate default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cancel::Cancellation;
use crate::poller::WaitSpec;
use crate::Error;

/// User-facing wait parameters
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaitParams {
    /// Seconds between poll attempts (0 or absent = default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,
    /// Overall deadline in seconds (0 or absent = default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl WaitParams {
    /// Parse parameters from a JSON argument object.
    ///
    /// `null` yields the defaults.
    pub fn from_arguments(arguments: &serde_json::Value) -> Result<Self, Error> {
        if arguments.is_null() {
            return Ok(Self::default());
        }
        Self::deserialize(arguments).map_err(|e| Error::invalid_params(e.to_string()))
    }

    /// Build a spec observing the given cancellation
    pub fn into_spec(self, cancellation: Cancellation) -> WaitSpec {
        WaitSpec::new(
            Duration::from_secs(self.interval_secs.unwrap_or(0)),
            Duration::from_secs(self.timeout_secs.unwrap_or(0)),
        )
        .with_cancellation(cancellation)
    }
}
