//! Resource lifecycle state machine
//!
//! `creating → stopped ⇄ running`, with `deleting` at the end of the line and
//! `error` reachable from anywhere on a provider-side failure. Every
//! transition is caller-driven and synchronous; there are no timers or
//! background transitions.

use crate::error::{CoreError, Result};
use crate::model::ResourceStatus;
use serde::{Deserialize, Serialize};

/// Caller-driven lifecycle actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    /// Provider-side setup finished; the resource is ready to be started
    Provision,
    /// Power a stopped resource on
    Start,
    /// Power a running resource off
    Stop,
    /// Transient restart, no observable downtime at this abstraction
    Restart,
    /// Change the size class in place; status is preserved
    Resize,
    /// Begin tearing the resource down
    Delete,
    /// Record a provider-side operation failure
    Fail,
}

impl LifecycleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleAction::Provision => "provision",
            LifecycleAction::Start => "start",
            LifecycleAction::Stop => "stop",
            LifecycleAction::Restart => "restart",
            LifecycleAction::Resize => "resize",
            LifecycleAction::Delete => "delete",
            LifecycleAction::Fail => "fail",
        }
    }
}

impl std::fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apply `action` to `status` and return the next status.
///
/// Illegal pairs fail with `InvalidTransition`; the caller's stored status is
/// untouched on failure. `start` from `running` is deliberately an error
/// rather than a no-op so caller bugs surface.
pub fn transition(status: ResourceStatus, action: LifecycleAction) -> Result<ResourceStatus> {
    use LifecycleAction::*;
    use ResourceStatus::*;

    match (status, action) {
        (Creating, Provision) => Ok(Stopped),
        (Stopped, Start) => Ok(Running),
        (Running, Stop) => Ok(Stopped),
        (Running, Restart) => Ok(Running),
        (Deleting, Resize) => Err(CoreError::InvalidTransition {
            from: Deleting,
            action: Resize,
        }),
        // A resize never changes status; only teardown refuses it.
        (status, Resize) => Ok(status),
        (Running, Delete) | (Stopped, Delete) => Ok(Deleting),
        (_, Fail) => Ok(Error),
        (from, action) => Err(CoreError::InvalidTransition { from, action }),
    }
}
