//! Core error types

use crate::lifecycle::LifecycleAction;
use crate::model::ResourceStatus;
use thiserror::Error;

/// Errors raised by the core domain model
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Unsupported resource kind: {0}")]
    UnsupportedResourceKind(String),

    #[error("Invalid transition: cannot {action} while {from}")]
    InvalidTransition {
        from: ResourceStatus,
        action: LifecycleAction,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
