//! Control plane error types

use stratus_core::{Provider, ResourceKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("Infrastructure not found: {0}")]
    NotFound(String),

    #[error("Infrastructure {id} has no {kind} resource")]
    ResourceNotFound { id: String, kind: ResourceKind },

    #[error("At least one resource (virtual_machine, database, load_balancer, storage) must be requested")]
    NoResourcesRequested,

    #[error("{provider} {kind} has no size class to resize")]
    ResizeUnsupported {
        provider: Provider,
        kind: ResourceKind,
    },

    #[error(transparent)]
    Cloud(#[from] stratus_cloud::CloudError),

    #[error(transparent)]
    Lifecycle(#[from] stratus_core::CoreError),

    #[error(transparent)]
    Audit(#[from] stratus_audit::AuditError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

pub type Result<T> = std::result::Result<T, ControlError>;
