//! Stratus Controlplane - infrastructure aggregates and their lifecycle
//!
//! The control plane owns everything above the per-provider factories:
//! infrastructure records grouping the resources created together, the
//! repository that mutates them atomically, the audited service front
//! door, and JSON snapshots of the whole store.
//!
//! The service is the only intended entry point for mutations. It builds
//! resources through `stratus-cloud`, applies lifecycle transitions from
//! `stratus-core` inside the repository's write lock, and writes one
//! `stratus-audit` entry per attempt.

pub mod error;
pub mod record;
pub mod repository;
pub mod service;
pub mod snapshot;

pub use error::{ControlError, Result};
pub use record::{InfraStatus, InfrastructureRecord, SpecChanges};
pub use repository::{InMemoryRepository, InfrastructureRepository};
pub use service::{CreateRequest, InfrastructureService, actions};
pub use snapshot::SnapshotStore;
