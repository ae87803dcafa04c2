//! Stratus core domain model
//!
//! Shared building blocks for every Stratus crate: the provider and resource
//! kind identifiers, the `CloudResource` record that all providers and kinds
//! share, and the lifecycle state machine that governs which status
//! transitions are legal.
//!
//! Nothing in this crate performs I/O; provisioning here is pure construction
//! and the state machine is a synchronous, caller-driven transition table.

pub mod error;
pub mod lifecycle;
pub mod model;

// Re-exports
pub use error::{CoreError, Result};
pub use lifecycle::{LifecycleAction, transition};
pub use model::{CloudResource, Provider, ResourceKind, ResourceStatus};
