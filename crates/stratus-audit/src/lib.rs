//! Stratus Audit Log
//!
//! Append-only audit trail for provisioning operations, persisted as
//! JSON Lines (one entry per line, UTF-8). Every mutating operation in
//! the control plane records exactly one entry, success or failure, and
//! the query side offers filtered pagination, a recent shortcut and
//! whole-log statistics.

pub mod entry;
pub mod error;
pub mod service;

// Re-exports
pub use entry::{AuditFilter, AuditLogEntry, AuditStats, LogPage};
pub use error::{AuditError, Result};
pub use service::AuditLogService;
