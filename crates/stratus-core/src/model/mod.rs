//! Data model definitions
//!
//! The model is split by concern: provider/kind identifiers in one module,
//! the resource record and its status in another.

mod provider;
mod resource;

// Re-exports
pub use provider::*;
pub use resource::*;
