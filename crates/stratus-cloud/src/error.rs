//! Factory and catalog error types

use std::fmt;

use stratus_core::{Provider, ResourceKind};
use thiserror::Error;

/// One rejected field value, with the set the catalog would have accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub value: String,
    pub allowed: Vec<String>,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}='{}' (allowed: {})",
            self.field,
            self.value,
            self.allowed.join(", ")
        )
    }
}

#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Missing required fields for {provider} {kind}: {}", .fields.join(", "))]
    MissingFields {
        provider: Provider,
        kind: ResourceKind,
        fields: Vec<String>,
    },

    /// Every offending field is reported, not just the first one found.
    #[error("Invalid field values for {provider} {kind}: {}", .violations.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("; "))]
    InvalidFieldValues {
        provider: Provider,
        kind: ResourceKind,
        violations: Vec<FieldViolation>,
    },

    #[error("Region '{region}' is not supported by {provider} (supported: {})", .allowed.join(", "))]
    InvalidRegion {
        provider: Provider,
        region: String,
        allowed: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, CloudError>;
