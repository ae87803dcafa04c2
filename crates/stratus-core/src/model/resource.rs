//! Cloud resource record
//!
//! One record shape is shared by every provider and kind; provider-specific
//! fields live in the validated `spec` payload rather than in per-provider
//! structs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{Provider, ResourceKind};

/// Lifecycle status of a provisioned resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    /// Resource is being created
    Creating,
    /// Resource is running
    Running,
    /// Resource is stopped
    Stopped,
    /// Resource is being torn down
    Deleting,
    /// Resource is in error state
    Error,
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceStatus::Creating => write!(f, "creating"),
            ResourceStatus::Running => write!(f, "running"),
            ResourceStatus::Stopped => write!(f, "stopped"),
            ResourceStatus::Deleting => write!(f, "deleting"),
            ResourceStatus::Error => write!(f, "error"),
        }
    }
}

/// A provisioned resource
///
/// Constructed by a provider factory with `status = Creating`; the id is
/// immutable afterwards and exclusively owned by the infrastructure record
/// that created it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudResource {
    /// Provider-prefixed identifier (`aws-...`, `oracle-...`)
    pub resource_id: String,

    /// Human-readable name
    pub name: String,

    /// Owning provider
    pub provider: Provider,

    /// Resource kind
    pub kind: ResourceKind,

    /// Region (free-form for onprem, catalog-checked for cloud providers)
    pub region: String,

    /// Current lifecycle status
    pub status: ResourceStatus,

    /// Validated, defaulted provider-specific fields
    pub spec: HashMap<String, serde_json::Value>,

    /// Free-form labels
    #[serde(default)]
    pub tags: HashMap<String, String>,

    /// When the resource was constructed
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl CloudResource {
    pub fn new(
        resource_id: impl Into<String>,
        name: impl Into<String>,
        provider: Provider,
        kind: ResourceKind,
        region: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            resource_id: resource_id.into(),
            name: name.into(),
            provider,
            kind,
            region: region.into(),
            status: ResourceStatus::Creating,
            spec: HashMap::new(),
            tags: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_spec(mut self, spec: HashMap<String, serde_json::Value>) -> Self {
        self.spec = spec;
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Overwrite one spec field and stamp `updated_at`
    pub fn set_spec_field(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.spec.insert(key.into(), value);
        self.updated_at = Utc::now();
    }

    /// Read a spec field as a concrete type
    pub fn spec_field<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.spec
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn set_status(&mut self, status: ResourceStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
