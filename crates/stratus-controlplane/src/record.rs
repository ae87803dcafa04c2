//! Infrastructure aggregate records

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stratus_core::{CloudResource, Provider, ResourceKind};
use uuid::Uuid;

/// Aggregate status. Deleted records survive in the store so the audit
/// trail stays complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfraStatus {
    Active,
    Deleted,
}

impl fmt::Display for InfraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfraStatus::Active => write!(f, "active"),
            InfraStatus::Deleted => write!(f, "deleted"),
        }
    }
}

/// A named group of resources created together on one provider.
///
/// Records are only ever mutated through their repository; deletion flips
/// `status` instead of removing the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfrastructureRecord {
    pub id: String,
    pub name: String,
    pub provider: Provider,
    pub region: String,
    pub requested_by: String,
    pub status: InfraStatus,
    pub resources: HashMap<ResourceKind, CloudResource>,
    /// Which kinds are part of this aggregate. Removing a resource flips
    /// its flag back to false while its snapshot stays behind.
    pub includes: HashMap<ResourceKind, bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InfrastructureRecord {
    pub fn new(
        name: impl Into<String>,
        provider: Provider,
        region: impl Into<String>,
        requested_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: format!("infra-{}", Uuid::new_v4().simple()),
            name: name.into(),
            provider,
            region: region.into(),
            requested_by: requested_by.into(),
            status: InfraStatus::Active,
            resources: HashMap::new(),
            includes: ResourceKind::ALL.iter().map(|kind| (*kind, false)).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_resource(mut self, resource: CloudResource) -> Self {
        self.includes.insert(resource.kind, true);
        self.resources.insert(resource.kind, resource);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == InfraStatus::Active
    }

    pub fn resource(&self, kind: ResourceKind) -> Option<&CloudResource> {
        self.resources.get(&kind)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Changes to apply to an existing aggregate: per-kind spec fragments.
/// A fragment for a kind the aggregate already holds is shallow-merged
/// into that resource's spec; a fragment for an absent kind requests
/// construction of a new resource of that kind.
pub type SpecChanges = HashMap<ResourceKind, HashMap<String, Value>>;
