//! Provider and resource kind identifiers
//!
//! Both enums are closed sets used as lookup keys everywhere; adding a
//! provider means adding a variant here and a factory for it in the cloud
//! crate.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported infrastructure providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
    Oracle,
    Onprem,
}

impl Provider {
    /// Every provider, in display order
    pub const ALL: [Provider; 5] = [
        Provider::Aws,
        Provider::Azure,
        Provider::Gcp,
        Provider::Oracle,
        Provider::Onprem,
    ];

    /// Short code, also used as the resource id prefix (`aws-...`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::Gcp => "gcp",
            Provider::Oracle => "oracle",
            Provider::Onprem => "onprem",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aws" => Ok(Provider::Aws),
            "azure" => Ok(Provider::Azure),
            "gcp" => Ok(Provider::Gcp),
            "oracle" => Ok(Provider::Oracle),
            "onprem" | "onpremise" | "on-premise" => Ok(Provider::Onprem),
            other => Err(CoreError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Kinds of resources a provider family can construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    VirtualMachine,
    Database,
    LoadBalancer,
    Storage,
}

impl ResourceKind {
    /// Every kind, in display order
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::VirtualMachine,
        ResourceKind::Database,
        ResourceKind::LoadBalancer,
        ResourceKind::Storage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::VirtualMachine => "virtual_machine",
            ResourceKind::Database => "database",
            ResourceKind::LoadBalancer => "load_balancer",
            ResourceKind::Storage => "storage",
        }
    }

    /// Abbreviated label used when deriving resource names
    pub fn short(&self) -> &'static str {
        match self {
            ResourceKind::VirtualMachine => "vm",
            ResourceKind::Database => "db",
            ResourceKind::LoadBalancer => "lb",
            ResourceKind::Storage => "storage",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "virtual_machine" | "vm" => Ok(ResourceKind::VirtualMachine),
            "database" | "db" => Ok(ResourceKind::Database),
            "load_balancer" | "lb" => Ok(ResourceKind::LoadBalancer),
            "storage" => Ok(ResourceKind::Storage),
            other => Err(CoreError::UnsupportedResourceKind(other.to_string())),
        }
    }
}
