//! The factory trait and its shared construction path

use std::collections::HashMap;

use serde_json::Value;
use stratus_core::{CloudResource, Provider, ResourceKind};
use uuid::Uuid;

use crate::catalog::ProviderCatalog;
use crate::error::{CloudError, Result};

/// Static metadata describing one provider.
pub struct ProviderProfile {
    pub provider: Provider,
    /// Vendor display name, e.g. "Amazon Web Services (AWS)".
    pub display_name: &'static str,
    /// Region assumed when a spec omits one. For on-premise this is a
    /// datacenter label rather than a vendor region.
    pub default_region: &'static str,
    /// Closed region set. Empty means any region string is accepted.
    pub regions: &'static [&'static str],
    /// Vendor service name per resource kind.
    pub services: &'static [(ResourceKind, &'static str)],
    /// Size classes (or equivalent capability lists) grouped by use case.
    pub recommended_sizes: &'static [(&'static str, &'static [&'static str])],
}

impl ProviderProfile {
    pub fn service_name(&self, kind: ResourceKind) -> Option<&'static str> {
        self.services
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, name)| *name)
    }
}

/// One family of resource constructors.
///
/// Callers hold `Arc<dyn CloudFactory>` and never branch on the concrete
/// provider; the per-kind methods all funnel through the same table-driven
/// construction path, so implementors only supply their [`ProviderProfile`].
pub trait CloudFactory: Send + Sync + std::fmt::Debug {
    fn profile(&self) -> &'static ProviderProfile;

    fn provider(&self) -> Provider {
        self.profile().provider
    }

    fn provider_name(&self) -> &'static str {
        self.profile().display_name
    }

    fn supported_regions(&self) -> &'static [&'static str] {
        self.profile().regions
    }

    fn validate_region(&self, region: &str) -> bool {
        ProviderCatalog::validate_region(self.provider(), region)
    }

    fn create_virtual_machine(
        &self,
        name: &str,
        spec: &HashMap<String, Value>,
    ) -> Result<CloudResource> {
        build_resource(self.provider(), ResourceKind::VirtualMachine, name, spec)
    }

    fn create_database(&self, name: &str, spec: &HashMap<String, Value>) -> Result<CloudResource> {
        build_resource(self.provider(), ResourceKind::Database, name, spec)
    }

    fn create_load_balancer(
        &self,
        name: &str,
        spec: &HashMap<String, Value>,
    ) -> Result<CloudResource> {
        build_resource(self.provider(), ResourceKind::LoadBalancer, name, spec)
    }

    fn create_storage(&self, name: &str, spec: &HashMap<String, Value>) -> Result<CloudResource> {
        build_resource(self.provider(), ResourceKind::Storage, name, spec)
    }

    /// Kind-dispatching convenience over the four constructors.
    fn create_resource(
        &self,
        kind: ResourceKind,
        name: &str,
        spec: &HashMap<String, Value>,
    ) -> Result<CloudResource> {
        match kind {
            ResourceKind::VirtualMachine => self.create_virtual_machine(name, spec),
            ResourceKind::Database => self.create_database(name, spec),
            ResourceKind::LoadBalancer => self.create_load_balancer(name, spec),
            ResourceKind::Storage => self.create_storage(name, spec),
        }
    }
}

/// Globally unique id with a provider prefix, e.g. `aws-0b5e...`.
pub(crate) fn new_resource_id(provider: Provider) -> String {
    format!("{}-{}", provider.as_str(), Uuid::new_v4().simple())
}

/// Single construction path behind every factory method: default and
/// validate the spec, check the region when one is given, mint an id and
/// return the resource in `creating` status.
pub(crate) fn build_resource(
    provider: Provider,
    kind: ResourceKind,
    name: &str,
    spec: &HashMap<String, Value>,
) -> Result<CloudResource> {
    let spec = ProviderCatalog::validate_and_default(provider, kind, spec)?;

    let region = match spec.get("region").and_then(Value::as_str) {
        Some(region) => {
            if !ProviderCatalog::validate_region(provider, region) {
                return Err(CloudError::InvalidRegion {
                    provider,
                    region: region.to_string(),
                    allowed: ProviderCatalog::supported_regions(provider)
                        .iter()
                        .map(|s| (*s).to_string())
                        .collect(),
                });
            }
            region.to_string()
        }
        None => ProviderCatalog::default_region(provider).to_string(),
    };

    let resource =
        CloudResource::new(new_resource_id(provider), name, provider, kind, region).with_spec(spec);

    tracing::debug!(
        "{} factory built {} '{}' ({})",
        provider,
        kind,
        resource.name,
        resource.resource_id
    );

    Ok(resource)
}
