//! Audited infrastructure operations
//!
//! Ties the factory registry, the repository and the audit log together.
//! Every mutating operation writes exactly one audit entry, success or
//! failure, before its result reaches the caller. Reads are not audited.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use stratus_audit::{AuditLogEntry, AuditLogService};
use stratus_cloud::{CloudError, CloudFactory, FactoryRegistry, ProviderCatalog};
use stratus_core::{CloudResource, LifecycleAction, Provider, ResourceKind, transition};

use crate::error::{ControlError, Result};
use crate::record::{InfrastructureRecord, SpecChanges};
use crate::repository::InfrastructureRepository;

/// Audited action names, also used by surfaces for display and filter help.
pub mod actions {
    pub const CREATE_INFRASTRUCTURE: &str = "create_infrastructure";
    pub const UPDATE_INFRASTRUCTURE: &str = "update_infrastructure";
    pub const DELETE_INFRASTRUCTURE: &str = "delete_infrastructure";
    pub const START: &str = "start";
    pub const STOP: &str = "stop";
    pub const RESTART: &str = "restart";
    pub const RESIZE: &str = "resize";
    pub const REMOVE_RESOURCE: &str = "remove_resource";

    pub const ALL: [&str; 8] = [
        CREATE_INFRASTRUCTURE,
        UPDATE_INFRASTRUCTURE,
        DELETE_INFRASTRUCTURE,
        START,
        STOP,
        RESTART,
        RESIZE,
        REMOVE_RESOURCE,
    ];
}

// Failure entries for id-addressed operations cannot always name the
// provider; the audit schema still wants one.
const UNKNOWN_PROVIDER: &str = "unknown";

fn actor_name(requested_by: Option<&str>) -> String {
    match requested_by {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "system".to_string(),
    }
}

/// What to build: per-kind specs plus explicit include flags.
///
/// A kind is part of the request when its flag says so, or when it has a
/// spec and no flag says otherwise. A spec may carry a `name` entry to
/// name that resource; otherwise the name derives from the aggregate.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub provider: Provider,
    pub name: String,
    pub region: Option<String>,
    pub requested_by: Option<String>,
    pub specs: HashMap<ResourceKind, HashMap<String, Value>>,
    pub includes: HashMap<ResourceKind, bool>,
}

impl CreateRequest {
    pub fn new(provider: Provider, name: impl Into<String>) -> Self {
        Self {
            provider,
            name: name.into(),
            region: None,
            requested_by: None,
            specs: HashMap::new(),
            includes: HashMap::new(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_requested_by(mut self, requested_by: impl Into<String>) -> Self {
        self.requested_by = Some(requested_by.into());
        self
    }

    pub fn with_spec(mut self, kind: ResourceKind, spec: HashMap<String, Value>) -> Self {
        self.specs.insert(kind, spec);
        self
    }

    pub fn with_include(mut self, kind: ResourceKind, include: bool) -> Self {
        self.includes.insert(kind, include);
        self
    }

    fn included_kinds(&self) -> Vec<ResourceKind> {
        ResourceKind::ALL
            .iter()
            .copied()
            .filter(|kind| {
                self.includes
                    .get(kind)
                    .copied()
                    .unwrap_or_else(|| self.specs.contains_key(kind))
            })
            .collect()
    }

    fn actor(&self) -> String {
        actor_name(self.requested_by.as_deref())
    }
}

/// The control plane's front door.
pub struct InfrastructureService<R: InfrastructureRepository> {
    registry: Arc<FactoryRegistry>,
    repo: Arc<R>,
    audit: Arc<AuditLogService>,
}

impl<R: InfrastructureRepository> InfrastructureService<R> {
    pub fn new(registry: Arc<FactoryRegistry>, repo: Arc<R>, audit: Arc<AuditLogService>) -> Self {
        Self {
            registry,
            repo,
            audit,
        }
    }

    /// Build every requested resource, then persist the aggregate.
    /// All-or-nothing: any validation failure leaves nothing behind.
    pub async fn create_infrastructure(
        &self,
        request: CreateRequest,
    ) -> Result<InfrastructureRecord> {
        let actor = request.actor();
        let provider_code = request.provider.as_str();

        match self.try_create(&request).await {
            Ok(record) => {
                self.audit
                    .append(
                        &AuditLogEntry::new(
                            &actor,
                            actions::CREATE_INFRASTRUCTURE,
                            &record.id,
                            provider_code,
                            true,
                        )
                        .with_detail("name", record.name.clone())
                        .with_detail("resources_created", record.resources.len()),
                    )
                    .await?;
                Ok(record)
            }
            Err(err) => {
                self.audit
                    .append(
                        &AuditLogEntry::new(
                            &actor,
                            actions::CREATE_INFRASTRUCTURE,
                            "multiple",
                            provider_code,
                            false,
                        )
                        .with_detail("error", err.to_string()),
                    )
                    .await?;
                Err(err)
            }
        }
    }

    async fn try_create(&self, request: &CreateRequest) -> Result<InfrastructureRecord> {
        let factory = self.registry.resolve(request.provider)?;

        let region = match &request.region {
            Some(region) => {
                if !factory.validate_region(region) {
                    return Err(CloudError::InvalidRegion {
                        provider: request.provider,
                        region: region.clone(),
                        allowed: factory
                            .supported_regions()
                            .iter()
                            .map(|s| (*s).to_string())
                            .collect(),
                    }
                    .into());
                }
                region.clone()
            }
            None => ProviderCatalog::default_region(request.provider).to_string(),
        };

        let kinds = request.included_kinds();
        if kinds.is_empty() {
            return Err(ControlError::NoResourcesRequested);
        }

        // Every resource is built before anything is persisted, so a
        // validation failure on the last kind leaves nothing behind.
        let mut record =
            InfrastructureRecord::new(&request.name, request.provider, &region, request.actor());
        for kind in kinds {
            let spec = request.specs.get(&kind).cloned().unwrap_or_default();
            let resource = build_member(factory.as_ref(), kind, &request.name, &region, spec)?;
            record = record.with_resource(resource);
        }

        self.repo.insert(record.clone()).await?;
        tracing::info!(
            "Created infrastructure {} with {} resources on {}",
            record.id,
            record.resources.len(),
            request.provider
        );
        Ok(record)
    }

    pub async fn get_infrastructure(&self, id: &str) -> Result<InfrastructureRecord> {
        self.repo.get(id).await
    }

    pub async fn list_infrastructure(&self) -> Result<Vec<InfrastructureRecord>> {
        self.repo.list().await
    }

    /// Shallow-merge spec fragments into existing resources; fragments
    /// for kinds the aggregate lacks construct and attach new resources.
    pub async fn update_infrastructure(
        &self,
        id: &str,
        changes: SpecChanges,
        requested_by: Option<&str>,
    ) -> Result<InfrastructureRecord> {
        let actor = actor_name(requested_by);

        match self.try_update(id, changes).await {
            Ok((record, kinds)) => {
                self.audit
                    .append(
                        &AuditLogEntry::new(
                            &actor,
                            actions::UPDATE_INFRASTRUCTURE,
                            id,
                            record.provider.as_str(),
                            true,
                        )
                        .with_detail("updated_kinds", kinds),
                    )
                    .await?;
                Ok(record)
            }
            Err(err) => {
                self.audit
                    .append(
                        &AuditLogEntry::new(
                            &actor,
                            actions::UPDATE_INFRASTRUCTURE,
                            id,
                            UNKNOWN_PROVIDER,
                            false,
                        )
                        .with_detail("error", err.to_string()),
                    )
                    .await?;
                Err(err)
            }
        }
    }

    async fn try_update(
        &self,
        id: &str,
        changes: SpecChanges,
    ) -> Result<(InfrastructureRecord, Vec<String>)> {
        let current = self.repo.get(id).await?;
        let factory = self.registry.resolve(current.provider)?;

        let mut kinds: Vec<String> = changes.keys().map(|kind| kind.to_string()).collect();
        kinds.sort();

        let mut additions = Vec::new();
        let mut merges = HashMap::new();
        for (kind, fragment) in changes {
            if current.resources.contains_key(&kind) {
                merges.insert(kind, fragment);
            } else {
                let resource =
                    build_member(factory.as_ref(), kind, &current.name, &current.region, fragment)?;
                additions.push(resource);
            }
        }

        let record = self.repo.upsert_resources(id, additions, merges).await?;
        Ok((record, kinds))
    }

    /// Soft delete; the record survives for history and a second delete
    /// fails with not-found.
    pub async fn delete_infrastructure(
        &self,
        id: &str,
        requested_by: Option<&str>,
    ) -> Result<InfrastructureRecord> {
        let actor = actor_name(requested_by);

        match self.repo.mark_deleted(id).await {
            Ok(record) => {
                self.audit
                    .append(
                        &AuditLogEntry::new(
                            &actor,
                            actions::DELETE_INFRASTRUCTURE,
                            id,
                            record.provider.as_str(),
                            true,
                        )
                        .with_detail("name", record.name.clone()),
                    )
                    .await?;
                Ok(record)
            }
            Err(err) => {
                self.audit
                    .append(
                        &AuditLogEntry::new(
                            &actor,
                            actions::DELETE_INFRASTRUCTURE,
                            id,
                            UNKNOWN_PROVIDER,
                            false,
                        )
                        .with_detail("error", err.to_string()),
                    )
                    .await?;
                Err(err)
            }
        }
    }

    pub async fn start_resource(
        &self,
        id: &str,
        kind: ResourceKind,
        requested_by: Option<&str>,
    ) -> Result<CloudResource> {
        self.resource_action(id, kind, LifecycleAction::Start, requested_by)
            .await
    }

    pub async fn stop_resource(
        &self,
        id: &str,
        kind: ResourceKind,
        requested_by: Option<&str>,
    ) -> Result<CloudResource> {
        self.resource_action(id, kind, LifecycleAction::Stop, requested_by)
            .await
    }

    pub async fn restart_resource(
        &self,
        id: &str,
        kind: ResourceKind,
        requested_by: Option<&str>,
    ) -> Result<CloudResource> {
        self.resource_action(id, kind, LifecycleAction::Restart, requested_by)
            .await
    }

    async fn resource_action(
        &self,
        id: &str,
        kind: ResourceKind,
        action: LifecycleAction,
        requested_by: Option<&str>,
    ) -> Result<CloudResource> {
        let actor = actor_name(requested_by);

        match self.repo.transition_resource(id, kind, action).await {
            Ok((record, resource)) => {
                self.audit
                    .append(
                        &AuditLogEntry::new(
                            &actor,
                            action.as_str(),
                            &resource.resource_id,
                            record.provider.as_str(),
                            true,
                        )
                        .with_detail("kind", kind.as_str())
                        .with_detail("status", resource.status.to_string()),
                    )
                    .await?;
                Ok(resource)
            }
            Err(err) => {
                self.audit
                    .append(
                        &AuditLogEntry::new(&actor, action.as_str(), id, UNKNOWN_PROVIDER, false)
                            .with_detail("kind", kind.as_str())
                            .with_detail("error", err.to_string()),
                    )
                    .await?;
                Err(err)
            }
        }
    }

    /// Rewrite the size class of one resource. Refused for kinds without
    /// a size class and for resources that are tearing down.
    pub async fn resize_resource(
        &self,
        id: &str,
        kind: ResourceKind,
        new_size: &str,
        requested_by: Option<&str>,
    ) -> Result<CloudResource> {
        let actor = actor_name(requested_by);

        match self.try_resize(id, kind, new_size).await {
            Ok((record, resource)) => {
                self.audit
                    .append(
                        &AuditLogEntry::new(
                            &actor,
                            actions::RESIZE,
                            &resource.resource_id,
                            record.provider.as_str(),
                            true,
                        )
                        .with_detail("kind", kind.as_str())
                        .with_detail("new_size", new_size),
                    )
                    .await?;
                Ok(resource)
            }
            Err(err) => {
                self.audit
                    .append(
                        &AuditLogEntry::new(&actor, actions::RESIZE, id, UNKNOWN_PROVIDER, false)
                            .with_detail("kind", kind.as_str())
                            .with_detail("error", err.to_string()),
                    )
                    .await?;
                Err(err)
            }
        }
    }

    async fn try_resize(
        &self,
        id: &str,
        kind: ResourceKind,
        new_size: &str,
    ) -> Result<(InfrastructureRecord, CloudResource)> {
        let current = self.repo.get(id).await?;
        let size_field = ProviderCatalog::size_field(current.provider, kind).ok_or(
            ControlError::ResizeUnsupported {
                provider: current.provider,
                kind,
            },
        )?;
        self.repo.resize_resource(id, kind, size_field, new_size).await
    }

    /// Send one resource to `deleting` and drop it from the aggregate's
    /// include set. The aggregate itself stays active.
    pub async fn remove_resource(
        &self,
        id: &str,
        kind: ResourceKind,
        requested_by: Option<&str>,
    ) -> Result<InfrastructureRecord> {
        let actor = actor_name(requested_by);

        match self.repo.remove_resource(id, kind).await {
            Ok((record, resource)) => {
                self.audit
                    .append(
                        &AuditLogEntry::new(
                            &actor,
                            actions::REMOVE_RESOURCE,
                            &resource.resource_id,
                            record.provider.as_str(),
                            true,
                        )
                        .with_detail("kind", kind.as_str()),
                    )
                    .await?;
                Ok(record)
            }
            Err(err) => {
                self.audit
                    .append(
                        &AuditLogEntry::new(
                            &actor,
                            actions::REMOVE_RESOURCE,
                            id,
                            UNKNOWN_PROVIDER,
                            false,
                        )
                        .with_detail("kind", kind.as_str())
                        .with_detail("error", err.to_string()),
                    )
                    .await?;
                Err(err)
            }
        }
    }
}

/// Construct one member resource: inject the aggregate region as the spec
/// default, pick the resource name, validate and provision to `stopped`.
fn build_member(
    factory: &dyn CloudFactory,
    kind: ResourceKind,
    aggregate_name: &str,
    region: &str,
    mut spec: HashMap<String, Value>,
) -> Result<CloudResource> {
    spec.entry("region".to_string())
        .or_insert_with(|| Value::from(region));
    let name = match spec.remove("name") {
        Some(Value::String(name)) => name,
        _ => format!("{}-{}", aggregate_name, kind.short()),
    };

    let mut resource = factory.create_resource(kind, &name, &spec)?;
    resource.set_status(transition(resource.status, LifecycleAction::Provision)?);
    Ok(resource)
}
