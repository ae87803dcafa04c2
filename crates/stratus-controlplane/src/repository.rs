//! Repository port and its in-memory implementation
//!
//! The trait exposes whole operations rather than raw get/put so each
//! check-then-mutate sequence runs under one write guard; callers can
//! never interleave a stale read into a lost update.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use stratus_core::{CloudResource, LifecycleAction, ResourceKind, transition};
use tokio::sync::RwLock;

use crate::error::{ControlError, Result};
use crate::record::{InfraStatus, InfrastructureRecord};

#[async_trait]
pub trait InfrastructureRepository: Send + Sync {
    /// Persist a freshly created aggregate.
    async fn insert(&self, record: InfrastructureRecord) -> Result<()>;

    /// Active record by id; absent and soft-deleted ids both miss.
    async fn get(&self, id: &str) -> Result<InfrastructureRecord>;

    /// Active records, oldest first.
    async fn list(&self) -> Result<Vec<InfrastructureRecord>>;

    /// Merge spec fragments into existing resources and attach newly
    /// constructed ones, as one atomic step.
    async fn upsert_resources(
        &self,
        id: &str,
        additions: Vec<CloudResource>,
        merges: HashMap<ResourceKind, HashMap<String, Value>>,
    ) -> Result<InfrastructureRecord>;

    /// Drive one resource through the state machine.
    async fn transition_resource(
        &self,
        id: &str,
        kind: ResourceKind,
        action: LifecycleAction,
    ) -> Result<(InfrastructureRecord, CloudResource)>;

    /// Rewrite a resource's size-class field; refused while `deleting`.
    async fn resize_resource(
        &self,
        id: &str,
        kind: ResourceKind,
        size_field: &str,
        new_size: &str,
    ) -> Result<(InfrastructureRecord, CloudResource)>;

    /// Send one resource to `deleting` and drop it from the include set.
    /// Its snapshot stays on the record.
    async fn remove_resource(
        &self,
        id: &str,
        kind: ResourceKind,
    ) -> Result<(InfrastructureRecord, CloudResource)>;

    /// Soft delete. A second call for the same id misses, exactly like
    /// an unknown id.
    async fn mark_deleted(&self, id: &str) -> Result<InfrastructureRecord>;

    /// Every record including soft-deleted ones, for snapshotting.
    async fn dump(&self) -> Result<Vec<InfrastructureRecord>>;

    /// Replace the whole store, for snapshot restore at startup.
    async fn restore(&self, records: Vec<InfrastructureRecord>) -> Result<()>;
}

/// The store behind the repository port: a guarded map, cloned snapshots
/// out, whole mutations in.
#[derive(Default)]
pub struct InMemoryRepository {
    records: RwLock<HashMap<String, InfrastructureRecord>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn active_mut<'a>(
    records: &'a mut HashMap<String, InfrastructureRecord>,
    id: &str,
) -> Result<&'a mut InfrastructureRecord> {
    match records.get_mut(id) {
        Some(record) if record.is_active() => Ok(record),
        _ => Err(ControlError::NotFound(id.to_string())),
    }
}

fn resource_mut<'a>(
    record: &'a mut InfrastructureRecord,
    kind: ResourceKind,
) -> Result<&'a mut CloudResource> {
    let id = record.id.clone();
    record
        .resources
        .get_mut(&kind)
        .ok_or(ControlError::ResourceNotFound { id, kind })
}

#[async_trait]
impl InfrastructureRepository for InMemoryRepository {
    async fn insert(&self, record: InfrastructureRecord) -> Result<()> {
        let mut records = self.records.write().await;
        tracing::debug!("Stored infrastructure {} ({})", record.id, record.name);
        records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<InfrastructureRecord> {
        let records = self.records.read().await;
        match records.get(id) {
            Some(record) if record.is_active() => Ok(record.clone()),
            _ => Err(ControlError::NotFound(id.to_string())),
        }
    }

    async fn list(&self) -> Result<Vec<InfrastructureRecord>> {
        let records = self.records.read().await;
        let mut active: Vec<InfrastructureRecord> = records
            .values()
            .filter(|record| record.is_active())
            .cloned()
            .collect();
        // Oldest first, id as tiebreak so the order is stable.
        active.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(active)
    }

    async fn upsert_resources(
        &self,
        id: &str,
        additions: Vec<CloudResource>,
        merges: HashMap<ResourceKind, HashMap<String, Value>>,
    ) -> Result<InfrastructureRecord> {
        let mut records = self.records.write().await;
        let record = active_mut(&mut records, id)?;

        for (kind, fragment) in merges {
            let resource = resource_mut(record, kind)?;
            for (key, value) in fragment {
                resource.set_spec_field(key, value);
            }
        }
        for resource in additions {
            record.includes.insert(resource.kind, true);
            record.resources.insert(resource.kind, resource);
        }
        record.touch();
        Ok(record.clone())
    }

    async fn transition_resource(
        &self,
        id: &str,
        kind: ResourceKind,
        action: LifecycleAction,
    ) -> Result<(InfrastructureRecord, CloudResource)> {
        let mut records = self.records.write().await;
        let record = active_mut(&mut records, id)?;
        let resource = resource_mut(record, kind)?;

        // The next status is computed before anything is written, so an
        // illegal action leaves the stored status untouched.
        let next = transition(resource.status, action)?;
        resource.set_status(next);
        record.touch();
        Ok((record.clone(), record.resources[&kind].clone()))
    }

    async fn resize_resource(
        &self,
        id: &str,
        kind: ResourceKind,
        size_field: &str,
        new_size: &str,
    ) -> Result<(InfrastructureRecord, CloudResource)> {
        let mut records = self.records.write().await;
        let record = active_mut(&mut records, id)?;
        let resource = resource_mut(record, kind)?;

        transition(resource.status, LifecycleAction::Resize)?;
        resource.set_spec_field(size_field, Value::from(new_size));
        record.touch();
        Ok((record.clone(), record.resources[&kind].clone()))
    }

    async fn remove_resource(
        &self,
        id: &str,
        kind: ResourceKind,
    ) -> Result<(InfrastructureRecord, CloudResource)> {
        let mut records = self.records.write().await;
        let record = active_mut(&mut records, id)?;
        let resource = resource_mut(record, kind)?;

        let next = transition(resource.status, LifecycleAction::Delete)?;
        resource.set_status(next);
        record.includes.insert(kind, false);
        record.touch();
        Ok((record.clone(), record.resources[&kind].clone()))
    }

    async fn mark_deleted(&self, id: &str) -> Result<InfrastructureRecord> {
        let mut records = self.records.write().await;
        let record = active_mut(&mut records, id)?;
        record.status = InfraStatus::Deleted;
        record.touch();
        tracing::debug!("Soft-deleted infrastructure {}", id);
        Ok(record.clone())
    }

    async fn dump(&self) -> Result<Vec<InfrastructureRecord>> {
        let records = self.records.read().await;
        let mut all: Vec<InfrastructureRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(all)
    }

    async fn restore(&self, records: Vec<InfrastructureRecord>) -> Result<()> {
        let mut store = self.records.write().await;
        store.clear();
        for record in records {
            store.insert(record.id.clone(), record);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stratus_core::{Provider, ResourceStatus};

    fn stopped_vm(id: &str) -> CloudResource {
        let mut vm = CloudResource::new(
            id,
            "web-vm",
            Provider::Aws,
            ResourceKind::VirtualMachine,
            "us-east-1",
        )
        .with_spec([("instance_type".to_string(), json!("t3.micro"))].into());
        vm.set_status(ResourceStatus::Stopped);
        vm
    }

    async fn seed() -> (InMemoryRepository, String) {
        let record = InfrastructureRecord::new("web", Provider::Aws, "us-east-1", "alice")
            .with_resource(stopped_vm("aws-vm1"));
        let id = record.id.clone();
        let repo = InMemoryRepository::new();
        repo.insert(record).await.unwrap();
        (repo, id)
    }

    #[tokio::test]
    async fn get_misses_unknown_and_deleted_ids() {
        let (repo, id) = seed().await;

        assert!(repo.get(&id).await.is_ok());
        assert!(matches!(
            repo.get("infra-nope").await.unwrap_err(),
            ControlError::NotFound(_)
        ));

        repo.mark_deleted(&id).await.unwrap();
        assert!(matches!(
            repo.get(&id).await.unwrap_err(),
            ControlError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn second_delete_fails_like_an_unknown_id() {
        let (repo, id) = seed().await;
        repo.mark_deleted(&id).await.unwrap();
        assert!(matches!(
            repo.mark_deleted(&id).await.unwrap_err(),
            ControlError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn list_returns_only_active_records_oldest_first() {
        let (repo, id) = seed().await;
        let second = InfrastructureRecord::new("api", Provider::Gcp, "us-central1", "bob");
        let second_id = second.id.clone();
        repo.insert(second).await.unwrap();

        repo.mark_deleted(&id).await.unwrap();
        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, second_id);
    }

    #[tokio::test]
    async fn illegal_transition_leaves_status_unchanged() {
        let (repo, id) = seed().await;

        // stop from stopped is illegal
        let err = repo
            .transition_resource(&id, ResourceKind::VirtualMachine, LifecycleAction::Stop)
            .await
            .unwrap_err();
        assert!(matches!(err, ControlError::Lifecycle(_)));

        let record = repo.get(&id).await.unwrap();
        assert_eq!(
            record.resources[&ResourceKind::VirtualMachine].status,
            ResourceStatus::Stopped
        );
    }

    #[tokio::test]
    async fn start_stop_cycle_updates_the_stored_status() {
        let (repo, id) = seed().await;

        let (_, vm) = repo
            .transition_resource(&id, ResourceKind::VirtualMachine, LifecycleAction::Start)
            .await
            .unwrap();
        assert_eq!(vm.status, ResourceStatus::Running);

        let (_, vm) = repo
            .transition_resource(&id, ResourceKind::VirtualMachine, LifecycleAction::Stop)
            .await
            .unwrap();
        assert_eq!(vm.status, ResourceStatus::Stopped);
    }

    #[tokio::test]
    async fn missing_kind_reports_which_resource_is_absent() {
        let (repo, id) = seed().await;

        let err = repo
            .transition_resource(&id, ResourceKind::Database, LifecycleAction::Start)
            .await
            .unwrap_err();
        match err {
            ControlError::ResourceNotFound { id: rid, kind } => {
                assert_eq!(rid, id);
                assert_eq!(kind, ResourceKind::Database);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn resize_rewrites_the_size_field_without_touching_status() {
        let (repo, id) = seed().await;

        let (_, vm) = repo
            .resize_resource(&id, ResourceKind::VirtualMachine, "instance_type", "m5.large")
            .await
            .unwrap();
        assert_eq!(vm.spec["instance_type"], json!("m5.large"));
        assert_eq!(vm.status, ResourceStatus::Stopped);
    }

    #[tokio::test]
    async fn resize_is_refused_while_deleting() {
        let (repo, id) = seed().await;
        repo.remove_resource(&id, ResourceKind::VirtualMachine)
            .await
            .unwrap();

        let err = repo
            .resize_resource(&id, ResourceKind::VirtualMachine, "instance_type", "m5.large")
            .await
            .unwrap_err();
        assert!(matches!(err, ControlError::Lifecycle(_)));
        assert!(err.to_string().contains("cannot resize while deleting"));
    }

    #[tokio::test]
    async fn remove_resource_keeps_the_snapshot_but_drops_the_flag() {
        let (repo, id) = seed().await;

        let (record, vm) = repo
            .remove_resource(&id, ResourceKind::VirtualMachine)
            .await
            .unwrap();
        assert_eq!(vm.status, ResourceStatus::Deleting);
        assert!(!record.includes[&ResourceKind::VirtualMachine]);
        assert!(record.resources.contains_key(&ResourceKind::VirtualMachine));
        assert!(record.is_active());
    }

    #[tokio::test]
    async fn upsert_merges_shallowly_and_attaches_new_kinds() {
        let (repo, id) = seed().await;

        let mut db = CloudResource::new(
            "aws-db1",
            "web-db",
            Provider::Aws,
            ResourceKind::Database,
            "us-east-1",
        );
        db.set_status(ResourceStatus::Stopped);

        let merges = [(
            ResourceKind::VirtualMachine,
            [("instance_type".to_string(), json!("t3.large"))].into(),
        )]
        .into();
        let record = repo.upsert_resources(&id, vec![db], merges).await.unwrap();

        assert_eq!(
            record.resources[&ResourceKind::VirtualMachine].spec["instance_type"],
            json!("t3.large")
        );
        assert!(record.includes[&ResourceKind::Database]);
        assert_eq!(record.resources.len(), 2);
    }

    #[tokio::test]
    async fn dump_and_restore_round_trip_includes_deleted_records() {
        let (repo, id) = seed().await;
        repo.mark_deleted(&id).await.unwrap();

        let dumped = repo.dump().await.unwrap();
        assert_eq!(dumped.len(), 1);

        let other = InMemoryRepository::new();
        other.restore(dumped).await.unwrap();
        assert!(other.list().await.unwrap().is_empty());
        assert_eq!(other.dump().await.unwrap().len(), 1);
    }
}
