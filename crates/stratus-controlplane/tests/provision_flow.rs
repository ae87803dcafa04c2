use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Value, json};
use stratus_audit::{AuditFilter, AuditLogService};
use stratus_cloud::FactoryRegistry;
use stratus_controlplane::{
    ControlError, CreateRequest, InMemoryRepository, InfrastructureService, SpecChanges,
};
use stratus_core::{Provider, ResourceKind, ResourceStatus};

fn spec(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn service_in(
    dir: &tempfile::TempDir,
) -> (InfrastructureService<InMemoryRepository>, Arc<AuditLogService>) {
    let audit = Arc::new(AuditLogService::new(dir.path().join("audit.jsonl")));
    let service = InfrastructureService::new(
        Arc::new(FactoryRegistry::builtin()),
        Arc::new(InMemoryRepository::new()),
        audit.clone(),
    );
    (service, audit)
}

#[tokio::test]
async fn full_aggregate_lifecycle_leaves_an_exact_audit_trail() {
    let dir = tempfile::tempdir().unwrap();
    let (service, audit) = service_in(&dir);

    // 1. Provision a web stack: VM + database on AWS
    let request = CreateRequest::new(Provider::Aws, "web")
        .with_region("us-east-1")
        .with_requested_by("alice")
        .with_spec(
            ResourceKind::VirtualMachine,
            spec(&[
                ("instance_type", json!("t3.micro")),
                ("ami", json!("ami-12345678")),
                ("vpc_id", json!("vpc-abc")),
            ]),
        )
        .with_spec(
            ResourceKind::Database,
            spec(&[
                ("engine", json!("postgres")),
                ("instance_class", json!("db.t3.micro")),
                ("allocated_storage", json!(20)),
            ]),
        );
    let record = service.create_infrastructure(request).await.unwrap();
    let id = record.id.clone();
    assert_eq!(record.resources.len(), 2);
    assert!(
        record
            .resources
            .values()
            .all(|r| r.status == ResourceStatus::Stopped)
    );

    // 2. Drive the VM around the state machine
    let vm = service
        .start_resource(&id, ResourceKind::VirtualMachine, Some("alice"))
        .await
        .unwrap();
    assert_eq!(vm.status, ResourceStatus::Running);

    let vm = service
        .restart_resource(&id, ResourceKind::VirtualMachine, Some("alice"))
        .await
        .unwrap();
    assert_eq!(vm.status, ResourceStatus::Running);

    let vm = service
        .stop_resource(&id, ResourceKind::VirtualMachine, Some("alice"))
        .await
        .unwrap();
    assert_eq!(vm.status, ResourceStatus::Stopped);

    // 3. Update attaches a storage bucket the stack did not start with
    let mut changes = SpecChanges::new();
    changes.insert(ResourceKind::Storage, HashMap::new());
    let record = service
        .update_infrastructure(&id, changes, Some("alice"))
        .await
        .unwrap();
    assert!(record.includes[&ResourceKind::Storage]);
    assert_eq!(
        record.resources[&ResourceKind::Storage].spec["storage_class"],
        json!("STANDARD")
    );

    // 4. Tear the aggregate down
    service
        .delete_infrastructure(&id, Some("alice"))
        .await
        .unwrap();
    assert!(matches!(
        service.get_infrastructure(&id).await.unwrap_err(),
        ControlError::NotFound(_)
    ));

    // 5. The audit trail holds exactly this sequence, all by alice
    let page = audit
        .get_logs(&AuditFilter::default(), 1, 50)
        .await
        .unwrap();
    assert_eq!(page.total, 6);
    assert!(page.entries.iter().all(|e| e.success && e.actor == "alice"));

    let mut actions: Vec<&str> = page.entries.iter().map(|e| e.action.as_str()).collect();
    actions.reverse();
    assert_eq!(
        actions,
        vec![
            "create_infrastructure",
            "start",
            "restart",
            "stop",
            "update_infrastructure",
            "delete_infrastructure",
        ]
    );
}

#[tokio::test]
async fn failed_attempts_land_in_the_same_trail_as_successes() {
    let dir = tempfile::tempdir().unwrap();
    let (service, audit) = service_in(&dir);

    let request = CreateRequest::new(Provider::Onprem, "lab").with_spec(
        ResourceKind::VirtualMachine,
        spec(&[
            ("cpu", json!(4)),
            ("ram_gb", json!(16)),
            ("disk_gb", json!(80)),
            ("nic", json!("eth0")),
        ]),
    );
    let record = service.create_infrastructure(request).await.unwrap();

    // Starting a freshly provisioned (stopped) VM works; starting it
    // again is an illegal transition and must still be audited.
    service
        .start_resource(&record.id, ResourceKind::VirtualMachine, None)
        .await
        .unwrap();
    let err = service
        .start_resource(&record.id, ResourceKind::VirtualMachine, None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("cannot start while running"));

    let stats = audit.get_stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.successful, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.counts_by_action["start"], 2);

    let failures = audit
        .get_logs(
            &AuditFilter {
                success: Some(false),
                ..Default::default()
            },
            1,
            10,
        )
        .await
        .unwrap();
    assert_eq!(failures.total, 1);
    assert_eq!(failures.entries[0].action, "start");
    assert_eq!(failures.entries[0].actor, "system");
}
