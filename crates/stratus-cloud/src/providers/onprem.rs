//! On-premise infrastructure
//!
//! Regions are datacenter labels, not a vendor set, so any region string
//! validates. The database rules carry the one piece of conditional
//! defaulting in the catalog: the listen port follows the chosen engine.

use std::collections::HashMap;

use serde_json::Value;
use stratus_core::{Provider, ResourceKind};

use crate::catalog::{DefaultValue, KindRules};
use crate::factory::{CloudFactory, ProviderProfile};

pub(crate) static PROFILE: ProviderProfile = ProviderProfile {
    provider: Provider::Onprem,
    display_name: "On-Premise Infrastructure",
    default_region: "datacenter-1",
    regions: &[],
    services: &[
        (
            ResourceKind::VirtualMachine,
            "Virtual Machines (VMware/Hyper-V/KVM/Xen)",
        ),
        (
            ResourceKind::Database,
            "Database Servers (PostgreSQL/MySQL/Oracle/SQL Server)",
        ),
        (
            ResourceKind::LoadBalancer,
            "Load Balancers (Nginx/HAProxy/F5/Citrix)",
        ),
        (ResourceKind::Storage, "Network Storage (NFS/SMB/iSCSI/FC)"),
    ],
    recommended_sizes: &[("hypervisors", &["vmware", "hyperv", "kvm", "xen"])],
};

// Standard listen ports per engine, filled in only when the caller gave none.
fn default_database_port(spec: &mut HashMap<String, Value>) {
    if spec.contains_key("port") {
        return;
    }
    let port = match spec.get("engine").and_then(Value::as_str) {
        Some("postgresql") => 5432,
        Some("mysql") => 3306,
        Some("oracle") => 1521,
        Some("sqlserver") => 1433,
        _ => return,
    };
    spec.insert("port".to_string(), Value::from(port));
}

static VIRTUAL_MACHINE: KindRules = KindRules {
    required: &["cpu", "ram_gb", "disk_gb", "nic"],
    defaults: &[("hypervisor", DefaultValue::Str("vmware"))],
    allowed: &[("hypervisor", &["vmware", "hyperv", "kvm", "xen"])],
    minimums: &[("cpu", 1), ("ram_gb", 1), ("disk_gb", 10)],
    size_field: Some("size"),
    refine: None,
};

static DATABASE: KindRules = KindRules {
    required: &["engine"],
    defaults: &[],
    allowed: &[("engine", &["postgresql", "mysql", "oracle", "sqlserver"])],
    minimums: &[],
    size_field: None,
    refine: Some(default_database_port),
};

static LOAD_BALANCER: KindRules = KindRules {
    required: &[],
    defaults: &[
        ("type", DefaultValue::Str("nginx")),
        ("algorithm", DefaultValue::Str("round_robin")),
    ],
    allowed: &[
        ("type", &["nginx", "haproxy", "f5", "citrix"]),
        (
            "algorithm",
            &["round_robin", "least_conn", "ip_hash", "least_time"],
        ),
    ],
    minimums: &[],
    size_field: None,
    refine: None,
};

static STORAGE: KindRules = KindRules {
    required: &["storage_type"],
    defaults: &[("capacity_gb", DefaultValue::Int(100))],
    allowed: &[("storage_type", &["nfs", "smb", "iscsi", "fc"])],
    minimums: &[("capacity_gb", 10)],
    size_field: None,
    refine: None,
};

pub(crate) fn rules(kind: ResourceKind) -> &'static KindRules {
    match kind {
        ResourceKind::VirtualMachine => &VIRTUAL_MACHINE,
        ResourceKind::Database => &DATABASE,
        ResourceKind::LoadBalancer => &LOAD_BALANCER,
        ResourceKind::Storage => &STORAGE,
    }
}

#[derive(Debug)]
pub struct OnpremFactory;

impl CloudFactory for OnpremFactory {
    fn profile(&self) -> &'static ProviderProfile {
        &PROFILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CloudError;
    use serde_json::json;

    fn spec(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn database_port_follows_the_engine() {
        for (engine, port) in [
            ("postgresql", 5432),
            ("mysql", 3306),
            ("oracle", 1521),
            ("sqlserver", 1433),
        ] {
            let db = OnpremFactory
                .create_database("inventory", &spec(&[("engine", json!(engine))]))
                .unwrap();
            assert_eq!(db.spec["port"], json!(port), "engine {engine}");
        }
    }

    #[test]
    fn caller_supplied_port_is_kept() {
        let db = OnpremFactory
            .create_database(
                "inventory",
                &spec(&[("engine", json!("postgresql")), ("port", json!(6432))]),
            )
            .unwrap();
        assert_eq!(db.spec["port"], json!(6432));
    }

    #[test]
    fn vm_enforces_floor_sizes_and_hypervisor_set() {
        let err = OnpremFactory
            .create_virtual_machine(
                "build-agent",
                &spec(&[
                    ("cpu", json!(2)),
                    ("ram_gb", json!(8)),
                    ("disk_gb", json!(4)),
                    ("nic", json!("eth0")),
                    ("hypervisor", json!("qemu")),
                ]),
            )
            .unwrap_err();
        match err {
            CloudError::InvalidFieldValues { violations, .. } => {
                let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["hypervisor", "disk_gb"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn any_datacenter_label_is_a_valid_region() {
        let vm = OnpremFactory
            .create_virtual_machine(
                "build-agent",
                &spec(&[
                    ("cpu", json!(2)),
                    ("ram_gb", json!(8)),
                    ("disk_gb", json!(40)),
                    ("nic", json!("eth0")),
                    ("region", json!("osaka-dc-2")),
                ]),
            )
            .unwrap();
        assert_eq!(vm.region, "osaka-dc-2");
        assert_eq!(vm.spec["hypervisor"], json!("vmware"));
    }

    #[test]
    fn storage_defaults_to_100_gb_and_keeps_the_floor() {
        let share = OnpremFactory
            .create_storage("backups", &spec(&[("storage_type", json!("nfs"))]))
            .unwrap();
        assert_eq!(share.spec["capacity_gb"], json!(100));
        assert_eq!(share.region, "datacenter-1");
    }
}
