//! Google Cloud Platform
//!
//! The storage `location` set is wider than the region set: multi-region
//! labels (US, EU, ASIA) are accepted alongside the plain regions.

use stratus_core::{Provider, ResourceKind};

use crate::catalog::{DefaultValue, KindRules};
use crate::factory::{CloudFactory, ProviderProfile};

const MACHINE_TYPES: &[&str] = &[
    "e2-micro",
    "e2-small",
    "e2-medium",
    "e2-standard-2",
    "e2-standard-4",
    "n1-standard-1",
    "n1-standard-2",
    "n1-standard-4",
    "n1-standard-8",
    "n2-standard-2",
    "n2-standard-4",
    "n2-standard-8",
];

pub(crate) static PROFILE: ProviderProfile = ProviderProfile {
    provider: Provider::Gcp,
    display_name: "Google Cloud Platform",
    default_region: "us-central1",
    regions: &[
        "us-central1",
        "us-east1",
        "us-west1",
        "us-west2",
        "europe-west1",
        "europe-west2",
        "asia-east1",
        "asia-southeast1",
    ],
    services: &[
        (ResourceKind::VirtualMachine, "Compute Engine"),
        (ResourceKind::Database, "Cloud SQL"),
        (ResourceKind::LoadBalancer, "Cloud Load Balancing"),
        (ResourceKind::Storage, "Cloud Storage"),
    ],
    recommended_sizes: &[("machine_types", MACHINE_TYPES)],
};

static VIRTUAL_MACHINE: KindRules = KindRules {
    required: &["machine_type"],
    defaults: &[
        ("zone", DefaultValue::Str("us-central1-a")),
        ("boot_disk_size", DefaultValue::Int(20)),
        ("project_id", DefaultValue::Str("my-gcp-project")),
    ],
    allowed: &[("machine_type", MACHINE_TYPES)],
    minimums: &[],
    size_field: Some("machine_type"),
    refine: None,
};

static DATABASE: KindRules = KindRules {
    required: &["engine"],
    defaults: &[
        ("engine_version", DefaultValue::Str("13")),
        ("tier", DefaultValue::Str("db-standard-1")),
        ("storage_size", DefaultValue::Int(20)),
    ],
    allowed: &[("engine", &["mysql", "postgres", "sqlserver"])],
    minimums: &[],
    size_field: Some("tier"),
    refine: None,
};

static LOAD_BALANCER: KindRules = KindRules {
    required: &[],
    defaults: &[("type", DefaultValue::Str("HTTP(S)"))],
    allowed: &[("type", &["HTTP(S)", "TCP", "UDP", "SSL"])],
    minimums: &[],
    size_field: None,
    refine: None,
};

static STORAGE: KindRules = KindRules {
    required: &[],
    defaults: &[
        ("storage_class", DefaultValue::Str("STANDARD")),
        ("location", DefaultValue::Str("US")),
    ],
    allowed: &[
        ("storage_class", &["STANDARD", "NEARLINE", "COLDLINE", "ARCHIVE"]),
        (
            "location",
            &[
                "US",
                "EU",
                "ASIA",
                "us-central1",
                "us-east1",
                "us-west1",
                "us-west2",
                "europe-west1",
                "europe-west2",
                "asia-east1",
                "asia-southeast1",
            ],
        ),
    ],
    minimums: &[],
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
pub struct GcpFactory;

impl CloudFactory for GcpFactory {
    fn profile(&self) -> &'static ProviderProfile {
        &PROFILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CloudError;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn machine_type_outside_the_catalog_is_rejected_with_the_full_set() {
        let spec: HashMap<_, _> =
            [("machine_type".to_string(), json!("f1-micro"))].into();
        let err = GcpFactory.create_virtual_machine("batch-1", &spec).unwrap_err();
        match err {
            CloudError::InvalidFieldValues { violations, .. } => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, "machine_type");
                assert_eq!(violations[0].allowed.len(), 12);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn vm_gets_zone_disk_and_project_defaults() {
        let spec: HashMap<_, _> =
            [("machine_type".to_string(), json!("e2-medium"))].into();
        let vm = GcpFactory.create_virtual_machine("batch-1", &spec).unwrap();
        assert_eq!(vm.spec["zone"], json!("us-central1-a"));
        assert_eq!(vm.spec["boot_disk_size"], json!(20));
        assert_eq!(vm.spec["project_id"], json!("my-gcp-project"));
        assert_eq!(vm.region, "us-central1");
    }

    #[test]
    fn storage_location_accepts_multi_region_labels_and_regions() {
        for location in ["EU", "asia-east1"] {
            let spec: HashMap<_, _> =
                [("location".to_string(), json!(location))].into();
            let bucket = GcpFactory.create_storage("archive", &spec).unwrap();
            assert_eq!(bucket.spec["location"], json!(location));
        }

        let spec: HashMap<_, _> = [("location".to_string(), json!("moon-base"))].into();
        assert!(GcpFactory.create_storage("archive", &spec).is_err());
    }
}
