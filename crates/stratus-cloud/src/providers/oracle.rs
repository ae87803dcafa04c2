//! Oracle Cloud Infrastructure

use stratus_core::{Provider, ResourceKind};

use crate::catalog::{DefaultValue, KindRules};
use crate::factory::{CloudFactory, ProviderProfile};

const COMPUTE_SHAPES: &[&str] = &[
    "VM.Standard2.1",
    "VM.Standard2.2",
    "VM.Standard2.4",
    "VM.Standard2.8",
    "VM.Standard3.Flex",
    "VM.Optimized3.Flex",
    "BM.Standard2.52",
    "BM.Standard3.64",
    "VM.Standard.E3.Flex",
    "VM.Standard.E4.Flex",
];

pub(crate) static PROFILE: ProviderProfile = ProviderProfile {
    provider: Provider::Oracle,
    display_name: "Oracle Cloud Infrastructure",
    default_region: "us-ashburn-1",
    regions: &[
        "us-ashburn-1",
        "us-phoenix-1",
        "us-sanjose-1",
        "ca-toronto-1",
        "ca-montreal-1",
        "eu-frankfurt-1",
        "eu-zurich-1",
        "eu-amsterdam-1",
        "uk-london-1",
        "ap-tokyo-1",
        "ap-osaka-1",
        "ap-sydney-1",
        "ap-melbourne-1",
        "ap-mumbai-1",
    ],
    services: &[
        (ResourceKind::VirtualMachine, "Oracle Compute"),
        (ResourceKind::Database, "Autonomous Database"),
        (ResourceKind::LoadBalancer, "Oracle Load Balancer"),
        (ResourceKind::Storage, "Object Storage"),
    ],
    recommended_sizes: &[("compute_shapes", COMPUTE_SHAPES)],
};

static VIRTUAL_MACHINE: KindRules = KindRules {
    required: &[
        "compute_shape",
        "compartment_id",
        "availability_domain",
        "subnet_id",
        "image_id",
    ],
    defaults: &[],
    allowed: &[("compute_shape", COMPUTE_SHAPES)],
    minimums: &[],
    size_field: Some("compute_shape"),
    refine: None,
};

static DATABASE: KindRules = KindRules {
    required: &["workload_type", "compartment_id"],
    defaults: &[
        ("cpu_count", DefaultValue::Int(1)),
        ("storage_tb", DefaultValue::Int(1)),
    ],
    allowed: &[("workload_type", &["OLTP", "DW", "AJD", "APEX"])],
    minimums: &[],
    size_field: None,
    refine: None,
};

static LOAD_BALANCER: KindRules = KindRules {
    required: &["compartment_id"],
    defaults: &[("shape", DefaultValue::Str("100Mbps"))],
    allowed: &[("shape", &["10Mbps", "100Mbps", "400Mbps", "8000Mbps"])],
    minimums: &[],
    size_field: None,
    refine: None,
};

static STORAGE: KindRules = KindRules {
    required: &["namespace", "compartment_id"],
    defaults: &[("storage_tier", DefaultValue::Str("Standard"))],
    allowed: &[("storage_tier", &["Standard", "InfrequentAccess", "Archive"])],
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
pub struct OracleFactory;

impl CloudFactory for OracleFactory {
    fn profile(&self) -> &'static ProviderProfile {
        &PROFILE
    }
}
