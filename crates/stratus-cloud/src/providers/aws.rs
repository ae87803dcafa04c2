//! Amazon Web Services
//!
//! EC2, RDS, ALB and S3 under the common factory contract. AWS requires a
//! region on every kind, so the profile default is only used for display.

use stratus_core::{Provider, ResourceKind};

use crate::catalog::{DefaultValue, KindRules};
use crate::factory::{CloudFactory, ProviderProfile};

pub(crate) static PROFILE: ProviderProfile = ProviderProfile {
    provider: Provider::Aws,
    display_name: "Amazon Web Services (AWS)",
    default_region: "us-east-1",
    regions: &[
        "us-east-1",
        "us-west-1",
        "us-west-2",
        "eu-west-1",
        "eu-central-1",
        "ap-southeast-1",
        "ap-northeast-1",
    ],
    services: &[
        (ResourceKind::VirtualMachine, "EC2 Instances"),
        (ResourceKind::Database, "RDS"),
        (ResourceKind::LoadBalancer, "Application Load Balancer"),
        (ResourceKind::Storage, "S3"),
    ],
    recommended_sizes: &[
        ("general", &["t3.micro", "t3.small", "t3.medium", "m5.large"]),
        ("compute", &["c5.large", "c5.xlarge", "c5.2xlarge"]),
        ("memory", &["r5.large", "r5.xlarge", "r5.2xlarge"]),
        ("storage", &["i3.large", "i3.xlarge", "d2.xlarge"]),
    ],
};

static VIRTUAL_MACHINE: KindRules = KindRules {
    required: &["instance_type", "ami", "vpc_id", "region"],
    defaults: &[],
    allowed: &[],
    minimums: &[],
    size_field: Some("instance_type"),
    refine: None,
};

static DATABASE: KindRules = KindRules {
    required: &["engine", "instance_class", "allocated_storage", "region"],
    defaults: &[],
    allowed: &[],
    minimums: &[],
    size_field: Some("instance_class"),
    refine: None,
};

static LOAD_BALANCER: KindRules = KindRules {
    required: &["vpc_id", "region"],
    defaults: &[("scheme", DefaultValue::Str("internet-facing"))],
    allowed: &[],
    minimums: &[],
    size_field: None,
    refine: None,
};

static STORAGE: KindRules = KindRules {
    required: &["region"],
    defaults: &[("storage_class", DefaultValue::Str("STANDARD"))],
    allowed: &[],
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
pub struct AwsFactory;

impl CloudFactory for AwsFactory {
    fn profile(&self) -> &'static ProviderProfile {
        &PROFILE
    }
}
