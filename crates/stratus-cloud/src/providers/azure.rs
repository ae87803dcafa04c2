//! Microsoft Azure

use stratus_core::{Provider, ResourceKind};

use crate::catalog::{DefaultValue, KindRules};
use crate::factory::{CloudFactory, ProviderProfile};

pub(crate) static PROFILE: ProviderProfile = ProviderProfile {
    provider: Provider::Azure,
    display_name: "Microsoft Azure",
    default_region: "eastus",
    regions: &[
        "eastus",
        "westus",
        "westus2",
        "northeurope",
        "westeurope",
        "southeastasia",
        "eastasia",
        "japaneast",
        "australiaeast",
    ],
    services: &[
        (ResourceKind::VirtualMachine, "Virtual Machines"),
        (ResourceKind::Database, "Azure SQL Database"),
        (ResourceKind::LoadBalancer, "Azure Load Balancer"),
        (ResourceKind::Storage, "Blob Storage"),
    ],
    recommended_sizes: &[
        ("general", &["Standard_B1s", "Standard_B2s", "Standard_D2s_v3"]),
        ("compute", &["Standard_F2s_v2", "Standard_F4s_v2", "Standard_F8s_v2"]),
        ("memory", &["Standard_E2s_v3", "Standard_E4s_v3", "Standard_E8s_v3"]),
        ("storage", &["Standard_L4s", "Standard_L8s", "Standard_L16s"]),
    ],
};

static VIRTUAL_MACHINE: KindRules = KindRules {
    required: &["vm_size", "image", "resource_group", "region"],
    defaults: &[],
    allowed: &[],
    minimums: &[],
    size_field: Some("vm_size"),
    refine: None,
};

static DATABASE: KindRules = KindRules {
    required: &["tier", "server_name", "resource_group", "region"],
    defaults: &[("max_size_gb", DefaultValue::Int(100))],
    allowed: &[],
    minimums: &[],
    size_field: Some("tier"),
    refine: None,
};

static LOAD_BALANCER: KindRules = KindRules {
    required: &["resource_group", "region"],
    defaults: &[("sku", DefaultValue::Str("Standard"))],
    allowed: &[],
    minimums: &[],
    size_field: None,
    refine: None,
};

static STORAGE: KindRules = KindRules {
    required: &["region"],
    defaults: &[("account_type", DefaultValue::Str("Standard_LRS"))],
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
pub struct AzureFactory;

impl CloudFactory for AzureFactory {
    fn profile(&self) -> &'static ProviderProfile {
        &PROFILE
    }
}
