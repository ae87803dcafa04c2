//! Per-provider rules tables and factories
//!
//! Each module pairs a [`ProviderProfile`] with four rules tables, one per
//! resource kind. The factories themselves have no behavior of their own;
//! everything flows through the shared construction path in `factory`.

mod aws;
mod azure;
mod gcp;
mod onprem;
mod oracle;

pub use aws::AwsFactory;
pub use azure::AzureFactory;
pub use gcp::GcpFactory;
pub use onprem::OnpremFactory;
pub use oracle::OracleFactory;

use stratus_core::{Provider, ResourceKind};

use crate::catalog::KindRules;
use crate::factory::ProviderProfile;

pub(crate) fn rules(provider: Provider, kind: ResourceKind) -> &'static KindRules {
    match provider {
        Provider::Aws => aws::rules(kind),
        Provider::Azure => azure::rules(kind),
        Provider::Gcp => gcp::rules(kind),
        Provider::Oracle => oracle::rules(kind),
        Provider::Onprem => onprem::rules(kind),
    }
}

pub(crate) fn profile(provider: Provider) -> &'static ProviderProfile {
    match provider {
        Provider::Aws => &aws::PROFILE,
        Provider::Azure => &azure::PROFILE,
        Provider::Gcp => &gcp::PROFILE,
        Provider::Oracle => &oracle::PROFILE,
        Provider::Onprem => &onprem::PROFILE,
    }
}
