use colored::Colorize;
use stratus_controlplane::{CreateRequest, InMemoryRepository, InfrastructureService};
use stratus_core::{Provider, ResourceKind};

use crate::ProvisionArgs;
use crate::utils;

pub async fn handle(
    args: ProvisionArgs,
    service: &InfrastructureService<InMemoryRepository>,
) -> anyhow::Result<()> {
    let provider: Provider = args.provider.parse()?;

    let mut request = CreateRequest::new(provider, &args.name);
    if let Some(region) = args.region {
        request = request.with_region(region);
    }
    if let Some(requested_by) = args.requested_by {
        request = request.with_requested_by(requested_by);
    }
    for (kind, raw) in [
        (ResourceKind::VirtualMachine, &args.vm),
        (ResourceKind::Database, &args.db),
        (ResourceKind::LoadBalancer, &args.lb),
        (ResourceKind::Storage, &args.storage),
    ] {
        if !raw.is_empty() {
            request = request.with_spec(kind, utils::parse_spec(raw)?);
        }
    }
    for kind in &args.with_kinds {
        request = request.with_include(kind.parse()?, true);
    }

    println!(
        "{}",
        format!("Provisioning '{}' on {}...", args.name, provider)
            .blue()
            .bold()
    );

    let record = service.create_infrastructure(request).await?;

    println!();
    println!(
        "{}",
        format!("✓ Infrastructure '{}' is ready", record.name)
            .green()
            .bold()
    );
    println!("  ID:     {}", record.id.cyan());
    println!("  Region: {}", record.region);
    println!();
    println!(
        "{}",
        format!("Resources ({}):", record.resources.len()).bold()
    );
    for kind in ResourceKind::ALL {
        if let Some(resource) = record.resource(kind) {
            println!(
                "  {} {:<16} {} ({})",
                "▶".green(),
                kind.to_string().cyan(),
                resource.name,
                resource.resource_id.dimmed()
            );
        }
    }

    Ok(())
}
