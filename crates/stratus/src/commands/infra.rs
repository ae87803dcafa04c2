use colored::Colorize;
use stratus_controlplane::{InMemoryRepository, InfrastructureService, SpecChanges};
use stratus_core::ResourceKind;

use crate::InfraCommands;
use crate::utils;

pub async fn handle(
    cmd: InfraCommands,
    service: &InfrastructureService<InMemoryRepository>,
) -> anyhow::Result<()> {
    match cmd {
        InfraCommands::List => handle_list(service).await,
        InfraCommands::Get { id } => handle_get(service, &id).await,
        InfraCommands::Update {
            id,
            vm,
            db,
            lb,
            storage,
            requested_by,
        } => {
            let mut changes = SpecChanges::new();
            for (kind, raw) in [
                (ResourceKind::VirtualMachine, &vm),
                (ResourceKind::Database, &db),
                (ResourceKind::LoadBalancer, &lb),
                (ResourceKind::Storage, &storage),
            ] {
                if !raw.is_empty() {
                    changes.insert(kind, utils::parse_spec(raw)?);
                }
            }
            if changes.is_empty() {
                anyhow::bail!("Nothing to update; pass at least one of --vm, --db, --lb, --storage");
            }

            let record = service
                .update_infrastructure(&id, changes, requested_by.as_deref())
                .await?;
            println!("{}", format!("✓ Updated '{}'", record.name).green().bold());
            println!("  {} resources attached", record.resources.len());
            Ok(())
        }
        InfraCommands::Delete { id, requested_by } => {
            let record = service
                .delete_infrastructure(&id, requested_by.as_deref())
                .await?;
            println!(
                "{}",
                format!("✓ Deleted '{}' ({})", record.name, record.id).green()
            );
            println!(
                "  {}",
                "The record is retained for audit history".dimmed()
            );
            Ok(())
        }
    }
}

async fn handle_list(service: &InfrastructureService<InMemoryRepository>) -> anyhow::Result<()> {
    let records = service.list_infrastructure().await?;

    if records.is_empty() {
        println!("{}", "No active infrastructure".dimmed());
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "{:<40} {:<16} {:<10} {:<16} {:<10} {:<20}",
            "ID", "NAME", "PROVIDER", "REGION", "RESOURCES", "CREATED"
        )
        .bold()
    );
    println!("{}", "─".repeat(114).dimmed());

    for record in records {
        println!(
            "{:<40} {:<16} {:<10} {:<16} {:<10} {:<20}",
            record.id.cyan(),
            record.name,
            record.provider,
            record.region,
            record.resources.len(),
            utils::format_timestamp(&record.created_at).dimmed()
        );
    }
    Ok(())
}

async fn handle_get(
    service: &InfrastructureService<InMemoryRepository>,
    id: &str,
) -> anyhow::Result<()> {
    let record = service.get_infrastructure(id).await?;

    println!("{}", record.name.bold());
    println!("  ID:           {}", record.id.cyan());
    println!("  Provider:     {}", record.provider);
    println!("  Region:       {}", record.region);
    println!("  Status:       {}", record.status);
    println!("  Requested by: {}", record.requested_by);
    println!("  Created:      {}", utils::format_timestamp(&record.created_at));
    println!("  Updated:      {}", utils::format_timestamp(&record.updated_at));

    println!();
    println!(
        "{}",
        format!("Resources ({}):", record.resources.len()).bold()
    );
    for kind in ResourceKind::ALL {
        if let Some(resource) = record.resource(kind) {
            println!();
            println!("  {} {}", "▶".green(), kind.to_string().cyan().bold());
            println!("    Name:   {}", resource.name);
            println!("    ID:     {}", resource.resource_id.dimmed());
            println!("    Status: {}", utils::status_colored(resource.status));

            let mut keys: Vec<_> = resource.spec.keys().collect();
            keys.sort();
            for key in keys {
                println!("    {}: {}", key.dimmed(), resource.spec[key]);
            }
        }
    }
    Ok(())
}
