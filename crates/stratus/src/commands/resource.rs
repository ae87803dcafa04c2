use colored::Colorize;
use stratus_controlplane::{InMemoryRepository, InfrastructureService};
use stratus_core::{CloudResource, ResourceKind};

use crate::ResourceCommands;
use crate::utils;

pub async fn handle(
    cmd: ResourceCommands,
    service: &InfrastructureService<InMemoryRepository>,
) -> anyhow::Result<()> {
    match cmd {
        ResourceCommands::Start {
            id,
            kind,
            requested_by,
        } => {
            let resource = service
                .start_resource(&id, kind.parse()?, requested_by.as_deref())
                .await?;
            print_status_line(&resource);
            Ok(())
        }
        ResourceCommands::Stop {
            id,
            kind,
            requested_by,
        } => {
            let resource = service
                .stop_resource(&id, kind.parse()?, requested_by.as_deref())
                .await?;
            print_status_line(&resource);
            Ok(())
        }
        ResourceCommands::Restart {
            id,
            kind,
            requested_by,
        } => {
            let resource = service
                .restart_resource(&id, kind.parse()?, requested_by.as_deref())
                .await?;
            print_status_line(&resource);
            Ok(())
        }
        ResourceCommands::Resize {
            id,
            kind,
            size,
            requested_by,
        } => {
            let resource = service
                .resize_resource(&id, kind.parse()?, &size, requested_by.as_deref())
                .await?;
            println!(
                "{} {} resized to {}",
                "✓".green(),
                resource.name.cyan(),
                size.bold()
            );
            Ok(())
        }
        ResourceCommands::Remove {
            id,
            kind,
            requested_by,
        } => {
            let kind: ResourceKind = kind.parse()?;
            let record = service
                .remove_resource(&id, kind, requested_by.as_deref())
                .await?;
            println!(
                "{} Removed the {} from '{}'",
                "✓".green(),
                kind.to_string().cyan(),
                record.name
            );
            println!(
                "  {}",
                "Its last known state is retained on the record".dimmed()
            );
            Ok(())
        }
    }
}

fn print_status_line(resource: &CloudResource) {
    println!(
        "{} {} is now {}",
        "✓".green(),
        resource.name.cyan(),
        utils::status_colored(resource.status)
    );
}
