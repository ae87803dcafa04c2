use colored::Colorize;
use stratus_cloud::FactoryRegistry;
use stratus_core::{Provider, ResourceKind};

use crate::ProviderCommands;

pub fn handle(cmd: ProviderCommands) -> anyhow::Result<()> {
    let registry = FactoryRegistry::builtin();

    match cmd {
        ProviderCommands::List => {
            println!(
                "{}",
                format!(
                    "{:<10} {:<36} {:<16} {}",
                    "CODE", "NAME", "DEFAULT REGION", "REGIONS"
                )
                .bold()
            );
            println!("{}", "─".repeat(72).dimmed());

            for provider in registry.providers() {
                let factory = registry.resolve(provider)?;
                let profile = factory.profile();
                let regions = if profile.regions.is_empty() {
                    "any".to_string()
                } else {
                    profile.regions.len().to_string()
                };
                println!(
                    "{:<10} {:<36} {:<16} {}",
                    provider.as_str().cyan(),
                    profile.display_name,
                    profile.default_region,
                    regions.dimmed()
                );
            }
            Ok(())
        }
        ProviderCommands::Show { provider } => {
            let provider: Provider = provider.parse()?;
            let factory = registry.resolve(provider)?;
            let profile = factory.profile();

            println!("{}", profile.display_name.bold());
            println!("  Code:           {}", provider.as_str().cyan());
            println!("  Default region: {}", profile.default_region);

            println!();
            if profile.regions.is_empty() {
                println!("{}", "Regions: any datacenter label is accepted".bold());
            } else {
                println!("{}", format!("Regions ({}):", profile.regions.len()).bold());
                for region in profile.regions {
                    println!("  {}", region);
                }
            }

            println!();
            println!("{}", "Services:".bold());
            for kind in ResourceKind::ALL {
                if let Some(service_name) = profile.service_name(kind) {
                    println!("  {:<16} {}", kind.to_string().cyan(), service_name);
                }
            }

            if !profile.recommended_sizes.is_empty() {
                println!();
                println!("{}", "Recommended sizes:".bold());
                for (group, sizes) in profile.recommended_sizes {
                    println!("  {}", group.cyan());
                    for size in *sizes {
                        println!("    {}", size);
                    }
                }
            }
            Ok(())
        }
    }
}
