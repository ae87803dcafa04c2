use colored::Colorize;
use stratus_audit::{AuditFilter, AuditLogEntry, AuditLogService};
use stratus_controlplane::actions;
use stratus_core::Provider;

use crate::AuditCommands;
use crate::utils;

pub async fn handle(cmd: AuditCommands, audit: &AuditLogService) -> anyhow::Result<()> {
    match cmd {
        AuditCommands::Logs {
            actor,
            action,
            provider,
            resource_id,
            success,
            page,
            page_size,
        } => {
            let page_size = page_size.clamp(1, 200);
            let filter = AuditFilter {
                actor,
                action,
                provider,
                success,
                resource_id,
            };

            let logs = audit.get_logs(&filter, page, page_size).await?;
            if logs.entries.is_empty() {
                println!("{}", "No matching audit entries".dimmed());
                return Ok(());
            }

            print_entries(&logs.entries);
            println!();
            let pages = logs.total.div_ceil(logs.page_size).max(1);
            println!(
                "{}",
                format!(
                    "Page {}/{} ({} matching entries)",
                    logs.page, pages, logs.total
                )
                .dimmed()
            );
            Ok(())
        }
        AuditCommands::Recent { limit } => {
            let limit = limit.clamp(1, 500);
            let entries = audit.get_recent(limit).await?;
            if entries.is_empty() {
                println!("{}", "The audit log is empty".dimmed());
                return Ok(());
            }
            print_entries(&entries);
            Ok(())
        }
        AuditCommands::Stats => {
            let stats = audit.get_stats().await?;

            println!("{}", "Audit log statistics".bold());
            println!("  Total entries: {}", stats.total);
            println!("  Successful:    {}", stats.successful.to_string().green());
            println!("  Failed:        {}", stats.failed.to_string().red());

            let mut by_provider: Vec<_> = stats.counts_by_provider.iter().collect();
            by_provider.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            if !by_provider.is_empty() {
                println!();
                println!("{}", "By provider:".bold());
                for (provider, count) in by_provider {
                    println!("  {:<24} {}", provider.cyan(), count);
                }
            }

            let mut by_action: Vec<_> = stats.counts_by_action.iter().collect();
            by_action.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            if !by_action.is_empty() {
                println!();
                println!("{}", "By action:".bold());
                for (action, count) in by_action {
                    println!("  {:<24} {}", action.cyan(), count);
                }
            }
            Ok(())
        }
        AuditCommands::Actions => {
            println!("{}", "Audited actions:".bold());
            for action in actions::ALL {
                println!("  {}", action);
            }
            println!();
            println!("{}", "Providers:".bold());
            for provider in Provider::ALL {
                println!("  {}", provider);
            }
            Ok(())
        }
    }
}

fn print_entries(entries: &[AuditLogEntry]) {
    println!(
        "{}",
        format!(
            "{:<20} {:<12} {:<24} {:<10} {:<8} {}",
            "TIMESTAMP", "ACTOR", "ACTION", "PROVIDER", "RESULT", "TARGET"
        )
        .bold()
    );
    println!("{}", "─".repeat(116).dimmed());

    for entry in entries {
        let result = if entry.success {
            "ok".green()
        } else {
            "failed".red()
        };
        println!(
            "{:<20} {:<12} {:<24} {:<10} {:<8} {}",
            utils::format_timestamp(&entry.timestamp).dimmed(),
            entry.actor,
            entry.action,
            entry.provider,
            result,
            entry.resource_id.dimmed()
        );
    }
}
