mod commands;
mod utils;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use stratus_audit::AuditLogService;
use stratus_cloud::FactoryRegistry;
use stratus_controlplane::{
    InMemoryRepository, InfrastructureRepository, InfrastructureService, SnapshotStore,
};

#[derive(Parser)]
#[command(name = "stratus")]
#[command(about = "Provision and operate multi-cloud infrastructure from one place", long_about = None)]
struct Cli {
    /// Show debug-level logs from the control plane
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision a new infrastructure group on one provider
    Provision(ProvisionArgs),
    /// Inspect and change existing infrastructure groups
    #[command(subcommand)]
    Infra(InfraCommands),
    /// Operate a single resource inside a group
    #[command(subcommand)]
    Resource(ResourceCommands),
    /// Inspect the provider catalog
    #[command(subcommand)]
    Providers(ProviderCommands),
    /// Query the audit trail
    #[command(subcommand)]
    Audit(AuditCommands),
    /// Show version information
    Version,
}

#[derive(Args)]
struct ProvisionArgs {
    /// Provider (aws, azure, gcp, oracle, onprem)
    #[arg(short, long)]
    provider: String,
    /// Name of the new infrastructure group
    #[arg(short, long)]
    name: String,
    /// Region; the provider default is used when omitted
    #[arg(short, long)]
    region: Option<String>,
    /// Actor recorded in the audit trail (defaults to "system")
    #[arg(long)]
    requested_by: Option<String>,
    /// Virtual machine spec, KEY=VALUE or a JSON object (repeatable)
    #[arg(long = "vm", value_name = "KEY=VALUE")]
    vm: Vec<String>,
    /// Database spec, KEY=VALUE or a JSON object (repeatable)
    #[arg(long = "db", value_name = "KEY=VALUE")]
    db: Vec<String>,
    /// Load balancer spec, KEY=VALUE or a JSON object (repeatable)
    #[arg(long = "lb", value_name = "KEY=VALUE")]
    lb: Vec<String>,
    /// Storage spec, KEY=VALUE or a JSON object (repeatable)
    #[arg(long = "storage", value_name = "KEY=VALUE")]
    storage: Vec<String>,
    /// Include a kind with catalog defaults only (vm, db, lb, storage)
    #[arg(long = "with", value_name = "KIND")]
    with_kinds: Vec<String>,
}

#[derive(Subcommand)]
enum InfraCommands {
    /// List active infrastructure groups, oldest first
    List,
    /// Show one infrastructure group in full
    Get {
        /// Infrastructure id (infra-...)
        id: String,
    },
    /// Merge spec changes into a group; new kinds are built and attached
    Update {
        /// Infrastructure id (infra-...)
        id: String,
        /// Virtual machine spec changes, KEY=VALUE or a JSON object
        #[arg(long = "vm", value_name = "KEY=VALUE")]
        vm: Vec<String>,
        /// Database spec changes, KEY=VALUE or a JSON object
        #[arg(long = "db", value_name = "KEY=VALUE")]
        db: Vec<String>,
        /// Load balancer spec changes, KEY=VALUE or a JSON object
        #[arg(long = "lb", value_name = "KEY=VALUE")]
        lb: Vec<String>,
        /// Storage spec changes, KEY=VALUE or a JSON object
        #[arg(long = "storage", value_name = "KEY=VALUE")]
        storage: Vec<String>,
        /// Actor recorded in the audit trail
        #[arg(long)]
        requested_by: Option<String>,
    },
    /// Soft-delete a group; the record survives for audit history
    Delete {
        /// Infrastructure id (infra-...)
        id: String,
        /// Actor recorded in the audit trail
        #[arg(long)]
        requested_by: Option<String>,
    },
}

#[derive(Subcommand)]
enum ResourceCommands {
    /// Start a stopped resource
    Start {
        /// Infrastructure id (infra-...)
        id: String,
        /// Resource kind (vm, db, lb, storage)
        #[arg(short, long)]
        kind: String,
        /// Actor recorded in the audit trail
        #[arg(long)]
        requested_by: Option<String>,
    },
    /// Stop a running resource
    Stop {
        /// Infrastructure id (infra-...)
        id: String,
        /// Resource kind (vm, db, lb, storage)
        #[arg(short, long)]
        kind: String,
        /// Actor recorded in the audit trail
        #[arg(long)]
        requested_by: Option<String>,
    },
    /// Restart a running resource
    Restart {
        /// Infrastructure id (infra-...)
        id: String,
        /// Resource kind (vm, db, lb, storage)
        #[arg(short, long)]
        kind: String,
        /// Actor recorded in the audit trail
        #[arg(long)]
        requested_by: Option<String>,
    },
    /// Change a resource's size class in place
    Resize {
        /// Infrastructure id (infra-...)
        id: String,
        /// Resource kind (vm, db, lb, storage)
        #[arg(short, long)]
        kind: String,
        /// New size class, e.g. m5.large
        #[arg(short, long)]
        size: String,
        /// Actor recorded in the audit trail
        #[arg(long)]
        requested_by: Option<String>,
    },
    /// Detach a resource and send it to deleting
    Remove {
        /// Infrastructure id (infra-...)
        id: String,
        /// Resource kind (vm, db, lb, storage)
        #[arg(short, long)]
        kind: String,
        /// Actor recorded in the audit trail
        #[arg(long)]
        requested_by: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProviderCommands {
    /// List every supported provider
    List,
    /// Show one provider's regions, services and size classes
    Show {
        /// Provider code (aws, azure, gcp, oracle, onprem)
        provider: String,
    },
}

#[derive(Subcommand)]
enum AuditCommands {
    /// Search the audit log
    Logs {
        /// Filter by actor (case-insensitive substring)
        #[arg(long)]
        actor: Option<String>,
        /// Filter by action (case-insensitive substring)
        #[arg(long)]
        action: Option<String>,
        /// Filter by provider (case-insensitive substring)
        #[arg(long)]
        provider: Option<String>,
        /// Filter by target id (case-insensitive substring)
        #[arg(long)]
        resource_id: Option<String>,
        /// Filter by outcome (true or false)
        #[arg(long)]
        success: Option<bool>,
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,
        /// Entries per page (at most 200)
        #[arg(long, default_value = "20")]
        page_size: usize,
    },
    /// Show the newest entries
    Recent {
        /// How many entries to show (at most 500)
        #[arg(short, long, default_value = "100")]
        limit: usize,
    },
    /// Aggregate counts over the whole log
    Stats,
    /// List every audited action name
    Actions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    match cli.command {
        Commands::Version => {
            println!("stratus {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Providers(cmd) => commands::providers::handle(cmd),
        Commands::Audit(cmd) => {
            let audit = AuditLogService::new(stratus_config::audit_log_path()?);
            commands::audit::handle(cmd, &audit).await
        }
        Commands::Provision(args) => {
            let plane = ControlPlane::connect().await?;
            let result = commands::provision::handle(args, &plane.service).await;
            plane.persist().await?;
            result
        }
        Commands::Infra(cmd) => {
            let plane = ControlPlane::connect().await?;
            let mutating = matches!(
                cmd,
                InfraCommands::Update { .. } | InfraCommands::Delete { .. }
            );
            let result = commands::infra::handle(cmd, &plane.service).await;
            if mutating {
                plane.persist().await?;
            }
            result
        }
        Commands::Resource(cmd) => {
            let plane = ControlPlane::connect().await?;
            let result = commands::resource::handle(cmd, &plane.service).await;
            plane.persist().await?;
            result
        }
    }
}

/// Everything a stateful command needs: the audited service plus the
/// snapshot the store is reloaded from and saved back to.
struct ControlPlane {
    service: InfrastructureService<InMemoryRepository>,
    repo: Arc<InMemoryRepository>,
    snapshot: SnapshotStore,
}

impl ControlPlane {
    async fn connect() -> anyhow::Result<Self> {
        let audit = Arc::new(AuditLogService::new(stratus_config::audit_log_path()?));
        let snapshot = SnapshotStore::new(stratus_config::state_file_path()?);
        let repo = Arc::new(InMemoryRepository::new());
        repo.restore(snapshot.load().await?).await?;

        let service = InfrastructureService::new(
            Arc::new(FactoryRegistry::builtin()),
            Arc::clone(&repo),
            audit,
        );
        Ok(Self {
            service,
            repo,
            snapshot,
        })
    }

    /// Saved even after a failed command: mutations that happened before
    /// the failure must survive the process.
    async fn persist(&self) -> anyhow::Result<()> {
        self.snapshot.save(self.repo.dump().await?).await?;
        Ok(())
    }
}
