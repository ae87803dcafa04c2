//! Stratus Cloud Factories
//!
//! This crate provides the provider abstraction for Stratus: one factory
//! per provider family, all sharing a single table-driven construction
//! path instead of per-provider product hierarchies.
//!
//! # Supported Providers
//!
//! - **AWS**: EC2, RDS, ALB, S3
//! - **Azure**: Virtual Machines, SQL Database, Load Balancer, Blob Storage
//! - **GCP**: Compute Engine, Cloud SQL, Cloud Load Balancing, Cloud Storage
//! - **Oracle**: Compute, Autonomous Database, Load Balancer, Object Storage
//! - **On-premise**: VMware/Hyper-V/KVM/Xen hosts, database servers,
//!   Nginx/HAProxy balancers, network storage
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │               FactoryRegistry                   │
//! │     (Provider → Arc<dyn CloudFactory>)          │
//! └─────────────────┬───────────────────────────────┘
//!                   │ resolve(provider)
//! ┌─────────────────▼───────────────────────────────┐
//! │          trait CloudFactory                     │
//! │  create_virtual_machine / create_database       │
//! │  create_load_balancer / create_storage          │
//! └─────────────────┬───────────────────────────────┘
//!                   │ build_resource
//! ┌─────────────────▼───────────────────────────────┐
//! │             ProviderCatalog                     │
//! │  required / defaults / allowed / minimums       │
//! │  (static KindRules per provider and kind)       │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod error;
pub mod factory;
pub mod providers;
pub mod registry;

// Re-exports
pub use catalog::{DefaultValue, KindRules, ProviderCatalog};
pub use error::{CloudError, FieldViolation, Result};
pub use factory::{CloudFactory, ProviderProfile};
pub use providers::{AwsFactory, AzureFactory, GcpFactory, OnpremFactory, OracleFactory};
pub use registry::FactoryRegistry;
