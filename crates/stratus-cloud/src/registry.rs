//! Provider registry

use std::collections::HashMap;
use std::sync::Arc;

use stratus_core::Provider;

use crate::error::{CloudError, Result};
use crate::factory::CloudFactory;
use crate::providers::{AwsFactory, AzureFactory, GcpFactory, OnpremFactory, OracleFactory};

/// Maps each provider to its factory.
///
/// Assembled explicitly at startup and only read afterwards, so lookups
/// need no locking. Tests can build registries with any subset of
/// providers registered.
pub struct FactoryRegistry {
    factories: HashMap<Provider, Arc<dyn CloudFactory>>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with all five built-in provider families.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AwsFactory));
        registry.register(Arc::new(AzureFactory));
        registry.register(Arc::new(GcpFactory));
        registry.register(Arc::new(OracleFactory));
        registry.register(Arc::new(OnpremFactory));
        registry
    }

    /// Add or replace the factory for its own provider.
    pub fn register(&mut self, factory: Arc<dyn CloudFactory>) {
        self.factories.insert(factory.provider(), factory);
    }

    pub fn resolve(&self, provider: Provider) -> Result<Arc<dyn CloudFactory>> {
        self.factories
            .get(&provider)
            .cloned()
            .ok_or_else(|| CloudError::UnsupportedProvider(provider.to_string()))
    }

    /// Registered providers in declaration order.
    pub fn providers(&self) -> Vec<Provider> {
        Provider::ALL
            .iter()
            .copied()
            .filter(|provider| self.factories.contains_key(provider))
            .collect()
    }
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
