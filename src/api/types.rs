//! Shared state for the API router.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::insights::{AzureGenerationClient, GenerationClient};
use crate::registry::RegistryClient;

/// Context handed to every handler: immutable configuration plus the two
/// upstream clients, all built once at startup. Nothing here is mutated
/// after construction, so requests share it freely.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
    pub registry: Arc<RegistryClient>,
    pub generator: Arc<dyn GenerationClient>,
}

impl ApiContext {
    pub fn new(config: AppConfig) -> Self {
        let registry = Arc::new(RegistryClient::new(&config.registry));
        let generator: Arc<dyn GenerationClient> =
            Arc::new(AzureGenerationClient::new(&config.generation));
        Self {
            config: Arc::new(config),
            registry,
            generator,
        }
    }

    /// Context with an injected generation client, for tests and
    /// alternative backends.
    pub fn with_generator(config: AppConfig, generator: Arc<dyn GenerationClient>) -> Self {
        let registry = Arc::new(RegistryClient::new(&config.registry));
        Self {
            config: Arc::new(config),
            registry,
            generator,
        }
    }
}
