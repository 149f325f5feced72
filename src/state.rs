// Shared, immutable application state

use crate::catalog::ModelCatalog;
use crate::config::{AppConfig, DEFAULT_MAX_UPLOAD_BYTES};
use crate::error::StartupError;
use crate::providers::ProviderFactory;

pub struct AppState {
    pub catalog: ModelCatalog,
    pub factory: ProviderFactory,
    pub max_upload_bytes: u64,
}

impl AppState {
    pub fn new(catalog: ModelCatalog, factory: ProviderFactory) -> Self {
        Self {
            catalog,
            factory,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Load the catalog and build the provider factory
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let catalog = ModelCatalog::load_or_builtin(
            &config.models_config_path,
            config.models_config_explicit,
        )?;
        let factory = ProviderFactory::new(config.provider_config())?;

        Ok(Self::new(catalog, factory).with_max_upload_bytes(config.max_upload_bytes))
    }
}
