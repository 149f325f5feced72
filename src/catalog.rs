//! Catalog of providers, models and the tasks each model supports

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Catalog shipped with the binary, used when no file is found at the default path
pub const BUILTIN_CATALOG: &str = include_str!("../models_config.json");

/// Model key that accepts any model name under a provider
pub const WILDCARD_MODEL: &str = "*";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read models configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid models configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// `provider -> model -> tasks`, loaded from `models_config.json`
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    raw: Value,
    providers: HashMap<String, HashMap<String, Vec<String>>>,
}

impl ModelCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: Value = serde_json::from_str(json)?;
        let providers = serde_json::from_value(raw.clone())?;
        Ok(Self { raw, providers })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load `path`, falling back to the built-in catalog when the file is
    /// absent and `path` was not explicitly configured
    pub fn load_or_builtin(path: &Path, explicit: bool) -> Result<Self, CatalogError> {
        if !explicit && !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Models configuration not found, using built-in catalog"
            );
            return Self::builtin();
        }
        Self::load(path)
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// The document as loaded, for listing
    pub fn as_json(&self) -> &Value {
        &self.raw
    }

    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Check that `provider` offers `task` on `model`
    ///
    /// Returns the message describing the first rule that fails.
    pub fn validate(&self, provider: &str, model: &str, task: &str) -> Result<(), String> {
        let Some(models) = self.providers.get(provider) else {
            return Err(format!("Provider '{}' not found in configuration.", provider));
        };

        if let Some(tasks) = models.get(WILDCARD_MODEL) {
            if !tasks.iter().any(|t| t == task) {
                return Err(format!(
                    "Task '{}' not supported by any model under provider '{}'.",
                    task, provider
                ));
            }
            return Ok(());
        }

        let Some(tasks) = models.get(model) else {
            return Err(format!(
                "Model '{}' not found under provider '{}'.",
                model, provider
            ));
        };

        if !tasks.iter().any(|t| t == task) {
            return Err(format!(
                "Task '{}' not supported by model '{}' under provider '{}'.",
                task, model, provider
            ));
        }

        Ok(())
    }
}
