//! Process-wide configuration, read once at startup from the environment

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::providers::{Credentials, ProviderConfig};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODELS_CONFIG_PATH: &str = "models_config.json";
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}' (expected a positive integer)")]
    InvalidNumber { name: &'static str, value: String },
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub credentials: Credentials,
    pub models_config_path: PathBuf,
    /// Whether `models_config_path` was set explicitly
    pub models_config_explicit: bool,
    pub provider_timeout: Duration,
    pub max_upload_bytes: u64,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    ///
    /// Credentials default to empty strings; they are never required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str| lookup(key).unwrap_or_default();

        let credentials = Credentials {
            cloudflare_account_id: string("CLOUDFLARE_ACCOUNT_ID"),
            cloudflare_api_token: string("CLOUDFLARE_API_TOKEN"),
            modelscope_api_token: string("MODELSCOPE_API_TOKEN"),
            dashscope_api_key: string("DASHSCOPE_API_KEY"),
        };

        let port = parse_positive(&lookup, "PORT", DEFAULT_PORT as u64)?;
        let port = u16::try_from(port).map_err(|_| ConfigError::InvalidNumber {
            name: "PORT",
            value: port.to_string(),
        })?;

        let models_config = lookup("MODELS_CONFIG_PATH").filter(|path| !path.is_empty());
        let models_config_explicit = models_config.is_some();
        let models_config_path =
            PathBuf::from(models_config.unwrap_or_else(|| DEFAULT_MODELS_CONFIG_PATH.to_string()));

        let provider_timeout = Duration::from_secs(parse_positive(
            &lookup,
            "PROVIDER_TIMEOUT_SECS",
            DEFAULT_PROVIDER_TIMEOUT_SECS,
        )?);
        let max_upload_bytes =
            parse_positive(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        Ok(Self {
            port,
            credentials,
            models_config_path,
            models_config_explicit,
            provider_timeout,
            max_upload_bytes,
            log_format,
        })
    }

    /// Listener address, always on all interfaces
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::new(self.credentials.clone()).with_request_timeout(self.provider_timeout)
    }
}

fn parse_positive<F>(lookup: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(number) if number > 0 => Ok(number),
            _ => Err(ConfigError::InvalidNumber { name, value }),
        },
    }
}
