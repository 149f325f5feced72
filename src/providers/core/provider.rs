//! Provider trait and factory

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::fmt;
use std::str::FromStr;

use super::{
    config::ProviderConfig,
    error::ImageError,
    types::{GenerationParams, ImageRequest, Task},
};
use crate::providers::cloudflare::CloudflareClient;
use crate::providers::dashscope::DashScopeClient;
use crate::providers::modelscope::ModelScopeClient;

/// Main interface that every image provider implementation satisfies
///
/// Implementations override the tasks they support; the defaults report
/// the task as unsupported.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate an image from a text prompt
    async fn text_to_image(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<Bytes, ImageError> {
        Err(ImageError::Unsupported(
            "This provider does not support text-to-image generation.".to_string(),
        ))
    }

    /// Generate a new image from an input image and a text prompt
    async fn image_to_image(
        &self,
        _input_image: &[u8],
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<Bytes, ImageError> {
        Err(ImageError::Unsupported(
            "This provider does not support image-to-image generation.".to_string(),
        ))
    }

    /// Check the request and dispatch it to the matching task
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when the prompt is empty or an
    /// image-to-image request carries no input image, otherwise whatever
    /// the task implementation returns.
    async fn generate(&self, request: ImageRequest) -> Result<Bytes, ImageError> {
        if request.prompt.is_empty() {
            return Err(ImageError::InvalidRequest(format!(
                "{} task requires a 'prompt' parameter.",
                request.task
            )));
        }

        match request.task {
            Task::TextToImage => self.text_to_image(&request.prompt, &request.params).await,
            Task::ImageToImage => match request.input_image.as_deref() {
                Some(image) if !image.is_empty() => {
                    self.image_to_image(image, &request.prompt, &request.params)
                        .await
                }
                _ => Err(ImageError::InvalidRequest(
                    "image_to_image task requires both 'prompt' and 'input_image' parameters."
                        .to_string(),
                )),
            },
        }
    }
}

/// Providers with a client implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Cloudflare,
    ModelScope,
    Aliyun,
}

impl ProviderKind {
    /// Provider name as it appears in the catalog and in requests
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Cloudflare => "cloudflare",
            ProviderKind::ModelScope => "modelscope",
            ProviderKind::Aliyun => "aliyun",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cloudflare" => Ok(ProviderKind::Cloudflare),
            "modelscope" => Ok(ProviderKind::ModelScope),
            "aliyun" => Ok(ProviderKind::Aliyun),
            other => Err(ImageError::InvalidRequest(format!(
                "Provider '{}' is not implemented.",
                other
            ))),
        }
    }
}

/// Creates provider clients bound to a model
///
/// Holds the process-wide credentials and one pooled HTTP client shared by
/// every provider it creates.
#[derive(Debug, Clone)]
pub struct ProviderFactory {
    http_client: Client,
    config: ProviderConfig,
}

impl ProviderFactory {
    /// Create a new factory
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, ImageError> {
        let http_client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ImageError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Create a provider client for `model`
    pub fn create_provider(&self, kind: ProviderKind, model: &str) -> Box<dyn ImageProvider> {
        let http_client = self.http_client.clone();
        let credentials = &self.config.credentials;
        let endpoints = &self.config.endpoints;

        match kind {
            ProviderKind::Cloudflare => Box::new(CloudflareClient::new(
                http_client,
                &endpoints.cloudflare,
                credentials.cloudflare_account_id.clone(),
                credentials.cloudflare_api_token.clone(),
                model,
            )),
            ProviderKind::ModelScope => Box::new(ModelScopeClient::new(
                http_client,
                &endpoints.modelscope,
                credentials.modelscope_api_token.clone(),
                model,
            )),
            ProviderKind::Aliyun => Box::new(DashScopeClient::new(
                http_client,
                &endpoints.dashscope,
                credentials.dashscope_api_key.clone(),
                model,
                self.config.poll,
            )),
        }
    }
}
