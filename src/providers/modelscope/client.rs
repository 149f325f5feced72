//! ModelScope client implementation

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;

use crate::providers::core::{
    error::ImageError, provider::ImageProvider, types::GenerationParams,
};
use crate::providers::http::{download_image, ensure_success};

use super::types::{GenerationRequest, GenerationResponse};

/// Client for one ModelScope text-to-image model
///
/// The API returns image URLs; the first one is downloaded and returned.
/// Image-to-image is not offered by this provider.
pub struct ModelScopeClient {
    http_client: Client,
    endpoint_url: String,
    api_token: String,
    model: String,
}

impl ModelScopeClient {
    pub fn new(http_client: Client, base_url: &str, api_token: String, model: &str) -> Self {
        Self {
            http_client,
            endpoint_url: format!(
                "{}/v1/images/generations",
                base_url.trim_end_matches('/')
            ),
            api_token,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl ImageProvider for ModelScopeClient {
    async fn text_to_image(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Bytes, ImageError> {
        tracing::debug!(model = %self.model, "Calling ModelScope");

        let request = GenerationRequest::new(&self.model, prompt, params);
        let response = self
            .http_client
            .post(&self.endpoint_url)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?;
        let response: GenerationResponse = ensure_success(response).await?.json().await?;

        let image = response
            .images
            .first()
            .ok_or_else(|| ImageError::ProviderError {
                code: "missing_image".to_string(),
                message: "ModelScope response contained no images".to_string(),
            })?;

        download_image(&self.http_client, &image.url).await
    }
}
