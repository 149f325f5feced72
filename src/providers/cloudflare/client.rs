//! Cloudflare Workers AI client implementation

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::providers::core::{
    error::ImageError, provider::ImageProvider, types::GenerationParams,
};
use crate::providers::http::ensure_success;

use super::types::{RunRequest, RunResponse};

/// Client for one Workers AI image model
pub struct CloudflareClient {
    http_client: Client,
    endpoint_url: String,
    api_token: String,
    model: String,
}

impl CloudflareClient {
    /// Create a client for `model` under the given account
    pub fn new(
        http_client: Client,
        base_url: &str,
        account_id: String,
        api_token: String,
        model: &str,
    ) -> Self {
        Self {
            http_client,
            endpoint_url: build_endpoint_url(base_url, &account_id, model),
            api_token,
            model: model.to_string(),
        }
    }

    /// Run the model and extract the image from the response
    ///
    /// Stable Diffusion models answer with raw PNG bytes; FLUX models answer
    /// with a JSON envelope holding a base64 image.
    async fn run(&self, request: RunRequest) -> Result<Bytes, ImageError> {
        tracing::debug!(model = %self.model, "Calling Workers AI");

        let response = self
            .http_client
            .post(&self.endpoint_url)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        let body = response.bytes().await?;
        if is_json {
            decode_json_image(&body)
        } else {
            Ok(body)
        }
    }
}

fn build_endpoint_url(base_url: &str, account_id: &str, model: &str) -> String {
    format!(
        "{}/client/v4/accounts/{}/ai/run/{}",
        base_url.trim_end_matches('/'),
        account_id,
        model
    )
}

fn decode_json_image(body: &[u8]) -> Result<Bytes, ImageError> {
    let response: RunResponse = serde_json::from_slice(body)?;

    if let Some(error) = response.errors.first() {
        return Err(ImageError::ProviderError {
            code: error.code.to_string(),
            message: error.message.clone(),
        });
    }

    match response.result.and_then(|result| result.image) {
        Some(image) => Ok(Bytes::from(BASE64.decode(image.trim())?)),
        None => Err(ImageError::ProviderError {
            code: "missing_image".to_string(),
            message: format!(
                "Workers AI response contained no image (success: {})",
                response.success
            ),
        }),
    }
}

#[async_trait]
impl ImageProvider for CloudflareClient {
    async fn text_to_image(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Bytes, ImageError> {
        self.run(RunRequest::new(prompt, params)).await
    }

    async fn image_to_image(
        &self,
        input_image: &[u8],
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Bytes, ImageError> {
        let request = RunRequest::new(prompt, params).with_image_b64(BASE64.encode(input_image));
        self.run(request).await
    }
}
