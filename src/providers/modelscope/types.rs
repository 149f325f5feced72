//! ModelScope image generation request and response types

use serde::{Deserialize, Serialize};

use crate::providers::core::types::GenerationParams;

/// Body of `POST /v1/images/generations`
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// `{width}x{height}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<f32>,
}

impl GenerationRequest {
    pub fn new(model: &str, prompt: &str, params: &GenerationParams) -> Self {
        let size = match (params.width, params.height) {
            (Some(width), Some(height)) => Some(format!("{}x{}", width, height)),
            _ => None,
        };

        Self {
            model: model.to_string(),
            prompt: prompt.to_string(),
            negative_prompt: params.negative_prompt.clone(),
            size,
            seed: params.seed,
            steps: params.num_steps,
            guidance: params.guidance,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub images: Vec<GeneratedImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedImage {
    pub url: String,
}
